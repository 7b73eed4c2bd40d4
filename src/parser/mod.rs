pub mod ast;

use std::collections::HashSet;

use tracing::{info, trace};

use crate::diagnostics::ConfError;
use crate::lexer::token::{Token, TokenKind};
use crate::session::Session;
use crate::span::{Span, Spanned};
use ast::*;

/// Recursive-descent parser over the token stream of a [`Session`].
/// Every error is fatal; nothing is returned for a failed parse.
pub struct Parser<'a> {
    session: &'a mut Session,
    app: App,
    package_names: HashSet<String>,
    error404_route: Option<String>,
    index_route: Option<String>,
}

impl<'a> Parser<'a> {
    /// `session` must already have its root file open.
    pub fn new(session: &'a mut Session) -> Self {
        Self {
            session,
            app: App::default(),
            package_names: HashSet::new(),
            error404_route: None,
            index_route: None,
        }
    }

    fn peek(&self) -> &Spanned<Token> {
        self.session.current()
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().node.kind()
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn advance(&mut self) -> Result<(), ConfError> {
        trace!(token = %self.peek().node, "consumed");
        self.session.advance()?;
        self.skip_comments()
    }

    fn skip_comments(&mut self) -> Result<(), ConfError> {
        while self.at(TokenKind::Comment) {
            self.session.advance()?;
        }
        Ok(())
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Span, ConfError> {
        if self.at(expected) {
            let span = self.peek().span;
            self.advance()?;
            Ok(span)
        } else {
            Err(self.unexpected(expected.to_string()))
        }
    }

    fn expect_value(&mut self) -> Result<Spanned<String>, ConfError> {
        match &self.peek().node {
            Token::Value(value) => {
                let value = Spanned::new(value.clone(), self.peek().span);
                self.advance()?;
                Ok(value)
            }
            _ => Err(self.unexpected(TokenKind::Value.to_string())),
        }
    }

    fn unexpected(&self, expected: impl Into<String>) -> ConfError {
        let tok = self.peek();
        ConfError::syntax(expected, tok.node.kind(), self.session.location(tok.span))
    }

    pub fn parse(mut self) -> Result<App, ConfError> {
        self.skip_comments()?;

        loop {
            match self.peek_kind() {
                TokenKind::Eof => break,
                TokenKind::Package => {
                    self.parse_package()?;
                }
                TokenKind::Routes => {
                    let routes = self.parse_routes_block()?;
                    self.app.routes.extend(routes);
                }
                TokenKind::Ui => self.parse_ui_block()?,
                TokenKind::Middleware => self.parse_middleware()?,
                TokenKind::Include => self.parse_include()?,
                TokenKind::Semicolon => self.advance()?,
                _ => {
                    return Err(self.unexpected("'package', 'routes', 'ui', 'middleware' or 'include'"));
                }
            }
        }

        info!(
            packages = self.app.packages.len(),
            routes = self.app.routes.len(),
            files = self.session.sources().len(),
            "parsed configuration"
        );
        Ok(self.app)
    }

    /// `package VALUE? { body }`. The package is registered before its body is
    /// parsed, so it precedes any anonymous packages declared inside it.
    fn parse_package(&mut self) -> Result<String, ConfError> {
        self.expect(TokenKind::Package)?;
        let name = if self.at(TokenKind::Value) {
            let name = self.expect_value()?;
            if !self.package_names.insert(name.node.clone()) {
                return Err(ConfError::structural(
                    format!("package '{}' is declared more than once", name.node),
                    self.session.location(name.span),
                ));
            }
            name.node
        } else {
            self.fresh_anonymous_name()
        };

        let index = self.app.packages.len();
        self.app.packages.push(Package::new(name.clone()));

        self.expect(TokenKind::LBrace)?;
        self.parse_package_body(index)?;
        self.expect(TokenKind::RBrace)?;
        Ok(name)
    }

    /// Generated names are reserved like explicit ones, so a later
    /// `package 'anonymous-<n>'` is a duplicate and an earlier one is skipped.
    fn fresh_anonymous_name(&mut self) -> String {
        loop {
            let name = self.session.next_anonymous_name();
            if self.package_names.insert(name.clone()) {
                return name;
            }
        }
    }

    fn parse_package_body(&mut self, index: usize) -> Result<(), ConfError> {
        loop {
            let kind = self.peek_kind();
            match kind {
                TokenKind::Requires | TokenKind::Directory | TokenKind::File | TokenKind::Option => {
                    self.advance()?;
                    let value = self.expect_value()?.node;
                    self.expect(TokenKind::Semicolon)?;

                    let package = &mut self.app.packages[index];
                    let list = match kind {
                        TokenKind::Requires => &mut package.requires,
                        TokenKind::Directory => &mut package.directories,
                        TokenKind::File => &mut package.files,
                        _ => &mut package.options,
                    };
                    list.push(value);
                }
                TokenKind::Routes => {
                    let routes = self.parse_routes_block()?;
                    self.app.packages[index].routes.extend(routes);
                }
                TokenKind::Semicolon => self.advance()?,
                _ => return Ok(()),
            }
        }
    }

    fn parse_routes_block(&mut self) -> Result<Vec<Route>, ConfError> {
        self.expect(TokenKind::Routes)?;
        self.expect(TokenKind::LBrace)?;

        let mut routes = Vec::new();
        loop {
            match self.peek_kind() {
                TokenKind::Value => routes.push(self.parse_route()?),
                TokenKind::Semicolon => self.advance()?,
                _ => break,
            }
        }

        self.expect(TokenKind::RBrace)?;
        Ok(routes)
    }

    /// `VALUE : VALUE layout? deps? (, option | , layout | layout)* ;`
    fn parse_route(&mut self) -> Result<Route, ConfError> {
        let path = self.expect_value()?;
        self.expect(TokenKind::Colon)?;
        let template = self.expect_value()?;
        let mut builder = RouteBuilder::new(path.node.clone(), template.node);

        if self.at(TokenKind::Layout) {
            self.parse_route_layout(&mut builder)?;
        }
        if self.at(TokenKind::LBracket) {
            for dep in self.parse_dep_list()? {
                builder.depend(dep);
            }
        }

        loop {
            match self.peek_kind() {
                TokenKind::Comma => {
                    self.advance()?;
                    if let Some(option) = self.route_option() {
                        self.advance()?;
                        builder.option(option);
                    } else if self.at(TokenKind::Layout) {
                        self.parse_route_layout(&mut builder)?;
                    } else {
                        return Err(self.unexpected("route option or 'layout'"));
                    }
                }
                TokenKind::Layout => self.parse_route_layout(&mut builder)?,
                _ => break,
            }
        }
        self.expect(TokenKind::Semicolon)?;

        let route = builder.build();
        self.claim_route_flags(&route, path.span)?;
        Ok(route)
    }

    fn route_option(&self) -> Option<RouteOption> {
        match self.peek_kind() {
            TokenKind::Error404 => Some(RouteOption::Error404),
            TokenKind::Index => Some(RouteOption::Index),
            TokenKind::Private => Some(RouteOption::Private),
            TokenKind::Dialog => Some(RouteOption::Dialog),
            _ => None,
        }
    }

    fn parse_route_layout(&mut self, builder: &mut RouteBuilder) -> Result<(), ConfError> {
        self.expect(TokenKind::Layout)?;
        self.expect(TokenKind::Colon)?;
        let layout = self.expect_value()?;
        builder.layout(layout.node);
        Ok(())
    }

    /// Only one route in the whole app may be the 404 fallback, and only one the index.
    fn claim_route_flags(&mut self, route: &Route, span: Span) -> Result<(), ConfError> {
        let claims = [
            (route.error404, &mut self.error404_route, "error404"),
            (route.index, &mut self.index_route, "index"),
        ];
        for (flagged, holder, flag) in claims {
            if !flagged {
                continue;
            }
            if let Some(previous) = holder.as_deref() {
                return Err(ConfError::structural(
                    format!("route '{}' is marked {flag}, but route '{previous}' already is", route.path),
                    self.session.location(span),
                ));
            }
            *holder = Some(route.path.clone());
        }
        Ok(())
    }

    /// `[ entry (, entry)* ]` where an entry is a package name or an inline package.
    fn parse_dep_list(&mut self) -> Result<Vec<String>, ConfError> {
        self.expect(TokenKind::LBracket)?;

        let mut entries = Vec::new();
        if !self.at(TokenKind::RBracket) {
            loop {
                let entry = match self.peek_kind() {
                    TokenKind::Value => self.expect_value()?.node,
                    TokenKind::Package => self.parse_package()?,
                    _ => return Err(self.unexpected("quoted value or 'package'")),
                };
                entries.push(entry);
                if !self.at(TokenKind::Comma) {
                    break;
                }
                self.advance()?;
            }
        }

        self.expect(TokenKind::RBracket)?;
        Ok(entries)
    }

    fn parse_ui_block(&mut self) -> Result<(), ConfError> {
        self.expect(TokenKind::Ui)?;
        self.expect(TokenKind::LBrace)?;

        loop {
            let field = match self.peek_kind() {
                TokenKind::Template => UiField::Template,
                TokenKind::Assets => UiField::Assets,
                TokenKind::Javascript => UiField::Javascript,
                TokenKind::Stylesheets => UiField::Stylesheets,
                TokenKind::Semicolon => {
                    self.advance()?;
                    continue;
                }
                _ => break,
            };
            self.advance()?;
            let entries = self.parse_dep_list()?;
            self.app.ui.field_mut(field).extend(entries);
        }

        self.expect(TokenKind::RBrace)?;
        Ok(())
    }

    fn parse_middleware(&mut self) -> Result<(), ConfError> {
        self.expect(TokenKind::Middleware)?;
        let name = self.expect_value()?;
        self.expect(TokenKind::Semicolon)?;
        self.app.middlewares.push(name.node);
        Ok(())
    }

    /// `include VALUE ;`. The `;` stays current and is saved as the parent's
    /// continuation, so it is consumed once the included file is exhausted.
    fn parse_include(&mut self) -> Result<(), ConfError> {
        self.expect(TokenKind::Include)?;
        let path = self.expect_value()?;
        if !self.at(TokenKind::Semicolon) {
            return Err(self.unexpected(TokenKind::Semicolon.to_string()));
        }
        self.session.include(&path.node, path.span)?;
        self.skip_comments()
    }
}
