use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::diagnostics::{ConfError, Location};
use crate::lexer::{Lexer, Token};
use crate::parser::ast::ANONYMOUS_PREFIX;
use crate::source_map::SourceMap;
use crate::span::{Span, Spanned};

/// Nesting limit for `include`, which also bounds include cycles.
pub const MAX_INCLUDE_DEPTH: usize = 64;

/// One open file.
struct Context {
    directory: PathBuf,
    file_path: PathBuf,
    lexer: Lexer,
}

/// State of one parse: the include stack, the continuation tokens of
/// suspended parent files, the loaded sources and the anonymous package
/// counter. Independent sessions share nothing.
pub struct Session {
    root_dir: PathBuf,
    sources: SourceMap,
    contexts: Vec<Context>,
    continuations: Vec<Spanned<Token>>,
    current: Spanned<Token>,
    anonymous_counter: usize,
}

impl Session {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            sources: SourceMap::new(),
            contexts: Vec::new(),
            continuations: Vec::new(),
            current: Spanned::dummy(Token::Eof),
            anonymous_counter: 0,
        }
    }

    /// Open the root file, resolved against the root directory.
    pub fn open(&mut self, root_file: impl AsRef<Path>) -> Result<(), ConfError> {
        let path = self.root_dir.join(root_file);
        let text = std::fs::read_to_string(&path).map_err(|e| ConfError::io(&path, e))?;
        self.open_context(path, text)
    }

    /// Open an in-memory root source named `name` inside the root directory.
    pub fn open_source(&mut self, name: impl AsRef<Path>, text: impl Into<String>) -> Result<(), ConfError> {
        let path = self.root_dir.join(name);
        self.open_context(path, text.into())
    }

    fn open_context(&mut self, path: PathBuf, text: String) -> Result<(), ConfError> {
        self.contexts.clear();
        self.continuations.clear();
        self.push_context(path, text)
    }

    /// Suspend the current file and continue lexing `requested`, resolved
    /// against the directory of the file that issued the include.
    pub fn include(&mut self, requested: &str, at: Span) -> Result<(), ConfError> {
        let (directory, issuer) = match self.contexts.last() {
            Some(context) => (context.directory.clone(), context.file_path.clone()),
            None => (self.root_dir.clone(), self.root_dir.clone()),
        };
        let resolved = resolve_include(&directory, requested);

        if !resolved.is_file() {
            return Err(ConfError::IncludeNotFound {
                requested: requested.to_string(),
                resolved,
                issuer,
                location: Some(self.location(at)),
            });
        }
        if self.contexts.len() >= MAX_INCLUDE_DEPTH {
            return Err(ConfError::structural(
                format!("includes nested deeper than {MAX_INCLUDE_DEPTH} levels (is '{requested}' including itself?)"),
                self.location(at),
            ));
        }

        let text = std::fs::read_to_string(&resolved).map_err(|e| ConfError::io(&resolved, e))?;
        let saved = std::mem::replace(&mut self.current, Spanned::dummy(Token::Eof));
        self.continuations.push(saved);
        self.push_context(resolved, text)
    }

    fn push_context(&mut self, file_path: PathBuf, text: String) -> Result<(), ConfError> {
        let directory = file_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root_dir.clone());
        let (file_id, file) = self.sources.add_file(file_path.clone(), text);
        debug!(file = %file_path.display(), depth = self.contexts.len() + 1, "opened configuration file");

        let mut lexer = Lexer::new(file, file_id);
        self.current = lexer.next_token()?;
        self.contexts.push(Context { directory, file_path, lexer });
        self.settle();
        Ok(())
    }

    /// Move to the next token of the active file.
    pub fn advance(&mut self) -> Result<(), ConfError> {
        let Some(context) = self.contexts.last_mut() else {
            return Ok(());
        };
        self.current = context.lexer.next_token()?;
        self.settle();
        Ok(())
    }

    /// Close every file whose text is exhausted, resuming the parent at its
    /// saved token. A resumed token can itself be its file's end.
    fn settle(&mut self) {
        while self.current.node == Token::Eof {
            let Some(closed) = self.contexts.pop() else {
                break;
            };
            debug!(file = %closed.file_path.display(), depth = self.contexts.len(), "closed configuration file");
            if self.contexts.is_empty() {
                break;
            }
            match self.continuations.pop() {
                Some(token) => self.current = token,
                None => break,
            }
        }
    }

    pub fn current(&self) -> &Spanned<Token> {
        &self.current
    }

    /// True once the root file has been fully consumed.
    pub fn is_finished(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.contexts.len()
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.contexts.last().map(|c| c.file_path.as_path())
    }

    pub fn next_anonymous_name(&mut self) -> String {
        let name = format!("{ANONYMOUS_PREFIX}{}", self.anonymous_counter);
        self.anonymous_counter += 1;
        debug!(name = %name, "allocated anonymous package");
        name
    }

    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    pub fn location(&self, span: Span) -> Location {
        match self.sources.get(span.file_id) {
            Some(file) => file.location(span),
            None => Location {
                file: self.root_dir.clone(),
                line: 1,
                column: 1,
                snippet: String::new(),
                span,
            },
        }
    }
}

/// Join `requested` onto `directory` lexically. Empty and `.` segments are
/// dropped so doubled separators collapse; `..` removes a preceding name.
pub fn resolve_include(directory: &Path, requested: &str) -> PathBuf {
    let mut resolved = directory.to_path_buf();
    for part in requested.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if matches!(resolved.components().next_back(), Some(Component::Normal(_))) {
                    resolved.pop();
                } else {
                    resolved.push("..");
                }
            }
            name => resolved.push(name),
        }
    }
    resolved
}
