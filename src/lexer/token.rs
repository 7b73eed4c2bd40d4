use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    // Keywords
    #[token("requires")]
    Requires,
    #[token("package")]
    Package,
    #[token("directory")]
    Directory,
    #[token("file")]
    File,
    #[token("option")]
    Option,
    #[token("routes")]
    Routes,
    #[token("ui")]
    Ui,
    #[token("template")]
    Template,
    #[token("assets")]
    Assets,
    #[token("javascript")]
    Javascript,
    #[token("stylesheets")]
    Stylesheets,
    #[token("layout")]
    Layout,
    #[token("middleware")]
    Middleware,
    #[token("error404")]
    Error404,
    #[token("index")]
    Index,
    #[token("private")]
    Private,
    #[token("dialog")]
    Dialog,
    #[token("include")]
    Include,

    // Single-quoted value, no escapes. An unterminated quote runs to end of text.
    #[regex(r"'[^']*'?", |lex| {
        let s = &lex.slice()[1..];
        s.strip_suffix('\'').unwrap_or(s).to_string()
    })]
    Value(String),

    // Punctuation
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,

    #[regex(r"//[^\n]*", |lex| lex.slice()[2..].trim().to_string())]
    Comment(String),

    // Produced by the lexer at end of text, never matched.
    Eof,
}

/// Payload-free token kind, used for grammar decisions and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Requires,
    Package,
    Directory,
    File,
    Option,
    Routes,
    Ui,
    Template,
    Assets,
    Javascript,
    Stylesheets,
    Layout,
    Middleware,
    Error404,
    Index,
    Private,
    Dialog,
    Include,
    Value,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Comma,
    Semicolon,
    Comment,
    Eof,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Requires => TokenKind::Requires,
            Token::Package => TokenKind::Package,
            Token::Directory => TokenKind::Directory,
            Token::File => TokenKind::File,
            Token::Option => TokenKind::Option,
            Token::Routes => TokenKind::Routes,
            Token::Ui => TokenKind::Ui,
            Token::Template => TokenKind::Template,
            Token::Assets => TokenKind::Assets,
            Token::Javascript => TokenKind::Javascript,
            Token::Stylesheets => TokenKind::Stylesheets,
            Token::Layout => TokenKind::Layout,
            Token::Middleware => TokenKind::Middleware,
            Token::Error404 => TokenKind::Error404,
            Token::Index => TokenKind::Index,
            Token::Private => TokenKind::Private,
            Token::Dialog => TokenKind::Dialog,
            Token::Include => TokenKind::Include,
            Token::Value(_) => TokenKind::Value,
            Token::LBrace => TokenKind::LBrace,
            Token::RBrace => TokenKind::RBrace,
            Token::LBracket => TokenKind::LBracket,
            Token::RBracket => TokenKind::RBracket,
            Token::Colon => TokenKind::Colon,
            Token::Comma => TokenKind::Comma,
            Token::Semicolon => TokenKind::Semicolon,
            Token::Comment(_) => TokenKind::Comment,
            Token::Eof => TokenKind::Eof,
        }
    }
}

/// Returns true if the given word is a configuration keyword.
pub fn is_keyword(s: &str) -> bool {
    matches!(s, "requires" | "package" | "directory" | "file" | "option" | "routes" | "ui"
        | "template" | "assets" | "javascript" | "stylesheets" | "layout" | "middleware"
        | "error404" | "index" | "private" | "dialog" | "include")
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Requires => write!(f, "'requires'"),
            TokenKind::Package => write!(f, "'package'"),
            TokenKind::Directory => write!(f, "'directory'"),
            TokenKind::File => write!(f, "'file'"),
            TokenKind::Option => write!(f, "'option'"),
            TokenKind::Routes => write!(f, "'routes'"),
            TokenKind::Ui => write!(f, "'ui'"),
            TokenKind::Template => write!(f, "'template'"),
            TokenKind::Assets => write!(f, "'assets'"),
            TokenKind::Javascript => write!(f, "'javascript'"),
            TokenKind::Stylesheets => write!(f, "'stylesheets'"),
            TokenKind::Layout => write!(f, "'layout'"),
            TokenKind::Middleware => write!(f, "'middleware'"),
            TokenKind::Error404 => write!(f, "'error404'"),
            TokenKind::Index => write!(f, "'index'"),
            TokenKind::Private => write!(f, "'private'"),
            TokenKind::Dialog => write!(f, "'dialog'"),
            TokenKind::Include => write!(f, "'include'"),
            TokenKind::Value => write!(f, "quoted value"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Comment => write!(f, "comment"),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Value(s) => write!(f, "'{s}'"),
            Token::Comment(s) => write!(f, "// {s}"),
            other => write!(f, "{}", other.kind()),
        }
    }
}
