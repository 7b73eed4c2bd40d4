pub mod span;
pub mod source_map;
pub mod diagnostics;
pub mod lexer;
pub mod session;
pub mod parser;
pub mod check;
pub mod config;
pub mod watch;

use std::path::Path;

use diagnostics::ConfError;
use parser::ast::App;
use parser::Parser;
use session::Session;

/// Parse `entry` (relative to the session's root directory) and everything
/// it includes. On error the session still holds the loaded sources for
/// rendering diagnostics.
pub fn parse_file(session: &mut Session, entry: impl AsRef<Path>) -> Result<App, ConfError> {
    session.open(entry)?;
    Parser::new(session).parse()
}

/// Parse an in-memory root file named `name`; its includes resolve against
/// the session's root directory.
pub fn parse_source(session: &mut Session, name: impl AsRef<Path>, text: impl Into<String>) -> Result<App, ConfError> {
    session.open_source(name, text)?;
    Parser::new(session).parse()
}

/// Parse a standalone source string with the current directory as root.
pub fn parse_str(text: &str) -> Result<App, ConfError> {
    let mut session = Session::new(".");
    parse_source(&mut session, "<input>", text)
}
