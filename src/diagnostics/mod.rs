use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;

use thiserror::Error;

use crate::source_map::SourceMap;
use crate::span::Span;

/// Where a positional error happened. Line and column are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
    pub snippet: String,
    pub span: Span,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

#[derive(Debug, Error)]
pub enum ConfError {
    #[error("Lexical error: unexpected character '{ch}' at {location}: `{}`", location.snippet)]
    Lexical { ch: char, location: Location },

    #[error("Syntax error: expected {expected}, found {found} at {location}: `{}`", location.snippet)]
    Syntax { expected: String, found: String, location: Location },

    #[error(
        "Include error: could not find '{requested}' (resolved to '{}') included from '{}'",
        resolved.display(),
        issuer.display()
    )]
    IncludeNotFound {
        requested: String,
        resolved: PathBuf,
        issuer: PathBuf,
        location: Option<Location>,
    },

    #[error("Structural error: {msg} at {location}")]
    Structural { msg: String, location: Location },

    #[error("I/O error: could not read '{}': {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("Manifest error: {msg} ({})", path.display())]
    Manifest { msg: String, path: PathBuf },

    #[error("Reference error: {msg}")]
    Reference { msg: String },

    #[error("Watch error: {msg}")]
    Watch { msg: String },
}

impl ConfError {
    pub fn lexical(ch: char, location: Location) -> Self {
        Self::Lexical { ch, location }
    }

    pub fn syntax(expected: impl Into<String>, found: impl fmt::Display, location: Location) -> Self {
        Self::Syntax { expected: expected.into(), found: found.to_string(), location }
    }

    pub fn structural(msg: impl Into<String>, location: Location) -> Self {
        Self::Structural { msg: msg.into(), location }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn manifest(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Manifest { msg: msg.into(), path }
    }

    pub fn reference(msg: impl Into<String>) -> Self {
        Self::Reference { msg: msg.into() }
    }

    pub fn watch(msg: impl Into<String>) -> Self {
        Self::Watch { msg: msg.into() }
    }

    /// The source position of the error, if it has one.
    pub fn location(&self) -> Option<&Location> {
        match self {
            ConfError::Lexical { location, .. }
            | ConfError::Syntax { location, .. }
            | ConfError::Structural { location, .. } => Some(location),
            ConfError::IncludeNotFound { location, .. } => location.as_ref(),
            _ => None,
        }
    }
}

/// Render a ConfError with ariadne for nice terminal output.
pub fn render_error(err: &ConfError, sources: &SourceMap) {
    if write_error(err, sources, true, std::io::stderr()).is_err() {
        eprintln!("error: {err}");
    }
}

/// Write the report for `err` to `out`. Positional errors get a labelled
/// snippet keyed by the file they occurred in.
pub fn write_error<W: Write>(err: &ConfError, sources: &SourceMap, color: bool, mut out: W) -> io::Result<()> {
    use ariadne::{Config, IndexType, Label, Report, ReportKind, Source};

    let located = err
        .location()
        .and_then(|loc| sources.get(loc.span.file_id).map(|file| (loc, file)));

    let Some((loc, file)) = located else {
        return writeln!(out, "error: {err}");
    };

    let kind_str = match err {
        ConfError::Lexical { .. } => "lexical",
        ConfError::Syntax { .. } => "syntax",
        ConfError::IncludeNotFound { .. } => "include",
        _ => "structural",
    };
    // Spans are byte offsets.
    let text = file.text();
    let end = loc.span.end.max(loc.span.start + 1).min(text.len().max(1));
    let start = loc.span.start.min(end);
    let id = loc.file.display().to_string();

    Report::build(ReportKind::Error, id.clone(), start)
        .with_config(Config::default().with_index_type(IndexType::Byte).with_color(color))
        .with_message(format!("{kind_str} error in {id}"))
        .with_label(Label::new((id.clone(), start..end)).with_message(err.to_string()))
        .finish()
        .write((id, Source::from(text.to_string())), &mut out)
}
