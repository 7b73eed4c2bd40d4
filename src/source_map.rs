use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::diagnostics::Location;
use crate::span::Span;

/// Characters of context taken on each side of an offset for diagnostics.
const SNIPPET_RADIUS: usize = 10;

/// One loaded configuration file plus a line index for diagnostics.
#[derive(Debug)]
pub struct SourceFile {
    path: PathBuf,
    text: String,
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { path: path.into(), text, line_starts }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// 1-based line and column (in characters) of a byte offset.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.text.len());
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1];
        let column = self.text[line_start..offset].chars().count() + 1;
        (line, column)
    }

    /// Up to ten characters on either side of `offset`.
    pub fn snippet(&self, offset: usize) -> String {
        let offset = offset.min(self.text.len());
        let before: Vec<char> = self.text[..offset].chars().rev().take(SNIPPET_RADIUS).collect();
        let after = self.text[offset..].chars().take(SNIPPET_RADIUS);
        before.into_iter().rev().chain(after).collect()
    }

    pub fn location(&self, span: Span) -> Location {
        let (line, column) = self.line_col(span.start);
        Location {
            file: self.path.clone(),
            line,
            column,
            snippet: self.snippet(span.start),
            span,
        }
    }
}

/// Maps file_id -> loaded file. A file included twice is added twice.
#[derive(Debug, Default)]
pub struct SourceMap {
    files: Vec<Rc<SourceFile>>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: PathBuf, text: String) -> (u32, Rc<SourceFile>) {
        let id = self.files.len() as u32;
        let file = Rc::new(SourceFile::new(path, text));
        self.files.push(Rc::clone(&file));
        (id, file)
    }

    pub fn get(&self, file_id: u32) -> Option<&SourceFile> {
        self.files.get(file_id as usize).map(|f| f.as_ref())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
