pub mod token;
pub use token::{is_keyword, Token, TokenKind};

use std::rc::Rc;

use logos::Logos;

use crate::diagnostics::ConfError;
use crate::source_map::SourceFile;
use crate::span::{Span, Spanned};

/// Lazily tokenizes one file. The position only moves forward on success,
/// so a failed `next_token` can be retried and fails the same way.
pub struct Lexer {
    file: Rc<SourceFile>,
    file_id: u32,
    pos: usize,
}

impl Lexer {
    pub fn new(file: Rc<SourceFile>, file_id: u32) -> Self {
        Self { file, file_id, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Rewind to the start of the text.
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    pub fn next_token(&mut self) -> Result<Spanned<Token>, ConfError> {
        let text = self.file.text();
        let mut lexer = Token::lexer(&text[self.pos..]);

        match lexer.next() {
            None => {
                let end = text.len();
                self.pos = end;
                Ok(Spanned::new(Token::Eof, Span::with_file(end, end, self.file_id)))
            }
            Some(Ok(tok)) => {
                let range = lexer.span();
                let span = Span::with_file(self.pos + range.start, self.pos + range.end, self.file_id);
                self.pos = span.end;
                Ok(Spanned::new(tok, span))
            }
            Some(Err(())) => {
                let start = self.pos + lexer.span().start;
                let ch = text[start..].chars().next().unwrap_or('\0');
                let span = Span::with_file(start, start + ch.len_utf8(), self.file_id);
                Err(ConfError::lexical(ch, self.file.location(span)))
            }
        }
    }

    /// Lex the whole file, including the trailing `Eof`, then rewind.
    pub fn tokenize(&mut self) -> Result<Vec<Spanned<Token>>, ConfError> {
        let mut tokens = Vec::new();
        let result = loop {
            match self.next_token() {
                Ok(tok) => {
                    let done = tok.node == Token::Eof;
                    tokens.push(tok);
                    if done {
                        break Ok(tokens);
                    }
                }
                Err(err) => break Err(err),
            }
        };
        self.reset();
        result
    }
}

/// Lex an in-memory source into tokens ending in exactly one `Eof`.
pub fn lex(source: &str) -> Result<Vec<Spanned<Token>>, ConfError> {
    let file = Rc::new(SourceFile::new("<input>", source));
    Lexer::new(file, 0).tokenize()
}
