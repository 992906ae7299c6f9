//! `{{ Name }}` placeholders in template text.
//!
//! Only `{{` opens a placeholder. Everything else is text, including `{%`,
//! `{#`, lone braces and a `}}` that closes nothing.

use logos::Logos;
use thiserror::Error;

use crate::values::token::{location, Location};

pub const OPEN: &str = "{{";

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(skip r"[ \t]+")]
enum Inner<'i> {
    #[token("}}")]
    Close,

    // `{{ .Name }}` is accepted too
    #[regex(r"\.?[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().trim_start_matches('.'))]
    Ident(&'i str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'i> {
    Text(&'i str),
    /// `at` is the byte offset of the opening `{{`
    Placeholder { name: &'i str, at: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceholderError {
    #[error("template is not valid UTF-8")]
    NotUtf8,

    #[error("unclosed '{{{{' at {0}")]
    Unclosed(Location),

    #[error("expected a placeholder name followed by '}}}}' at {at}, found '{found}'")]
    Malformed { at: Location, found: String },

    #[error("unknown placeholder '{name}' at {at}")]
    Unknown { name: String, at: Location },
}

/// Splits template text into [`Piece`]s, stopping at the first error.
pub struct Placeholders<'i> {
    inp: &'i str,
    pos: usize,
}

impl<'i> Placeholders<'i> {
    #[must_use]
    pub fn new(inp: &'i str) -> Self {
        Placeholders { inp, pos: 0 }
    }

    fn placeholder(&mut self, open: usize) -> Result<Piece<'i>, PlaceholderError> {
        let inp = self.inp;
        let start = open + OPEN.len();
        let mut lex = Inner::lexer(&inp[start..]);

        let name = match lex.next() {
            Some(Ok(Inner::Ident(name))) => name,
            None => return Err(PlaceholderError::Unclosed(location(inp, open))),
            Some(_) => return Err(self.malformed(start + lex.span().start, lex.slice())),
        };

        match lex.next() {
            Some(Ok(Inner::Close)) => {}
            None => return Err(PlaceholderError::Unclosed(location(inp, open))),
            Some(_) => return Err(self.malformed(start + lex.span().start, lex.slice())),
        }

        self.pos = start + lex.span().end;
        Ok(Piece::Placeholder { name, at: open })
    }

    fn malformed(&self, at: usize, found: &str) -> PlaceholderError {
        PlaceholderError::Malformed {
            at: location(self.inp, at),
            found: found.escape_debug().to_string(),
        }
    }
}

impl<'i> Iterator for Placeholders<'i> {
    type Item = Result<Piece<'i>, PlaceholderError>;

    fn next(&mut self) -> Option<Self::Item> {
        let inp = self.inp;
        let rest = &inp[self.pos..];

        if rest.is_empty() {
            return None;
        }

        match rest.find(OPEN) {
            Some(0) => {
                let piece = self.placeholder(self.pos);
                if piece.is_err() {
                    self.pos = self.inp.len();
                }
                Some(piece)
            }
            Some(n) => {
                self.pos += n;
                Some(Ok(Piece::Text(&rest[..n])))
            }
            None => {
                self.pos = inp.len();
                Some(Ok(Piece::Text(rest)))
            }
        }
    }
}

/// Every piece of `inp`, or the first syntax error in it.
///
/// # Errors
///
/// [`PlaceholderError::Unclosed`] or [`PlaceholderError::Malformed`].
pub fn parse(inp: &str) -> Result<Vec<Piece<'_>>, PlaceholderError> {
    Placeholders::new(inp).collect()
}
