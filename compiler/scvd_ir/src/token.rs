//! Lexer output.
//!
//! The token set is deliberately coarse: operators and delimiters are all
//! `Punctuation` and the parser matches on their text. This keeps the lexer a
//! single longest-match table lookup.

use crate::Span;

/// Coarse token category.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    /// End of input. Always the last token.
    End,
    Identifier,
    Number,
    /// String literal; `text` holds the raw source including quotes.
    String,
    /// Operator or delimiter.
    Punctuation,
    /// A character the lexer does not recognize.
    Unknown,
}

/// A token with its raw source text.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Token {
            kind,
            text: text.into(),
            span,
        }
    }

    /// The end-of-input marker at `offset`.
    pub fn end(offset: u32) -> Self {
        Token {
            kind: TokenKind::End,
            text: String::new(),
            span: Span::point(offset),
        }
    }

    /// True if this is the punctuation `p`.
    #[inline]
    pub fn is_punct(&self, p: &str) -> bool {
        self.kind == TokenKind::Punctuation && self.text == p
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.kind == TokenKind::End
    }
}
