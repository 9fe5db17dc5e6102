//! Lexer for view expressions using logos.
//!
//! Produces a flat token list ending in `End`. Operators and delimiters are
//! all `Punctuation`; logos' longest-match rule gives `>>>=` precedence over
//! `>>>`, `>>=` and `>>`. Number and string tokens keep their raw text and are
//! decoded by [`decode_number`] and [`cook_string`] when the parser needs the
//! value.

mod escape;
mod number;

use logos::Logos;
use scvd_diagnostic::{Diagnostic, ErrorCode};
use scvd_ir::{Span, Token, TokenKind};

pub use escape::cook_string;
pub use number::{decode_number, NumberError};

/// Whether a string literal reached its closing quote.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Quoted {
    Closed,
    Unclosed,
}

/// Raw token from logos.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    // Assignment
    #[token(">>>=")]
    #[token(">>=")]
    #[token("<<=")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("%=")]
    #[token("&=")]
    #[token("^=")]
    #[token("|=")]
    #[token("=")]
    // Update
    #[token("++")]
    #[token("--")]
    // Logical and comparison
    #[token("&&")]
    #[token("||")]
    #[token("==")]
    #[token("!=")]
    #[token("<=")]
    #[token(">=")]
    #[token("<")]
    #[token(">")]
    // Shift
    #[token(">>>")]
    #[token(">>")]
    #[token("<<")]
    // Arithmetic and bitwise
    #[token("+")]
    #[token("-")]
    #[token("*")]
    #[token("/")]
    #[token("%")]
    #[token("&")]
    #[token("|")]
    #[token("^")]
    #[token("!")]
    #[token("~")]
    // Delimiters
    #[token("?")]
    #[token(":")]
    #[token(",")]
    #[token(".")]
    #[token(";")]
    #[token("(")]
    #[token(")")]
    #[token("[")]
    #[token("]")]
    Punct,

    #[regex(r"0[xX][0-9a-fA-F_]*[uUlL]*")]
    #[regex(r"0[bB][0-9_]*[uUlL]*")]
    #[regex(r"0[oO][0-9_]*[uUlL]*")]
    #[regex(r"[0-9][0-9_]*[uUlL]*")]
    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    Number,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[token("\"", |lex| scan_quoted(lex, '"'))]
    #[token("'", |lex| scan_quoted(lex, '\''))]
    Str(Quoted),
}

/// Consume a string body up to and including the closing `quote`.
fn scan_quoted(lex: &mut logos::Lexer<RawToken>, quote: char) -> Quoted {
    let rest = lex.remainder();
    let mut escaped = false;
    for (i, c) in rest.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            lex.bump(i + c.len_utf8());
            return Quoted::Closed;
        }
    }
    lex.bump(rest.len());
    Quoted::Unclosed
}

/// Tokens and lexer diagnostics for one text.
#[derive(Clone, Debug, Default)]
pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Lex `source` into tokens. The last token is always `End`.
pub fn lex(source: &str) -> LexOutput {
    lex_at(source, 0)
}

/// Lex a fragment whose first byte sits at `base` in a larger text.
///
/// Used for printf inner expressions so spans point into the whole format
/// string.
pub fn lex_at(source: &str, base: u32) -> LexOutput {
    let mut output = LexOutput::default();
    let mut logos = RawToken::lexer(source);

    while let Some(token_result) = logos.next() {
        let span = Span::from_range(logos.span()).offset_by(base);
        let slice = logos.slice();

        let kind = match token_result {
            Ok(RawToken::Punct) => TokenKind::Punctuation,
            Ok(RawToken::Number) => TokenKind::Number,
            Ok(RawToken::Ident) => TokenKind::Identifier,
            Ok(RawToken::Str(quoted)) => {
                if quoted == Quoted::Unclosed {
                    output.diagnostics.push(
                        Diagnostic::error(ErrorCode::E0001)
                            .with_message("unterminated string literal")
                            .with_label(span, "string starts here"),
                    );
                }
                TokenKind::String
            }
            Err(()) => TokenKind::Unknown,
        };
        output.tokens.push(Token::new(kind, slice, span));
    }

    let end = u32::try_from(source.len())
        .unwrap_or(u32::MAX)
        .saturating_add(base);
    output.tokens.push(Token::end(end));
    output
}

#[cfg(test)]
mod tests;
