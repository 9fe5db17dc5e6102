//! Token cursor for navigating the token stream.

use scvd_ir::{Span, Token, TokenKind};

/// Cursor over one fragment's tokens.
///
/// Invariant: the token list is non-empty and ends with `End`, and the
/// position never moves past that last token.
pub struct Cursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl Cursor {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(Token::is_end) {
            let end = tokens.last().map_or(0, |t| t.span.end);
            tokens.push(Token::end(end));
        }
        Cursor { tokens, pos: 0 }
    }

    #[inline]
    pub fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Get the previous token's span.
    #[inline]
    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::DUMMY
        }
    }

    /// Token `n` positions ahead; clamps to the `End` token.
    pub fn peek(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)]
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.current().is_end()
    }

    #[inline]
    pub fn check_kind(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    /// Check if the current token is the punctuation `p`.
    #[inline]
    pub fn check_punct(&self, p: &str) -> bool {
        self.current().is_punct(p)
    }

    /// Text of the current token if it is punctuation.
    #[inline]
    pub fn current_punct(&self) -> Option<&str> {
        let token = self.current();
        (token.kind == TokenKind::Punctuation).then_some(token.text.as_str())
    }

    /// Move to the next token. Stays on `End`.
    pub fn advance(&mut self) -> Token {
        let token = self.current().clone();
        tracing::trace!(kind = ?token.kind, text = %token.text, span = %token.span, "advance");
        if !token.is_end() {
            self.pos += 1;
        }
        token
    }

    /// Consume the punctuation `p` if present.
    pub fn eat_punct(&mut self, p: &str) -> bool {
        if self.check_punct(p) {
            self.advance();
            true
        } else {
            false
        }
    }
}
