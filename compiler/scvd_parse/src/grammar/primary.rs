//! Primary expressions: literals, identifiers, parenthesised expressions.

use scvd_diagnostic::{Diagnostic, ErrorCode};
use scvd_ir::{ExprId, ExprKind, NumericLit, TokenKind};

use crate::Parser;

impl Parser<'_> {
    pub(super) fn parse_primary(&mut self) -> ExprId {
        let token = self.cursor.current().clone();

        match token.kind {
            TokenKind::Number => {
                self.cursor.advance();
                match scvd_lexer::decode_number(&token.text) {
                    Ok(lit) => {
                        if is_inexact_integer(lit, &token.text) {
                            self.error(
                                Diagnostic::info(ErrorCode::E0004)
                                    .with_message(format!(
                                        "integer literal `{}` does not fit in 64 bits",
                                        token.text
                                    ))
                                    .with_label(token.span, "evaluated as a rounded number"),
                            );
                        }
                        self.alloc(ExprKind::Number(lit), token.span)
                    }
                    Err(e) => {
                        self.error(
                            Diagnostic::error(ErrorCode::E0003)
                                .with_message(format!("invalid number literal `{}`", token.text))
                                .with_label(token.span, e.message()),
                        );
                        self.error_node(token.span)
                    }
                }
            }
            TokenKind::String => {
                self.cursor.advance();
                let value = scvd_lexer::cook_string(&token.text, token.span, self.diagnostics);
                self.alloc(ExprKind::Str(value), token.span)
            }
            TokenKind::Identifier => {
                self.cursor.advance();
                let kind = match token.text.as_str() {
                    "true" => ExprKind::Number(NumericLit::Float(1.0)),
                    "false" => ExprKind::Number(NumericLit::Float(0.0)),
                    _ => ExprKind::Ident(token.text),
                };
                self.alloc(kind, token.span)
            }
            TokenKind::Punctuation if token.text == "(" => {
                self.cursor.advance();
                let inner = self.parse_expr();
                self.expect_closing(")", '(', token.span);
                inner
            }
            TokenKind::Unknown => {
                self.cursor.advance();
                self.error(
                    Diagnostic::error(ErrorCode::E0002)
                        .with_message(format!("invalid character `{}`", token.text))
                        .with_label(token.span, "not valid in an expression"),
                );
                self.error_node(token.span)
            }
            TokenKind::Punctuation => {
                // Leave closing delimiters for the construct that expects them.
                if !matches!(token.text.as_str(), ")" | "]" | ":" | ",") {
                    self.cursor.advance();
                }
                self.error(scvd_diagnostic::expected_expression(token.span, &token.text));
                self.error_node(token.span)
            }
            TokenKind::End => {
                self.error(scvd_diagnostic::expected_expression(token.span, ""));
                self.error_node(token.span)
            }
        }
    }
}

/// A decimal integer beyond `u64` decodes to a rounded float.
fn is_inexact_integer(lit: NumericLit, text: &str) -> bool {
    const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;
    matches!(lit, NumericLit::Float(v) if v >= TWO_POW_64) && !text.contains(['.', 'e', 'E'])
}
