//! Expression parsing.
//!
//! Precedence chain, lowest first: assignment (right-assoc), conditional
//! (right-assoc), binary operators by [`BinaryOp::precedence`], prefix
//! operators, postfix operators, primary expressions.
//!
//! # Module Structure
//!
//! - `mod.rs`: Entry point (`parse_expr`), conditional, binary and prefix
//! - `postfix.rs`: Call, member, index, postfix `++`/`--`, colon paths
//! - `primary.rs`: Literals, identifiers, parenthesised expressions

mod postfix;
mod primary;

use scvd_ir::{AssignOp, BinaryOp, ExprId, ExprKind, UnaryOp, UpdateOp};
use scvd_stack::ensure_sufficient_stack;

use crate::Parser;

impl Parser<'_> {
    /// Parse an expression, including assignment.
    ///
    /// Uses `ensure_sufficient_stack` to prevent stack overflow on deeply
    /// nested input.
    pub(crate) fn parse_expr(&mut self) -> ExprId {
        ensure_sufficient_stack(|| self.parse_assignment())
    }

    /// `target op= value`, right-associative.
    fn parse_assignment(&mut self) -> ExprId {
        let target = self.parse_conditional();

        let Some(op) = self.cursor.current_punct().and_then(AssignOp::from_symbol) else {
            return target;
        };
        self.cursor.advance();

        self.check_target(target, &op.as_symbol());
        let value = self.parse_expr();
        let span = self.span_of(target).merge(self.span_of(value));
        self.alloc(ExprKind::Assign { op, target, value }, span)
    }

    /// `cond ? a : b`, right-associative. The middle branch is a full
    /// expression.
    fn parse_conditional(&mut self) -> ExprId {
        let cond = self.parse_binary(1);
        if !self.cursor.eat_punct("?") {
            return cond;
        }

        let then_branch = self.parse_expr();
        let else_branch = if self.cursor.eat_punct(":") {
            ensure_sufficient_stack(|| self.parse_conditional())
        } else {
            let token = self.cursor.current().clone();
            self.error(scvd_diagnostic::unexpected_token(
                token.span,
                "`:` in conditional expression",
                &token.text,
            ));
            self.error_node(token.span)
        };

        let span = self.span_of(cond).merge(self.span_of(else_branch));
        self.alloc(
            ExprKind::Conditional {
                cond,
                then_branch,
                else_branch,
            },
            span,
        )
    }

    /// Precedence climbing over all left-associative binary operators.
    fn parse_binary(&mut self, min_precedence: u8) -> ExprId {
        let mut left = self.parse_unary();

        while let Some(op) = self.current_binary_op() {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            self.cursor.advance();
            let right = self.parse_binary(precedence + 1);
            let span = self.span_of(left).merge(self.span_of(right));
            left = self.alloc(ExprKind::Binary { op, left, right }, span);
        }

        left
    }

    fn current_binary_op(&self) -> Option<BinaryOp> {
        self.cursor.current_punct().and_then(BinaryOp::from_symbol)
    }

    /// Prefix `+ - ! ~` and prefix `++`/`--`.
    fn parse_unary(&mut self) -> ExprId {
        ensure_sufficient_stack(|| self.parse_unary_inner())
    }

    fn parse_unary_inner(&mut self) -> ExprId {
        let start = self.cursor.current_span();

        if let Some(op) = self.cursor.current_punct().and_then(UpdateOp::from_symbol) {
            self.cursor.advance();
            let target = self.parse_unary();
            self.check_target(target, op.as_symbol());
            let span = start.merge(self.span_of(target));
            return self.alloc(
                ExprKind::Update {
                    op,
                    prefix: true,
                    target,
                },
                span,
            );
        }

        if let Some(op) = self.cursor.current_punct().and_then(UnaryOp::from_symbol) {
            self.cursor.advance();
            let operand = self.parse_unary();
            let span = start.merge(self.span_of(operand));
            return self.alloc(ExprKind::Unary { op, operand }, span);
        }

        self.parse_postfix()
    }

    /// Record a diagnostic if `target` cannot be assigned. The node is kept;
    /// evaluating it fails at runtime.
    fn check_target(&mut self, target: ExprId, operator: &str) {
        let kind = self.arena.kind(target);
        if !kind.is_lvalue() && *kind != ExprKind::Error {
            let span = self.span_of(target);
            self.error(scvd_diagnostic::invalid_target(span, operator));
        }
    }
}
