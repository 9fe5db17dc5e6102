//! Postfix expressions: call, member access, index, postfix `++`/`--`.

use scvd_diagnostic::{Diagnostic, ErrorCode};
use scvd_ir::{ExprId, ExprKind, ExprList, Intrinsic, Span, TokenKind, UpdateOp};

use crate::Parser;

impl Parser<'_> {
    pub(super) fn parse_postfix(&mut self) -> ExprId {
        let mut expr = self.parse_primary();

        loop {
            if self.cursor.check_punct("(") {
                expr = self.parse_call(expr);
            } else if self.cursor.check_punct(".") {
                expr = self.parse_member(expr);
            } else if self.cursor.check_punct("[") {
                let open = self.cursor.advance().span;
                let index = self.parse_expr();
                let close = self.expect_closing("]", '[', open);
                let span = self.span_of(expr).merge(close);
                expr = self.alloc(ExprKind::Index { base: expr, index }, span);
            } else if let Some(op) = self.cursor.current_punct().and_then(UpdateOp::from_symbol) {
                let op_span = self.cursor.advance().span;
                self.check_target(expr, op.as_symbol());
                let span = self.span_of(expr).merge(op_span);
                expr = self.alloc(
                    ExprKind::Update {
                        op,
                        prefix: false,
                        target: expr,
                    },
                    span,
                );
            } else {
                break;
            }
        }

        expr
    }

    /// `callee(args)`. A bare identifier naming an intrinsic produces an
    /// intrinsic call whose arguments may be colon paths.
    fn parse_call(&mut self, callee: ExprId) -> ExprId {
        let open = self.cursor.advance().span;
        let intrinsic = match self.arena.kind(callee) {
            ExprKind::Ident(name) => Intrinsic::from_name(name),
            _ => None,
        };

        let args = self.parse_args(intrinsic.is_some(), open);
        let span = self.span_of(callee).merge(self.cursor.previous_span());

        match intrinsic {
            Some(intrinsic) => self.alloc(ExprKind::Intrinsic { intrinsic, args }, span),
            None => self.alloc(ExprKind::Call { callee, args }, span),
        }
    }

    /// Comma-separated arguments up to and including `)`.
    fn parse_args(&mut self, colon_paths: bool, open: Span) -> ExprList {
        let mut args = ExprList::new();
        if self.cursor.eat_punct(")") {
            return args;
        }

        loop {
            let arg = if colon_paths && self.colon_path_len() > 0 {
                self.parse_colon_path()
            } else {
                self.parse_expr()
            };
            args.push(arg);
            if !self.cursor.eat_punct(",") {
                break;
            }
        }

        self.expect_closing(")", '(', open);
        args
    }

    /// Number of tokens in a colon path `ident(:ident)+` starting at the
    /// cursor, provided it is followed by `,` or `)`. Zero otherwise.
    fn colon_path_len(&self) -> usize {
        if self.cursor.peek(0).kind != TokenKind::Identifier {
            return 0;
        }
        let mut n = 1;
        while self.cursor.peek(n).is_punct(":")
            && self.cursor.peek(n + 1).kind == TokenKind::Identifier
        {
            n += 2;
        }
        let next = self.cursor.peek(n);
        if n > 1 && (next.is_punct(",") || next.is_punct(")")) {
            n
        } else {
            0
        }
    }

    /// Join a colon path into one identifier, e.g. `TCB:state`.
    fn parse_colon_path(&mut self) -> ExprId {
        let len = self.colon_path_len();
        let mut name = String::new();
        let mut span = self.cursor.current_span();
        for _ in 0..len {
            let token = self.cursor.advance();
            name.push_str(&token.text);
            span = span.merge(token.span);
        }
        self.alloc(ExprKind::Ident(name), span)
    }

    /// `base.name`
    fn parse_member(&mut self, base: ExprId) -> ExprId {
        self.cursor.advance();
        if self.cursor.check_kind(TokenKind::Identifier) {
            let token = self.cursor.advance();
            let span = self.span_of(base).merge(token.span);
            return self.alloc(
                ExprKind::Member {
                    base,
                    name: token.text,
                },
                span,
            );
        }

        let token = self.cursor.current().clone();
        self.error(
            Diagnostic::error(ErrorCode::E1004)
                .with_message(format!("expected member name after `.`, found `{}`", token.text))
                .with_label(token.span, "expected identifier"),
        );
        let span = self.span_of(base).merge(self.cursor.previous_span());
        self.error_node(span)
    }
}
