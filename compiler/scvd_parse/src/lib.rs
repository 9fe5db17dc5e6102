//! Recursive descent parser for view expressions.
//!
//! `parse(text)` is a pure function of its input and never fails: malformed
//! text still yields an AST (possibly containing `Error` nodes) together with
//! diagnostics. After parsing, constants are folded bottom-up and the free
//! identifiers are collected.
//!
//! # Module Structure
//!
//! - `cursor.rs`: Token navigation
//! - `grammar/`: Expression grammar (precedence chain, postfix, primary)
//! - `printf.rs`: Format text detection and segmentation
//! - `fold.rs`: Constant folding
//! - `symbols.rs`: External symbol collection

mod cursor;
mod fold;
mod grammar;
mod printf;
mod symbols;

pub use cursor::Cursor;
pub use printf::is_format_text;

use scvd_diagnostic::{Diagnostic, ErrorCode, Severity};
use scvd_ir::{Expr, ExprArena, ExprId, ExprKind, Scalar, Span, Token};

/// Everything known about one expression text after parsing.
///
/// Immutable once built; statement nodes share it behind an `Arc`.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseResult {
    /// The text that was parsed.
    pub text: String,
    pub arena: ExprArena,
    pub root: ExprId,
    /// Ordered, non-fatal findings.
    pub diagnostics: Vec<Diagnostic>,
    /// Free identifiers, unique and sorted. Intrinsic names, `true`/`false`
    /// and colon paths are not included.
    pub external_symbols: Vec<String>,
    /// The text was treated as a printf-style format string.
    pub is_printf: bool,
    /// Folded value of the whole expression, if constant.
    pub constant: Option<Scalar>,
}

impl ParseResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn is_constant(&self) -> bool {
        self.constant.is_some()
    }

    #[inline]
    pub fn root_expr(&self) -> &Expr {
        self.arena.get(self.root)
    }
}

/// Parse one expression or format text.
pub fn parse(text: &str) -> ParseResult {
    let mut arena = ExprArena::new();
    let mut diagnostics = Vec::new();

    let is_printf = printf::is_format_text(text);
    let root = if is_printf {
        printf::parse_format(text, &mut arena, &mut diagnostics)
    } else {
        parse_fragment(text, 0, &mut arena, &mut diagnostics)
    };

    fold::fold_constants(&mut arena, &mut diagnostics);
    let constant = arena.constant(root).cloned();
    let external_symbols = symbols::external_symbols(&arena, root);

    tracing::debug!(
        text,
        nodes = arena.len(),
        diagnostics = diagnostics.len(),
        is_printf,
        constant = ?constant,
        "parsed expression"
    );

    ParseResult {
        text: text.to_owned(),
        arena,
        root,
        diagnostics,
        external_symbols,
        is_printf,
        constant,
    }
}

/// Parse `text` as a single expression into `arena`.
///
/// `base` is the byte offset of `text` within the whole expression text, so
/// spans of printf inner expressions point into the format string.
pub(crate) fn parse_fragment(
    text: &str,
    base: u32,
    arena: &mut ExprArena,
    diagnostics: &mut Vec<Diagnostic>,
) -> ExprId {
    let lexed = scvd_lexer::lex_at(text, base);
    diagnostics.extend(lexed.diagnostics);
    let mut parser = Parser::new(lexed.tokens, arena, diagnostics);
    parser.parse_root()
}

/// Parser state for one fragment.
pub(crate) struct Parser<'a> {
    cursor: Cursor,
    arena: &'a mut ExprArena,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(
        tokens: Vec<Token>,
        arena: &'a mut ExprArena,
        diagnostics: &'a mut Vec<Diagnostic>,
    ) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            arena,
            diagnostics,
        }
    }

    /// Parse a complete fragment: one expression followed by end of input.
    fn parse_root(&mut self) -> ExprId {
        if self.cursor.is_at_end() {
            let span = self.cursor.current_span();
            self.error(
                Diagnostic::error(ErrorCode::E1006)
                    .with_message("empty expression")
                    .with_label(span, "expected an expression"),
            );
            return self.error_node(span);
        }

        let root = self.parse_expr();

        if !self.cursor.is_at_end() {
            let token = self.cursor.current().clone();
            self.error(scvd_diagnostic::unexpected_token(
                token.span,
                "end of expression",
                &token.text,
            ));
        }
        root
    }

    #[inline]
    fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.arena.alloc(Expr::new(kind, span))
    }

    #[inline]
    fn error_node(&mut self, span: Span) -> ExprId {
        self.alloc(ExprKind::Error, span)
    }

    #[inline]
    fn span_of(&self, id: ExprId) -> Span {
        self.arena.span(id)
    }

    #[inline]
    fn error(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Require the closing delimiter `close` for an `open` seen at `open_span`.
    fn expect_closing(&mut self, close: &str, open: char, open_span: Span) -> Span {
        if self.cursor.check_punct(close) {
            return self.cursor.advance().span;
        }
        let here = self.cursor.current_span();
        self.error(scvd_diagnostic::unclosed_delimiter(open_span, here, open));
        Span::point(here.start)
    }
}
