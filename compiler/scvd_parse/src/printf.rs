//! Printf-style format texts.
//!
//! A text is a format text when it contains `%%` or a `%spec[` opener, where
//! `spec` is one of `d u t x C E I J N M S T U` and whitespace may separate
//! the letter from the bracket. Segments:
//!
//! - literal text, with `%%` reduced to `%`
//! - `%spec[expr]`, where `expr` is parsed into the same arena with spans
//!   relative to the whole text
//!
//! Inside the brackets, nested `[`/`]` and quoted strings are skipped when
//! looking for the closing bracket. If no closing bracket exists, the rest of
//! the text is the inner expression and a warning is recorded.

use scvd_diagnostic::{Diagnostic, ErrorCode};
use scvd_ir::{Expr, ExprArena, ExprId, ExprKind, FormatSpec, PrintfSegment, Span};

use crate::parse_fragment;

/// Check whether `text` should be parsed as a format text.
pub fn is_format_text(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if bytes.get(i + 1) == Some(&b'%') {
                return true;
            }
            if format_opener(text, i).is_some() {
                return true;
            }
        }
        i += 1;
    }
    false
}

/// At a `%` at byte `at`, return the spec and the byte index of `[`.
fn format_opener(text: &str, at: usize) -> Option<(FormatSpec, usize)> {
    let rest = text.get(at + 1..)?;
    let mut chars = rest.char_indices();
    let (_, letter) = chars.next()?;
    let spec = FormatSpec::from_char(letter)?;
    for (offset, c) in chars {
        if c == '[' {
            return Some((spec, at + 1 + offset));
        }
        if !c.is_whitespace() {
            return None;
        }
    }
    None
}

/// Byte index of the `]` closing the bracket opened at `open`.
fn find_closing_bracket(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in text[open..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split `text` into segments, parsing inner expressions into `arena`.
pub(crate) fn segment(
    text: &str,
    arena: &mut ExprArena,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<PrintfSegment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while i < text.len() {
        let Some(c) = text[i..].chars().next() else {
            break;
        };

        if c == '%' {
            if text[i + 1..].starts_with('%') {
                literal.push('%');
                i += 2;
                continue;
            }
            if let Some((spec, open)) = format_opener(text, i) {
                if !literal.is_empty() {
                    segments.push(PrintfSegment::Text(std::mem::take(&mut literal)));
                }
                let inner_start = open + 1;
                let (inner_end, next) = if let Some(close) = find_closing_bracket(text, open) {
                    (close, close + 1)
                } else {
                    diagnostics.push(
                        Diagnostic::warning(ErrorCode::E3001)
                            .with_message(format!("unterminated `{spec}[` in format text"))
                            .with_label(
                                Span::from_range(i..open + 1),
                                "the rest of the text is used as the expression",
                            ),
                    );
                    (text.len(), text.len())
                };
                let base = u32::try_from(inner_start).unwrap_or(u32::MAX);
                let expr = parse_fragment(&text[inner_start..inner_end], base, arena, diagnostics);
                segments.push(PrintfSegment::Format { spec, expr });
                i = next;
                continue;
            }
        }

        literal.push(c);
        i += c.len_utf8();
    }

    if !literal.is_empty() {
        segments.push(PrintfSegment::Text(literal));
    }
    segments
}

/// Parse a whole format text and return the `Printf` root node.
pub(crate) fn parse_format(
    text: &str,
    arena: &mut ExprArena,
    diagnostics: &mut Vec<Diagnostic>,
) -> ExprId {
    let segments = segment(text, arena, diagnostics);
    arena.alloc(Expr::new(
        ExprKind::Printf(segments),
        Span::from_range(0..text.len()),
    ))
}
