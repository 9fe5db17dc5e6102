//! String literal cooking.
//!
//! Valid escapes: `\n` `\t` `\r` `\0` `\\` `\'` `\"` `\xHH`. An unknown escape
//! keeps the escaped character and records a warning.

use scvd_diagnostic::{Diagnostic, ErrorCode};
use scvd_ir::Span;

#[inline]
fn resolve_escape(c: char) -> Option<char> {
    match c {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        '0' => Some('\0'),
        '\\' => Some('\\'),
        '\'' => Some('\''),
        '"' => Some('"'),
        _ => None,
    }
}

/// Cook the raw text of a string token (opening quote included).
///
/// Stops at the first unescaped matching quote, so the raw text of an
/// unterminated literal cooks to everything after the opening quote.
/// Warnings for bad escapes are pushed into `diagnostics` with spans relative
/// to `span.start`.
pub fn cook_string(raw: &str, span: Span, diagnostics: &mut Vec<Diagnostic>) -> String {
    let mut chars = raw.char_indices();
    let Some((_, quote)) = chars.next() else {
        return String::new();
    };

    let mut result = String::with_capacity(raw.len());
    while let Some((i, c)) = chars.next() {
        if c == quote {
            break;
        }
        if c != '\\' {
            result.push(c);
            continue;
        }
        let Some((j, esc)) = chars.next() else {
            // Lone trailing backslash in an unterminated literal.
            result.push('\\');
            break;
        };
        if let Some(resolved) = resolve_escape(esc) {
            result.push(resolved);
            continue;
        }
        if esc == 'x' {
            let hex: String = raw[j + 1..].chars().take(2).collect();
            if hex.len() == 2 && hex.chars().all(|h| h.is_ascii_hexdigit()) {
                if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                    result.push(char::from(byte));
                    chars.next();
                    chars.next();
                    continue;
                }
            }
        }
        let esc_span = Span::from_range(i..j + esc.len_utf8()).offset_by(span.start);
        diagnostics.push(
            Diagnostic::warning(ErrorCode::E0005)
                .with_message(format!("unknown escape sequence `\\{esc}`"))
                .with_label(esc_span, "escape kept as the literal character"),
        );
        result.push(esc);
    }
    result
}
