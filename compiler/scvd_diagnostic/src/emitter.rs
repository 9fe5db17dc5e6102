//! Plain-text rendering of diagnostics against their source text.
//!
//! Expression texts are single attribute values, usually one line, so the
//! snippet is the line holding the primary span with a caret underline.

use std::fmt::Write;

use crate::{Diagnostic, Severity};

/// ANSI color codes for terminal output.
mod colors {
    pub const ERROR: &str = "\x1b[1;31m";
    pub const WARNING: &str = "\x1b[1;33m";
    pub const INFO: &str = "\x1b[1;36m";
    pub const RESET: &str = "\x1b[0m";
}

/// Render one diagnostic with a source snippet.
pub fn render(diagnostic: &Diagnostic, source: &str, use_colors: bool) -> String {
    let mut out = String::new();
    let (start, end) = if use_colors {
        let color = match diagnostic.severity {
            Severity::Error => colors::ERROR,
            Severity::Warning => colors::WARNING,
            Severity::Info => colors::INFO,
        };
        (color, colors::RESET)
    } else {
        ("", "")
    };
    let message = if diagnostic.message.is_empty() {
        diagnostic.code.description()
    } else {
        &diagnostic.message
    };
    let _ = write!(
        out,
        "{start}{}[{}]{end}: {message}",
        diagnostic.severity, diagnostic.code
    );

    if let Some(span) = diagnostic.primary_span() {
        let offset = (span.start as usize).min(source.len());
        let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
        let line_end = source[offset..]
            .find('\n')
            .map_or(source.len(), |i| offset + i);
        let line = &source[line_start..line_end];
        let column = source[line_start..offset].chars().count();
        let width = source
            .get(offset..(span.end as usize).min(line_end))
            .map_or(0, |s| s.chars().count())
            .max(1);
        let _ = write!(
            out,
            "\n  | {line}\n  | {}{start}{}{end}",
            " ".repeat(column),
            "^".repeat(width)
        );
        if let Some(label) = diagnostic.labels.iter().find(|l| l.primary) {
            if !label.message.is_empty() {
                let _ = write!(out, " {}", label.message);
            }
        }
    }

    for note in &diagnostic.notes {
        let _ = write!(out, "\n  = note: {note}");
    }
    out
}

/// Render all diagnostics, separated by blank lines, with a summary line.
pub fn render_all(diagnostics: &[Diagnostic], source: &str, use_colors: bool) -> String {
    let mut out = String::new();
    for diagnostic in diagnostics {
        out.push_str(&render(diagnostic, source, use_colors));
        out.push_str("\n\n");
    }
    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    let warnings = diagnostics.iter().filter(|d| d.is_warning()).count();
    if errors + warnings > 0 {
        let _ = write!(
            out,
            "{errors} error{}, {warnings} warning{}",
            plural_s(errors),
            plural_s(warnings)
        );
    }
    out
}

#[inline]
fn plural_s(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
