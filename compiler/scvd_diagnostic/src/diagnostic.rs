use std::fmt;

use scvd_ir::Span;

use crate::ErrorCode;

/// How serious a finding is. Only `Error` makes a parse result unusable.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A span of the expression text and what to say about it.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
    /// The emitter underlines the first primary label.
    pub primary: bool,
}

/// A parse-time finding attached to an expression text.
///
/// Diagnostics are collected, never thrown: a malformed expression still
/// produces an AST, plus one or more of these.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    fn with_severity(severity: Severity, code: ErrorCode) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn error(code: ErrorCode) -> Self {
        Self::with_severity(Severity::Error, code)
    }

    pub fn warning(code: ErrorCode) -> Self {
        Self::with_severity(Severity::Warning, code)
    }

    pub fn info(code: ErrorCode) -> Self {
        Self::with_severity(Severity::Info, code)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Point at the offending text.
    pub fn with_label(self, span: Span, message: impl Into<String>) -> Self {
        self.labelled(span, message.into(), true)
    }

    /// Point at related text, such as an opening bracket.
    pub fn with_secondary_label(self, span: Span, message: impl Into<String>) -> Self {
        self.labelled(span, message.into(), false)
    }

    fn labelled(mut self, span: Span, message: String, primary: bool) -> Self {
        self.labels.push(Label {
            span,
            message,
            primary,
        });
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn primary_span(&self) -> Option<Span> {
        self.labels.iter().find(|l| l.primary).map(|l| l.span)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        for label in &self.labels {
            let marker = if label.primary { '^' } else { '-' };
            write!(f, "\n  {marker} {}: {}", label.span, label.message)?;
        }
        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }
        Ok(())
    }
}

/// Create an "unexpected token" diagnostic.
pub fn unexpected_token(span: Span, expected: &str, found: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1001)
        .with_message(format!(
            "unexpected token: expected {expected}, found `{found}`"
        ))
        .with_label(span, format!("expected {expected}"))
}

/// Create an "expected expression" diagnostic.
pub fn expected_expression(span: Span, found: &str) -> Diagnostic {
    let found = if found.is_empty() {
        "end of input"
    } else {
        found
    };
    Diagnostic::error(ErrorCode::E1002)
        .with_message(format!("expected expression, found `{found}`"))
        .with_label(span, "expected expression here")
}

/// Create an "unclosed delimiter" diagnostic.
pub fn unclosed_delimiter(open_span: Span, close_span: Span, delimiter: char) -> Diagnostic {
    let expected = match delimiter {
        '(' => ')',
        '[' => ']',
        _ => delimiter,
    };
    Diagnostic::error(ErrorCode::E1003)
        .with_message(format!("unclosed delimiter `{delimiter}`"))
        .with_label(close_span, format!("expected `{expected}`"))
        .with_secondary_label(open_span, "unclosed delimiter opened here")
}

/// Create an "invalid assignment target" diagnostic.
pub fn invalid_target(span: Span, operator: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1005)
        .with_message(format!("invalid target for `{operator}`"))
        .with_label(span, "cannot assign to this expression")
        .with_note("only identifiers, member access and index expressions can be assigned")
}
