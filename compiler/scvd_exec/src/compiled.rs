//! Expression text parsed on first use.

use std::cell::OnceCell;
use std::sync::Arc;

use scvd_parse::{parse, ParseResult};
use tracing::warn;

/// An expression attribute of a statement. Parsed at most once.
#[derive(Clone, Debug)]
pub struct CompiledExpr {
    text: String,
    parsed: OnceCell<Arc<ParseResult>>,
}

impl CompiledExpr {
    pub fn new(text: impl Into<String>) -> Self {
        CompiledExpr {
            text: text.into(),
            parsed: OnceCell::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_parsed(&self) -> bool {
        self.parsed.get().is_some()
    }

    pub fn parsed(&self) -> &Arc<ParseResult> {
        self.parsed.get_or_init(|| {
            let result = parse(&self.text);
            for diag in result.errors() {
                warn!(text = %self.text, "{diag}");
            }
            Arc::new(result)
        })
    }
}

/// Split a `calc` body into expressions on `;` and newlines outside quotes.
pub fn split_expressions(body: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in body.chars() {
        if let Some(q) = quote {
            current.push(c);
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
            '"' | '\'' => {
                quote = Some(c);
                current.push(c);
            }
            ';' | '\n' | '\r' => push_part(&mut parts, &mut current),
            _ => current.push(c),
        }
    }
    push_part(&mut parts, &mut current);
    parts
}

fn push_part(parts: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        parts.push(trimmed.to_owned());
    }
    current.clear();
}

#[cfg(test)]
mod tests;
