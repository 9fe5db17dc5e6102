//! Diagnostics for view expressions.
//!
//! - Error codes for searchability
//! - Clear messages (what went wrong)
//! - Primary span (where it went wrong)
//! - Context labels and notes
//!
//! Parsing never fails outright; every problem becomes a [`Diagnostic`] in
//! the parse result and evaluation decides what to do with the AST.

mod diagnostic;
pub mod emitter;
mod error_code;

pub use diagnostic::{
    expected_expression, invalid_target, unclosed_delimiter, unexpected_token, Diagnostic, Label,
    Severity,
};
pub use emitter::{render, render_all};
pub use error_code::ErrorCode;
