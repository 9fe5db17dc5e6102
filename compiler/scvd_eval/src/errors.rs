//! Evaluation errors and their constructors.
//!
//! Every failure except [`MissingIntrinsic`] is caught at
//! `evaluate_parse_result` and reported as "could not evaluate".

use scvd_ir::{Intrinsic, OpError};

use crate::Value;

/// Result of evaluating one expression.
pub type EvalResult = Result<Value, EvalError>;

/// An intrinsic whose built-in default needs a capability the host lacks.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[error("intrinsic `{intrinsic}` is not available: {reason}")]
pub struct MissingIntrinsic {
    pub intrinsic: Intrinsic,
    pub reason: &'static str,
}

#[derive(Clone, PartialEq, Debug, thiserror::Error)]
pub enum EvalError {
    #[error(transparent)]
    Operator(#[from] OpError),
    #[error("container used as a scalar")]
    ContainerInArithmetic,
    #[error("expression is not assignable")]
    InvalidTarget,
    #[error("expression contains a syntax error")]
    SyntaxError,
    #[error("`{0}` is not callable")]
    NotCallable(String),
    #[error("`{0}` is not a known scalar type")]
    UnknownType(String),
    #[error("`{intrinsic}` expects {expected} argument(s), got {got}")]
    WrongArgCount {
        intrinsic: Intrinsic,
        expected: usize,
        got: usize,
    },
    #[error("cannot resolve `{0}`")]
    UnresolvedPath(String),
    #[error("host rejected write to `{0}`")]
    WriteRejected(String),
    #[error("register `{0}` could not be read")]
    RegisterUnavailable(String),
    #[error(transparent)]
    Missing(#[from] MissingIntrinsic),
}

impl EvalError {
    /// Whether this failure must propagate instead of becoming "no value".
    pub fn is_missing_intrinsic(&self) -> bool {
        matches!(self, EvalError::Missing(_))
    }
}

#[cold]
pub fn container_in_arithmetic() -> EvalError {
    EvalError::ContainerInArithmetic
}

#[cold]
pub fn invalid_target() -> EvalError {
    EvalError::InvalidTarget
}

#[cold]
pub fn not_callable(name: impl Into<String>) -> EvalError {
    EvalError::NotCallable(name.into())
}

#[cold]
pub fn unknown_type(name: &str) -> EvalError {
    EvalError::UnknownType(name.trim().to_owned())
}

#[cold]
pub fn wrong_arg_count(intrinsic: Intrinsic, expected: usize, got: usize) -> EvalError {
    EvalError::WrongArgCount {
        intrinsic,
        expected,
        got,
    }
}

#[cold]
pub fn unresolved_path(path: &str) -> EvalError {
    EvalError::UnresolvedPath(path.to_owned())
}

#[cold]
pub fn write_rejected(target: impl Into<String>) -> EvalError {
    EvalError::WriteRejected(target.into())
}

#[cold]
pub fn register_unavailable(name: &str) -> EvalError {
    EvalError::RegisterUnavailable(name.to_owned())
}

#[cold]
pub fn missing_intrinsic(intrinsic: Intrinsic, reason: &'static str) -> EvalError {
    EvalError::Missing(MissingIntrinsic { intrinsic, reason })
}
