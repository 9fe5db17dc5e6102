//! Errors that abort an execution pass.
//!
//! Everything else (failed evaluations, unreadable memory, out-of-range
//! sizes, misconfigured lists) is logged and the walk continues.

use scvd_eval::MissingIntrinsic;

#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum ExecError {
    #[error("execution cancelled")]
    Cancelled,
    #[error(transparent)]
    MissingIntrinsic(#[from] MissingIntrinsic),
}
