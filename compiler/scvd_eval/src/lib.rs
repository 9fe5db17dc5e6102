//! SCVD Eval - evaluator for view expressions.
//!
//! Evaluates a [`ParseResult`](scvd_parse::ParseResult) against a host:
//!
//! - [`DataHost`]: symbols, objects and arrays
//! - [`IntrinsicHost`]: overrides for the `__` intrinsics and register reads
//! - [`FormatHost`]: per-specifier printf rendering
//!
//! [`SymbolTable`] is an in-memory host that implements all three with the
//! built-in defaults.
//!
//! # Failure model
//!
//! [`EvalContext::evaluate_parse_result`] turns every [`EvalError`] into
//! `Ok(None)` except [`MissingIntrinsic`], which reports a capability the
//! host lacks and propagates to the caller.

mod context;
pub mod errors;
mod host;
mod intrinsics;
mod printf;
mod registers;
mod symbol_table;
mod value;

pub use context::{EvalContext, ScopedContainer};
pub use errors::{EvalError, EvalResult, MissingIntrinsic};
pub use host::{DataHost, EvalHost, FormatHost, HostStats, IntrinsicHost};
pub use printf::format_builtin;
pub use registers::{read_cached_register, RegisterCache, RegisterSource};
pub use symbol_table::{SymbolTable, MAX_ARRAY_LEN};
pub use value::{ContainerRef, Key, Value};

#[cfg(test)]
mod tests;
