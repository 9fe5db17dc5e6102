//! Stack growth for the recursive parts of the expression engine.
//!
//! The parser, the constant folder and the evaluator all recurse once per
//! nesting level of an expression. View descriptions are written by hand and
//! rarely nest deeply, but generated ones can (long `a+b+c+...` chains fold
//! into left-deep trees), so every recursive entry point goes through
//! [`ensure_sufficient_stack`].
//!
//! On native targets the `stacker` crate allocates a fresh segment when less
//! than [`RED_ZONE`] bytes remain. On `wasm32` the closure is called directly.

/// Remaining stack below which a new segment is allocated.
pub const RED_ZONE: usize = 64 * 1024;

/// Size of each newly allocated stack segment.
pub const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, growing the stack first if it is close to exhaustion.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// `wasm32` has no segmented stacks; call straight through.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Remaining stack in bytes, if the platform can report it.
#[cfg(not(target_arch = "wasm32"))]
pub fn remaining_stack() -> Option<usize> {
    stacker::remaining_stack()
}

/// Remaining stack in bytes, if the platform can report it.
#[cfg(target_arch = "wasm32")]
pub fn remaining_stack() -> Option<usize> {
    None
}
