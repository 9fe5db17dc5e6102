//! SCVD IR - shared types for view expressions
//!
//! This crate contains the data structures every phase agrees on:
//! - Spans for source locations within one expression text
//! - Tokens produced by the lexer
//! - The flat expression AST (`ExprArena` / `ExprId`)
//! - Intrinsic names, printf conversion specifiers and C scalar types
//! - `Scalar` constants and the operator semantics shared by folding and
//!   evaluation
//!
//! # Design
//!
//! - **Flatten**: children are `ExprId` indices, never `Box<Expr>`.
//! - **One semantics**: `ops` is the only place operators are defined.
//! - **No booleans**: `true` and `false` are the numbers 1 and 0.

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
mod format_spec;
mod intrinsic;
pub mod ops;
mod scalar;
mod scalar_type;
mod span;
mod token;

pub use ast::{
    AssignOp, BinaryOp, Expr, ExprArena, ExprId, ExprKind, ExprList, NumericLit, PrintfSegment,
    UnaryOp, UpdateOp,
};
pub use format_spec::FormatSpec;
pub use intrinsic::Intrinsic;
pub use ops::OpError;
pub use scalar::{f64_to_i64, format_number, string_to_number, Scalar};
pub use scalar_type::ScalarType;
pub use span::Span;
pub use token::{Token, TokenKind};

static_assert_size!(ExprId, 4);
static_assert_size!(Span, 8);
