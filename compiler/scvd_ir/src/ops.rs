//! Operator semantics over [`Scalar`] values.
//!
//! Shared by constant folding and by the evaluator so both agree on every
//! result. Rules:
//!
//! - If either operand is `Int` the operation runs in wrapping 64-bit integer
//!   arithmetic; otherwise it runs on `f64`.
//! - `+` with a string operand concatenates the display forms.
//! - Bitwise and shift operators on plain numbers convert through 32-bit
//!   integers (`>>>` through an unsigned 32-bit integer).
//! - Comparisons and logical operators yield 1 or 0.
//! - Division or modulo by zero fails in both domains.

use std::cmp::Ordering;

use crate::ast::{BinaryOp, UnaryOp};
use crate::Scalar;

/// Failure of a pure operator.
#[derive(Copy, Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum OpError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("modulo by zero")]
    ModuloByZero,
}

/// C truthiness: non-zero numbers and non-empty strings. NaN is false.
pub fn truthy(value: &Scalar) -> bool {
    match value {
        Scalar::Number(v) => *v != 0.0 && !v.is_nan(),
        Scalar::Int(v) => *v != 0,
        Scalar::Str(s) => !s.is_empty(),
    }
}

/// Apply a prefix operator.
pub fn unary(op: UnaryOp, operand: &Scalar) -> Scalar {
    match op {
        UnaryOp::Plus => match operand {
            Scalar::Int(v) => Scalar::Int(*v),
            other => Scalar::Number(other.to_number()),
        },
        UnaryOp::Neg => match operand {
            Scalar::Int(v) => Scalar::Int(v.wrapping_neg()),
            other => Scalar::Number(-other.to_number()),
        },
        UnaryOp::Not => Scalar::from_bool(!truthy(operand)),
        UnaryOp::BitNot => match operand {
            Scalar::Int(v) => Scalar::Int(!v),
            other => Scalar::Number(f64::from(!to_int32(other.to_number()))),
        },
    }
}

/// Apply a binary operator to two already-evaluated operands.
///
/// `&&` and `||` are accepted here too; callers that short-circuit simply do
/// not evaluate the right operand before calling.
pub fn binary(op: BinaryOp, left: &Scalar, right: &Scalar) -> Result<Scalar, OpError> {
    match op {
        BinaryOp::And => return Ok(Scalar::from_bool(truthy(left) && truthy(right))),
        BinaryOp::Or => return Ok(Scalar::from_bool(truthy(left) || truthy(right))),
        BinaryOp::Add if is_str(left) || is_str(right) => {
            return Ok(Scalar::Str(format!("{left}{right}")));
        }
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq | BinaryOp::Eq
        | BinaryOp::NotEq => return Ok(compare(op, left, right)),
        _ => {}
    }

    if matches!(left, Scalar::Int(_)) || matches!(right, Scalar::Int(_)) {
        int_binary(op, left.to_int(), right.to_int()).map(Scalar::Int)
    } else {
        number_binary(op, left.to_number(), right.to_number()).map(Scalar::Number)
    }
}

fn is_str(value: &Scalar) -> bool {
    matches!(value, Scalar::Str(_))
}

fn compare(op: BinaryOp, left: &Scalar, right: &Scalar) -> Scalar {
    let ordering = match (left, right) {
        (Scalar::Str(a), Scalar::Str(b)) => Some(a.cmp(b)),
        (Scalar::Int(a), Scalar::Int(b)) => Some(a.cmp(b)),
        (Scalar::Int(a), Scalar::Number(b)) => cmp_int_number(*a, *b),
        (Scalar::Number(a), Scalar::Int(b)) => cmp_int_number(*b, *a).map(Ordering::reverse),
        _ => left.to_number().partial_cmp(&right.to_number()),
    };
    // NaN compares unequal to everything.
    let result = match ordering {
        None => op == BinaryOp::NotEq,
        Some(ord) => match op {
            BinaryOp::Lt => ord == Ordering::Less,
            BinaryOp::LtEq => ord != Ordering::Greater,
            BinaryOp::Gt => ord == Ordering::Greater,
            BinaryOp::GtEq => ord != Ordering::Less,
            BinaryOp::Eq => ord == Ordering::Equal,
            _ => ord != Ordering::Equal,
        },
    };
    Scalar::from_bool(result)
}

/// Compare exactly where possible: an integral float is compared as an
/// integer, anything else through `f64`.
fn cmp_int_number(a: i64, b: f64) -> Option<Ordering> {
    if b.is_finite() && b == b.trunc() && b.abs() < 9.2e18 {
        Some(a.cmp(&(b as i64)))
    } else {
        (a as f64).partial_cmp(&b)
    }
}

fn int_binary(op: BinaryOp, a: i64, b: i64) -> Result<i64, OpError> {
    Ok(match op {
        BinaryOp::Mul => a.wrapping_mul(b),
        BinaryOp::Div => {
            if b == 0 {
                return Err(OpError::DivisionByZero);
            }
            a.wrapping_div(b)
        }
        BinaryOp::Mod => {
            if b == 0 {
                return Err(OpError::ModuloByZero);
            }
            a.wrapping_rem(b)
        }
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Shl => shift_left(a, b),
        BinaryOp::Shr => shift_right(a, b),
        BinaryOp::UShr => shift_right_unsigned(a, b),
        BinaryOp::BitAnd => a & b,
        BinaryOp::BitXor => a ^ b,
        BinaryOp::BitOr => a | b,
        // Comparison and logical operators are handled before dispatch.
        _ => 0,
    })
}

fn shift_left(a: i64, count: i64) -> i64 {
    if count < 0 {
        return shift_right(a, count.saturating_neg());
    }
    if count >= 64 {
        0
    } else {
        a.wrapping_shl(count as u32)
    }
}

fn shift_right(a: i64, count: i64) -> i64 {
    if count < 0 {
        return shift_left(a, count.saturating_neg());
    }
    if count >= 64 {
        if a < 0 {
            -1
        } else {
            0
        }
    } else {
        a >> count
    }
}

fn shift_right_unsigned(a: i64, count: i64) -> i64 {
    if count < 0 {
        return shift_left(a, count.saturating_neg());
    }
    if count >= 64 {
        0
    } else {
        ((a as u64) >> count) as i64
    }
}

fn number_binary(op: BinaryOp, a: f64, b: f64) -> Result<f64, OpError> {
    Ok(match op {
        BinaryOp::Mul => a * b,
        BinaryOp::Div => {
            if b == 0.0 {
                return Err(OpError::DivisionByZero);
            }
            a / b
        }
        BinaryOp::Mod => {
            if b == 0.0 {
                return Err(OpError::ModuloByZero);
            }
            a % b
        }
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Shl => f64::from(to_int32(a).wrapping_shl(to_uint32(b) & 31)),
        BinaryOp::Shr => f64::from(to_int32(a) >> (to_uint32(b) & 31)),
        BinaryOp::UShr => f64::from(to_uint32(a) >> (to_uint32(b) & 31)),
        BinaryOp::BitAnd => f64::from(to_int32(a) & to_int32(b)),
        BinaryOp::BitXor => f64::from(to_int32(a) ^ to_int32(b)),
        BinaryOp::BitOr => f64::from(to_int32(a) | to_int32(b)),
        _ => 0.0,
    })
}

/// Wrap a float into a signed 32-bit integer (modulo 2^32).
pub fn to_int32(v: f64) -> i32 {
    to_uint32(v) as i32
}

/// Wrap a float into an unsigned 32-bit integer (modulo 2^32).
pub fn to_uint32(v: f64) -> u32 {
    if !v.is_finite() {
        return 0;
    }
    let wrapped = v.trunc().rem_euclid(4_294_967_296.0);
    wrapped as u32
}

/// Largest integer magnitude an `f64` holds exactly.
pub const MAX_SAFE_INTEGER: u64 = 1 << 53;

/// Promote `v` to a number when it is exact in an `f64`, otherwise keep it as
/// a 64-bit integer.
pub fn scalar_from_u64(v: u64) -> Scalar {
    if v <= MAX_SAFE_INTEGER {
        Scalar::Number(v as f64)
    } else {
        Scalar::Int(v as i64)
    }
}
