//! Runtime values.

use std::fmt;

use scvd_ir::{f64_to_i64, format_number, Scalar};

use crate::errors::{container_in_arithmetic, EvalError};

/// Handle to an object or array owned by the data host.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct ContainerRef(u32);

impl ContainerRef {
    #[inline]
    pub const fn new(index: u32) -> Self {
        ContainerRef(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Result of evaluating an expression.
#[derive(Clone, PartialEq, Debug)]
pub enum Value {
    Number(f64),
    Int(i64),
    Str(String),
    Container(ContainerRef),
    /// Missing property or array element.
    Undefined,
}

impl Value {
    pub const ZERO: Value = Value::Number(0.0);

    pub fn from_bool(b: bool) -> Self {
        Value::from(Scalar::from_bool(b))
    }

    /// Convert for use in an operator. Undefined behaves as NaN.
    pub fn to_scalar(&self) -> Result<Scalar, EvalError> {
        match self {
            Value::Number(v) => Ok(Scalar::Number(*v)),
            Value::Int(v) => Ok(Scalar::Int(*v)),
            Value::Str(s) => Ok(Scalar::Str(s.clone())),
            Value::Undefined => Ok(Scalar::Number(f64::NAN)),
            Value::Container(_) => Err(container_in_arithmetic()),
        }
    }

    /// Numeric value, or `None` for containers.
    pub fn to_number(&self) -> Option<f64> {
        self.to_scalar().ok().map(|s| s.to_number())
    }

    /// Signed 64-bit value, or `None` for containers.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            other => other.to_number().map(f64_to_i64),
        }
    }

    /// Containers are truthy; Undefined is not.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Container(_) => true,
            Value::Undefined => false,
            other => other
                .to_scalar()
                .is_ok_and(|s| scvd_ir::ops::truthy(&s)),
        }
    }

    pub fn as_container(&self) -> Option<ContainerRef> {
        match self {
            Value::Container(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        match s {
            Scalar::Number(v) => Value::Number(v),
            Scalar::Int(v) => Value::Int(v),
            Scalar::Str(v) => Value::Str(v),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

/// Natural rendering.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) => f.write_str(&format_number(*v)),
            Value::Int(v) => write!(f, "{v}"),
            Value::Str(s) => f.write_str(s),
            Value::Container(c) => write!(f, "[container {}]", c.index()),
            Value::Undefined => f.write_str("undefined"),
        }
    }
}

/// Property name or array index.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Key {
    Name(String),
    Index(i64),
}

impl Key {
    /// Integral numbers and strings holding an integer become indices.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Int(v) => Key::Index(*v),
            Value::Number(v) if v.is_finite() && v.fract() == 0.0 => Key::Index(*v as i64),
            Value::Str(s) => match s.trim().parse::<i64>() {
                Ok(i) => Key::Index(i),
                Err(_) => Key::Name(s.clone()),
            },
            other => Key::Name(other.to_string()),
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Key::Index(_))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => f.write_str(name),
            Key::Index(i) => write!(f, "{i}"),
        }
    }
}
