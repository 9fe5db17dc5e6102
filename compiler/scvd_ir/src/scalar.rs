//! Constant values produced by folding.

use std::fmt;

/// A scalar value: the result of folding, and the non-container part of an
/// evaluation value.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scalar {
    Number(f64),
    Int(i64),
    Str(String),
}

impl Scalar {
    pub const TRUE: Scalar = Scalar::Number(1.0);
    pub const FALSE: Scalar = Scalar::Number(0.0);

    pub fn from_bool(b: bool) -> Self {
        if b {
            Self::TRUE
        } else {
            Self::FALSE
        }
    }

    /// Numeric view. Strings are parsed; unparsable strings give NaN.
    pub fn to_number(&self) -> f64 {
        match self {
            Scalar::Number(v) => *v,
            Scalar::Int(v) => *v as f64,
            Scalar::Str(s) => string_to_number(s),
        }
    }

    /// 64-bit view. Floats truncate toward zero and saturate; NaN and
    /// infinities become 0.
    pub fn to_int(&self) -> i64 {
        match self {
            Scalar::Number(v) => f64_to_i64(*v),
            Scalar::Int(v) => *v,
            Scalar::Str(s) => f64_to_i64(string_to_number(s)),
        }
    }

    pub fn is_truthy(&self) -> bool {
        crate::ops::truthy(self)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Truncating, saturating conversion with non-finite values mapped to 0.
pub fn f64_to_i64(v: f64) -> i64 {
    if v.is_finite() {
        // `as` saturates on overflow.
        v.trunc() as i64
    } else {
        0
    }
}

/// Parse a decimal or `0x` hex string. Surrounding whitespace is ignored and
/// the empty string is 0.
pub fn string_to_number(s: &str) -> f64 {
    let t = s.trim();
    if t.is_empty() {
        return 0.0;
    }
    let (negative, body) = match t.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, t.strip_prefix('+').unwrap_or(t)),
    };
    let magnitude = if let Some(hex) = body
        .strip_prefix("0x")
        .or_else(|| body.strip_prefix("0X"))
    {
        match u64::from_str_radix(hex, 16) {
            Ok(v) => v as f64,
            Err(_) => return f64::NAN,
        }
    } else {
        match body {
            "Infinity" => f64::INFINITY,
            _ if body.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-')) => {
                match body.parse::<f64>() {
                    Ok(v) => v,
                    Err(_) => return f64::NAN,
                }
            }
            _ => return f64::NAN,
        }
    };
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Render a float the way values are displayed: integral values without a
/// fraction, `NaN`, `Infinity`, `-Infinity`.
pub fn format_number(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_owned()
    } else if v.is_infinite() {
        if v > 0.0 {
            "Infinity".to_owned()
        } else {
            "-Infinity".to_owned()
        }
    } else if v == v.trunc() && v.abs() < 1e21 {
        // Avoid "-0".
        if v == 0.0 {
            "0".to_owned()
        } else {
            format!("{v:.0}")
        }
    } else {
        format!("{v}")
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(v) => f.write_str(&format_number(*v)),
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Number(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}
