//! Numeric literal decoding.
//!
//! Forms: `0x` hex, `0b` binary, `0o` octal, decimal with optional fraction
//! and exponent, and `.5`. `_` separates digit groups. C integer suffixes
//! (`u`, `l` in any case and combination) are accepted and ignored. Integers
//! above 2^53 stay exact as 64-bit integer literals.

use scvd_ir::ops::MAX_SAFE_INTEGER;
use scvd_ir::NumericLit;

/// Why a literal could not be decoded.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum NumberError {
    /// A radix prefix with no digits after it.
    MissingDigits,
    /// Digit outside the radix, or malformed fraction/exponent.
    InvalidDigit,
    /// Integer does not fit in 64 bits.
    Overflow,
}

impl NumberError {
    pub fn message(self) -> &'static str {
        match self {
            NumberError::MissingDigits => "missing digits after radix prefix",
            NumberError::InvalidDigit => "invalid digit in number literal",
            NumberError::Overflow => "integer literal does not fit in 64 bits",
        }
    }
}

/// Decode the raw text of a number token.
pub fn decode_number(text: &str) -> Result<NumericLit, NumberError> {
    let body = strip_int_suffix(text);
    let cleaned: String = body.chars().filter(|&c| c != '_').collect();

    let radix = match cleaned.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0b" | "0B") => Some(2),
        Some("0o" | "0O") => Some(8),
        _ => None,
    };

    if let Some(radix) = radix {
        let digits = &cleaned[2..];
        if digits.is_empty() {
            return Err(NumberError::MissingDigits);
        }
        return match u64::from_str_radix(digits, radix) {
            Ok(v) => Ok(int_literal(v)),
            Err(e) if matches!(e.kind(), std::num::IntErrorKind::PosOverflow) => {
                Err(NumberError::Overflow)
            }
            Err(_) => Err(NumberError::InvalidDigit),
        };
    }

    if cleaned.is_empty() {
        return Err(NumberError::InvalidDigit);
    }

    if cleaned.contains(['.', 'e', 'E']) {
        return cleaned
            .parse::<f64>()
            .map(NumericLit::Float)
            .map_err(|_| NumberError::InvalidDigit);
    }

    match cleaned.parse::<u64>() {
        Ok(v) => Ok(int_literal(v)),
        // Beyond u64: still a valid decimal, just not exact.
        Err(e) if matches!(e.kind(), std::num::IntErrorKind::PosOverflow) => cleaned
            .parse::<f64>()
            .map(NumericLit::Float)
            .map_err(|_| NumberError::InvalidDigit),
        Err(_) => Err(NumberError::InvalidDigit),
    }
}

fn int_literal(v: u64) -> NumericLit {
    if v <= MAX_SAFE_INTEGER {
        NumericLit::Float(v as f64)
    } else {
        NumericLit::Int(v as i64)
    }
}

/// Remove a trailing run of `u`/`U`/`l`/`L`.
///
/// Hex digits never include these letters, so this is safe for every radix.
fn strip_int_suffix(text: &str) -> &str {
    text.trim_end_matches(['u', 'U', 'l', 'L'])
}
