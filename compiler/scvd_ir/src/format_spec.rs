//! Printf conversion specifiers.

use std::fmt;

/// The letter after `%` in a `%spec[expr]` segment.
///
/// `d u x t T` have built-in renderings. The remaining letters are
/// domain-specific (addresses, enum names, IP/MAC formats and so on) and are
/// rendered by the host's formatter, falling back to the value's natural text.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormatSpec {
    /// `%d` signed decimal.
    Decimal,
    /// `%u` unsigned decimal.
    Unsigned,
    /// `%x` lowercase hex.
    Hex,
    /// `%t` text.
    Text,
    /// `%T` natural rendering.
    Natural,
    C,
    E,
    I,
    J,
    N,
    M,
    S,
    U,
}

impl FormatSpec {
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'd' => Self::Decimal,
            'u' => Self::Unsigned,
            'x' => Self::Hex,
            't' => Self::Text,
            'T' => Self::Natural,
            'C' => Self::C,
            'E' => Self::E,
            'I' => Self::I,
            'J' => Self::J,
            'N' => Self::N,
            'M' => Self::M,
            'S' => Self::S,
            'U' => Self::U,
            _ => return None,
        })
    }

    pub const fn as_char(self) -> char {
        match self {
            Self::Decimal => 'd',
            Self::Unsigned => 'u',
            Self::Hex => 'x',
            Self::Text => 't',
            Self::Natural => 'T',
            Self::C => 'C',
            Self::E => 'E',
            Self::I => 'I',
            Self::J => 'J',
            Self::N => 'N',
            Self::M => 'M',
            Self::S => 'S',
            Self::U => 'U',
        }
    }

    /// True for the specifiers with a built-in rendering.
    pub const fn is_builtin(self) -> bool {
        matches!(
            self,
            Self::Decimal | Self::Unsigned | Self::Hex | Self::Text | Self::Natural
        )
    }
}

impl fmt::Display for FormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.as_char())
    }
}
