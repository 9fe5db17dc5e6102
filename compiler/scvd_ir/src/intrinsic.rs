//! Built-in intrinsic function names.

use std::fmt;

/// The closed set of intrinsics recognised at parse time.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Intrinsic {
    /// `__CalcMemUsed()`: bytes in use according to host statistics.
    CalcMemUsed,
    /// `__FindSymbol(name)`: look up a symbol, creating it if missing.
    FindSymbol,
    /// `__GetRegVal(reg)`: read a target register.
    GetRegVal,
    /// `__Offset_of(type:member)`
    OffsetOf,
    /// `__size_of(type)`
    SizeOf,
    /// `__Symbol_exists(name)`
    SymbolExists,
}

impl Intrinsic {
    pub const ALL: [Intrinsic; 6] = [
        Intrinsic::CalcMemUsed,
        Intrinsic::FindSymbol,
        Intrinsic::GetRegVal,
        Intrinsic::OffsetOf,
        Intrinsic::SizeOf,
        Intrinsic::SymbolExists,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "__CalcMemUsed" => Some(Self::CalcMemUsed),
            "__FindSymbol" => Some(Self::FindSymbol),
            "__GetRegVal" => Some(Self::GetRegVal),
            "__Offset_of" => Some(Self::OffsetOf),
            "__size_of" => Some(Self::SizeOf),
            "__Symbol_exists" => Some(Self::SymbolExists),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::CalcMemUsed => "__CalcMemUsed",
            Self::FindSymbol => "__FindSymbol",
            Self::GetRegVal => "__GetRegVal",
            Self::OffsetOf => "__Offset_of",
            Self::SizeOf => "__size_of",
            Self::SymbolExists => "__Symbol_exists",
        }
    }

    /// Intrinsics whose arguments are names rather than values.
    ///
    /// An identifier or string argument is passed as its text and never
    /// evaluated; `__Symbol_exists(foo)` checks `foo` by name.
    pub const fn takes_names(self) -> bool {
        matches!(
            self,
            Self::FindSymbol | Self::GetRegVal | Self::OffsetOf | Self::SizeOf | Self::SymbolExists
        )
    }
}

impl fmt::Display for Intrinsic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
