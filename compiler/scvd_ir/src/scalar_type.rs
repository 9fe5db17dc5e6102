//! Canonical C scalar types.

/// Scalar types that can be named in `__size_of` and in `type` attributes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScalarType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
}

impl ScalarType {
    /// Parse a C type name. Surrounding whitespace and runs of inner
    /// whitespace are ignored.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.split_whitespace().collect::<Vec<_>>().join(" ");
        Some(match normalized.as_str() {
            "uint8_t" | "unsigned char" | "uchar" | "bool" => Self::U8,
            "int8_t" | "char" | "signed char" => Self::I8,
            "uint16_t" | "unsigned short" | "ushort" => Self::U16,
            "int16_t" | "short" | "signed short" => Self::I16,
            "uint32_t" | "unsigned int" | "unsigned" | "unsigned long" | "uint" => Self::U32,
            "int32_t" | "int" | "signed int" | "signed" | "long" => Self::I32,
            "uint64_t" | "unsigned long long" => Self::U64,
            "int64_t" | "long long" | "signed long long" => Self::I64,
            "float" => Self::F32,
            "double" => Self::F64,
            _ => return None,
        })
    }

    /// Size in bytes.
    pub const fn size(self) -> u32 {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
        }
    }

    pub const fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Unsigned integer type of the given width, used when only a size is
    /// known.
    pub const fn unsigned_of_size(size: u32) -> Option<Self> {
        match size {
            1 => Some(Self::U8),
            2 => Some(Self::U16),
            4 => Some(Self::U32),
            8 => Some(Self::U64),
            _ => None,
        }
    }
}
