//! Target memory and register access.

use std::future::Future;

use scvd_eval::{HostStats, Value};
use scvd_ir::ops::scalar_from_u64;
use scvd_ir::ScalarType;

/// Byte order of a read.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

impl Endian {
    /// `B`/`b` is big endian; anything else, or absence, is little.
    pub fn from_attr(attr: Option<&str>) -> Self {
        match attr.map(str::trim) {
            Some("B" | "b") => Endian::Big,
            _ => Endian::Little,
        }
    }
}

/// The debug target: memory, registers and the variables the view declares.
///
/// Reads suspend; everything else is synchronous.
pub trait MemoryHost {
    /// Read `size` bytes at `address`, `None` if the range is unreadable.
    fn read(&mut self, address: u64, size: usize) -> impl Future<Output = Option<Vec<u8>>>;

    /// Returns `false` if the range is not writable.
    fn write(&mut self, address: u64, bytes: &[u8]) -> impl Future<Output = bool>;

    /// Record a declared variable.
    fn set_variable(&mut self, name: &str, size: u32, value: &Value);

    /// Forget every declared variable. Called at the start of each pass.
    fn clear(&mut self);

    fn read_register(&mut self, name: &str) -> impl Future<Output = Option<u64>>;

    fn write_register(&mut self, name: &str, value: u64) -> impl Future<Output = bool>;

    /// Address of a target symbol, if the host has symbol information.
    fn symbol_address(&self, _name: &str) -> Option<u64> {
        None
    }

    fn stats(&self) -> Option<HostStats> {
        None
    }
}

/// Assemble up to eight bytes into an integer.
pub fn bytes_to_u64(bytes: &[u8], endian: Endian) -> u64 {
    let fold = |acc: u64, b: &u8| (acc << 8) | u64::from(*b);
    match endian {
        Endian::Little => bytes.iter().take(8).rev().fold(0, fold),
        Endian::Big => bytes.iter().take(8).fold(0, fold),
    }
}

/// Decode one element of type `ty`. `bytes` must hold at least
/// `ty.size()` bytes.
pub fn decode_scalar(bytes: &[u8], ty: ScalarType, endian: Endian) -> Value {
    let width = ty.size() as usize;
    let raw = bytes_to_u64(&bytes[..width.min(bytes.len())], endian);
    match ty {
        ScalarType::F32 => Value::Number(f64::from(f32::from_bits(raw as u32))),
        ScalarType::F64 => Value::Number(f64::from_bits(raw)),
        ty if ty.is_signed() => {
            let shift = 64 - 8 * width as u32;
            let signed = ((raw << shift) as i64) >> shift;
            if signed.unsigned_abs() <= scvd_ir::ops::MAX_SAFE_INTEGER {
                Value::Number(signed as f64)
            } else {
                Value::Int(signed)
            }
        }
        _ => Value::from(scalar_from_u64(raw)),
    }
}

/// Decode consecutive elements; a trailing partial element is dropped.
pub fn decode_elements(bytes: &[u8], ty: ScalarType, endian: Endian) -> Vec<Value> {
    bytes
        .chunks_exact(ty.size() as usize)
        .map(|chunk| decode_scalar(chunk, ty, endian))
        .collect()
}
