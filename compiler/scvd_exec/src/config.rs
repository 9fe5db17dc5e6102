//! Interpreter limits and target layout.

use crate::memory::Endian;

/// Bounds applied during execution. Values outside them are clamped and
/// logged, never fatal.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ExecConfig {
    /// Iteration cap for `list` statements.
    pub max_list_iterations: u32,
    /// Largest single memory read, in bytes.
    pub max_read_bytes: u32,
    /// Element count cap for `read`.
    pub max_read_elements: u32,
    /// Element count cap for `readlist`.
    pub max_readlist_count: u32,
    /// Width of a target pointer, in bytes.
    pub pointer_size: u32,
    /// Byte order of target pointers. A statement's `endian` only applies
    /// to the values it decodes.
    pub pointer_endian: Endian,
}

impl Default for ExecConfig {
    fn default() -> Self {
        ExecConfig {
            max_list_iterations: 65_536,
            max_read_bytes: 65_536,
            max_read_elements: 512,
            max_readlist_count: 1024,
            pointer_size: 4,
            pointer_endian: Endian::Little,
        }
    }
}

impl ExecConfig {
    pub fn with_max_list_iterations(mut self, n: u32) -> Self {
        self.max_list_iterations = n;
        self
    }

    pub fn with_max_read_bytes(mut self, n: u32) -> Self {
        self.max_read_bytes = n;
        self
    }

    pub fn with_max_read_elements(mut self, n: u32) -> Self {
        self.max_read_elements = n;
        self
    }

    pub fn with_max_readlist_count(mut self, n: u32) -> Self {
        self.max_readlist_count = n;
        self
    }

    /// Only 4 and 8 are meaningful; other widths are read as 4.
    pub fn with_pointer_size(mut self, size: u32) -> Self {
        self.pointer_size = size;
        self
    }

    pub fn with_pointer_endian(mut self, endian: Endian) -> Self {
        self.pointer_endian = endian;
        self
    }
}
