//! Bounded access counter.

/// Kind of access applied to a record's counter.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Access {
    /// +1
    Read,
    /// -1
    Write,
    /// Reset to 10.
    Set,
    /// Reset to 0.
    Clear,
}

/// Counter clamped to `0..=100`.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct AccessCount(u8);

impl AccessCount {
    pub const MAX: u8 = 100;
    pub const SET: u8 = 10;

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn apply(&mut self, access: Access) {
        self.0 = match access {
            Access::Read => (self.0 + 1).min(Self::MAX),
            Access::Write => self.0.saturating_sub(1),
            Access::Set => Self::SET,
            Access::Clear => 0,
        };
    }
}
