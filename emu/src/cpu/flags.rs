//! # Condition Flags
//!
//! The subset of NZCV this core models:
//!
//! | Flag | Name     | Set When                        |
//! |------|----------|---------------------------------|
//! | N    | Negative | Result has bit 63 set           |
//! | Z    | Zero     | Result is zero                  |
//!
//! Carry and overflow are not tracked, so signed conditions are evaluated
//! from N and Z alone (see [`condition`](super::condition)).

use serde::{Deserialize, Serialize};

use crate::bitwise::Bits;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags {
    negative: bool,
    zero: bool,
}

impl Flags {
    #[must_use]
    pub const fn new(negative: bool, zero: bool) -> Self {
        Self { negative, zero }
    }

    /// Flags describing a 64-bit result.
    #[must_use]
    pub fn from_result(result: u64) -> Self {
        Self {
            negative: result.get_bit(63),
            zero: result == 0,
        }
    }

    /// N => (0=Not Signed, 1=Signed)
    #[must_use]
    pub const fn negative(self) -> bool {
        self.negative
    }

    /// Z => (0=Not Zero, 1=Zero)
    #[must_use]
    pub const fn zero(self) -> bool {
        self.zero
    }

    pub const fn set_zero(&mut self, value: bool) {
        self.zero = value;
    }
}
