//! # LEGv8 Register File
//!
//! 32 general-purpose 64-bit registers, `X0`-`X31`.
//!
//! - **X0-X30**: General purpose
//! - **X31 (XZR)**: Zero register. Reads as 0, writes are discarded at the
//!   end of every decoded instruction.
//!
//! The program counter is not part of the register file, see
//! [`ArchState`](super::state::ArchState).

use serde::{Deserialize, Serialize};

/// Zero register index.
pub const REG_ZERO: usize = 31;

/// Number of architectural general-purpose registers.
pub const REGISTER_COUNT: usize = 32;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers([u64; REGISTER_COUNT]);

impl Registers {
    /// Value of `X<reg>`. `XZR` always reads as 0.
    #[must_use]
    pub fn register_at(&self, reg: usize) -> u64 {
        assert!(reg < REGISTER_COUNT, "Invalid register index: {reg}");
        if reg == REG_ZERO { 0 } else { self.0[reg] }
    }

    /// Writes `X<reg>`. A write to `XZR` lands in the backing slot and is
    /// wiped by [`Self::clear_zero_register`].
    pub fn set_register_at(&mut self, reg: usize, new_value: u64) {
        assert!(reg < REGISTER_COUNT, "Invalid register index: {reg}");
        self.0[reg] = new_value;
    }

    pub const fn clear_zero_register(&mut self) {
        self.0[REG_ZERO] = 0;
    }

    /// Raw backing storage, `XZR` slot included.
    #[must_use]
    pub const fn as_array(&self) -> &[u64; REGISTER_COUNT] {
        &self.0
    }

    /// Iterates `(index, value)` over registers holding a nonzero value.
    pub fn nonzero(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.0
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, value)| value != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn zero_register_reads_zero() {
        let mut registers = Registers::default();
        registers.set_register_at(REG_ZERO, 0xDEAD);

        assert_eq!(registers.register_at(REG_ZERO), 0);
        assert_eq!(registers.as_array()[REG_ZERO], 0xDEAD);

        registers.clear_zero_register();
        assert_eq!(registers.as_array()[REG_ZERO], 0);
    }

    #[test]
    fn nonzero_skips_empty_registers() {
        let mut registers = Registers::default();
        registers.set_register_at(3, 7);
        registers.set_register_at(30, 1);

        assert_eq!(registers.nonzero().collect::<Vec<_>>(), vec![(3, 7), (30, 1)]);
    }

    #[test]
    #[should_panic(expected = "Invalid register index: 32")]
    fn out_of_range_index() {
        Registers::default().set_register_at(32, 1);
    }
}
