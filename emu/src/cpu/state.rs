use serde::{Deserialize, Serialize};

use super::flags::Flags;
use super::registers::Registers;

/// Width in bytes of every instruction.
pub const SIZE_OF_INSTRUCTION: u64 = 4;

/// Architectural state visible to a program: register file, program counter
/// and the N/Z flags.
///
/// The core keeps two of these per step: a read-only `current` and a
/// write-only `next`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchState {
    pub registers: Registers,
    pub flags: Flags,
    program_counter: u64,
}

impl ArchState {
    #[must_use]
    pub fn with_program_counter(program_counter: u64) -> Self {
        Self {
            program_counter,
            ..Default::default()
        }
    }

    #[must_use]
    pub const fn program_counter(&self) -> u64 {
        self.program_counter
    }

    pub const fn set_program_counter(&mut self, new_value: u64) {
        self.program_counter = new_value;
    }

    /// Moves the program counter by a signed byte offset, wrapping.
    pub const fn branch_relative(&mut self, from: u64, offset: i64) {
        self.program_counter = from.wrapping_add_signed(offset);
    }

    pub const fn advance_program_counter(&mut self, bytes: u64) {
        self.program_counter = self.program_counter.wrapping_add(bytes);
    }
}
