//! # Word-Addressed Memory
//!
//! The core never owns storage. It computes addresses and talks to memory
//! through the two operations of [`Memory`]:
//!
//! - `read_word(address) -> u32`
//! - `write_word(address, value)`
//!
//! Byte and halfword transfers are layered on top of those two calls,
//! following the configured [`SubwordAccess`] policy.
//!
//! Words are little-endian: the byte at `address` is bits 0-7 of the word.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::bitwise::Bits;

/// Storage collaborator used by the core.
pub trait Memory {
    fn read_word(&self, address: u64) -> u32;
    fn write_word(&mut self, address: u64, value: u32);
}

/// How byte and halfword loads/stores reach a word-granularity memory.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubwordAccess {
    /// Only the addressed bytes change. Stores do a read-modify-write of the
    /// enclosing word, loads pick the addressed lanes out of it.
    #[default]
    Precise,

    /// Stores write the zero-extended value as a whole word at the address,
    /// clobbering the neighbouring bytes. Loads read a whole word at the
    /// address and mask the low bits.
    Legacy,
}

/// Width of a sub-word transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subword {
    Byte,
    Halfword,
}

impl Subword {
    const fn bytes(self) -> u64 {
        match self {
            Self::Byte => 1,
            Self::Halfword => 2,
        }
    }

    const fn mask(self) -> u32 {
        match self {
            Self::Byte => 0xFF,
            Self::Halfword => 0xFFFF,
        }
    }
}

const WORD_ALIGN_MASK: u64 = !0b11;

fn read_byte<M: Memory + ?Sized>(memory: &M, address: u64) -> u8 {
    let word = memory.read_word(address & WORD_ALIGN_MASK);
    let lane = ((address & 0b11) * 8) as u8;
    word.get_bits(lane..=lane + 7).to_le_bytes()[0]
}

fn write_byte<M: Memory + ?Sized>(memory: &mut M, address: u64, value: u8) {
    let aligned = address & WORD_ALIGN_MASK;
    let lane = (address & 0b11) * 8;
    let word = memory.read_word(aligned);
    let word = (word & !(0xFF << lane)) | (u32::from(value) << lane);
    memory.write_word(aligned, word);
}

/// Loads a byte or halfword, zero-extended.
pub fn load_subword<M: Memory + ?Sized>(
    memory: &M,
    address: u64,
    width: Subword,
    access: SubwordAccess,
) -> u32 {
    match access {
        SubwordAccess::Legacy => memory.read_word(address) & width.mask(),
        SubwordAccess::Precise => (0..width.bytes()).fold(0, |value, i| {
            let byte = read_byte(memory, address.wrapping_add(i));
            value | (u32::from(byte) << (i * 8))
        }),
    }
}

/// Stores the low byte or halfword of `value`.
pub fn store_subword<M: Memory + ?Sized>(
    memory: &mut M,
    address: u64,
    value: u32,
    width: Subword,
    access: SubwordAccess,
) {
    let value = value & width.mask();
    match access {
        SubwordAccess::Legacy => memory.write_word(address, value),
        SubwordAccess::Precise => {
            let bytes = value.to_le_bytes();
            for (i, byte) in bytes.into_iter().enumerate().take(width.bytes() as usize) {
                write_byte(memory, address.wrapping_add(i as u64), byte);
            }
        }
    }
}

/// Byte-addressed sparse memory. Unwritten bytes read as zero.
#[derive(Debug, Default, Clone)]
pub struct SparseMemory {
    bytes: HashMap<u64, u8>,
}

impl SparseMemory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes consecutive words starting at `start`.
    pub fn load_words(&mut self, start: u64, words: impl IntoIterator<Item = u32>) {
        let mut address = start;
        for word in words {
            self.write_word(address, word);
            address = address.wrapping_add(4);
        }
    }
}

impl Memory for SparseMemory {
    fn read_word(&self, address: u64) -> u32 {
        let mut bytes = [0_u8; 4];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = *self
                .bytes
                .get(&address.wrapping_add(i as u64))
                .unwrap_or(&0);
        }
        u32::from_le_bytes(bytes)
    }

    fn write_word(&mut self, address: u64, value: u32) {
        for (i, byte) in value.to_le_bytes().into_iter().enumerate() {
            self.bytes.insert(address.wrapping_add(i as u64), byte);
        }
    }
}
