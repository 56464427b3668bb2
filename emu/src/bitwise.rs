use std::mem::size_of;
use std::ops::RangeInclusive;

/// Contains some helper methods to read bit fields out of a value,
/// the index (`bit_idx`) is supposed to be from lsb to msb (right to left)
pub trait Bits
where
    Self: Copy + Into<u64>,
{
    /// Builds `Self` from the low bits of `value`, dropping the rest.
    fn truncate_from(value: u64) -> Self;

    fn get_bit(self, bit_idx: u8) -> bool {
        debug_assert!(bit_idx < (size_of::<Self>() * 8) as u8);
        let bitwise: u64 = self.into();
        (bitwise >> bit_idx) & 1 == 1
    }

    fn get_bits(self, bits_range: RangeInclusive<u8>) -> Self {
        let start = *bits_range.start();
        let length = bits_range.len();
        debug_assert!(usize::from(start) + length <= size_of::<Self>() * 8);

        // `length` ones, moved back to position 0 after the shift.
        let mask = if length >= 64 {
            u64::MAX
        } else {
            (1_u64 << length) - 1
        };

        let value: u64 = self.into();
        Self::truncate_from((value >> start) & mask)
    }

    /// Returns a sign-extended copy of the value.
    /// `number_of_bits` is the width of the two's complement value stored
    /// in the low bits of `self`. Bits above it are ignored.
    fn sign_extended(self, number_of_bits: u8) -> Self {
        debug_assert!(number_of_bits > 0 && usize::from(number_of_bits) <= size_of::<Self>() * 8);
        let value: u64 = self.into();

        // Push the sign bit up to bit 63, then let the arithmetic shift
        // replicate it on the way back down.
        let unused = 64 - u32::from(number_of_bits);
        let extended = (value.wrapping_shl(unused).cast_signed() >> unused).cast_unsigned();

        Self::truncate_from(extended)
    }
}

impl Bits for u64 {
    fn truncate_from(value: u64) -> Self {
        value
    }
}

impl Bits for u32 {
    #[allow(clippy::cast_possible_truncation)]
    fn truncate_from(value: u64) -> Self {
        value as Self
    }
}

/// Reads `width` bits of `word` starting at `offset`, lsb first.
///
/// Callers guarantee `offset + width <= 32`.
#[must_use]
pub fn field(word: u32, offset: u8, width: u8) -> u32 {
    debug_assert!(width > 0 && u32::from(offset) + u32::from(width) <= 32);
    word.get_bits(offset..=offset + width - 1)
}
