//! # Opcode Classification
//!
//! LEGv8 formats keep their distinguishing opcode at different positions,
//! so no single field classifies every word. Four keys are read from the top
//! of the word:
//!
//! ```text
//! 31                     21                                      0
//! ┌──────────────────────┬───────────────────────────────────────┐
//! │ op11 (R, D, register │                                       │
//! │ branch, halt)        │                                       │
//! ├────────────────┬─────┘                                       │
//! │ op9 (IW, shift)│ bits 31-23                                  │
//! ├──────────────┬─┘                                             │
//! │ op8 (I, CB)  │ bits 31-24                                    │
//! ├──────────┬───┘                                               │
//! │ op6 (B)  │ bits 31-26                                        │
//! └──────────┴───────────────────────────────────────────────────┘
//! ```
//!
//! [`DISPATCH_TABLE`] is scanned in order and the first entry whose pattern
//! equals the key of *its own width* selects the [`Opcode`].

use serde::{Deserialize, Serialize};

use crate::bitwise::field;

// R format, bits 31-21.
pub const ADDS_SHIFTED_REGISTER: u32 = 0b101_0101_1000;
pub const SUBS_SHIFTED_REGISTER: u32 = 0b111_0101_1000;
pub const CMP_EXTENDED_REGISTER: u32 = 0b111_0101_1001;
pub const ADD_SHIFTED_REGISTER: u32 = 0b100_0101_1000;
pub const ANDS_SHIFTED_REGISTER: u32 = 0b111_0101_0000;
pub const EOR_SHIFTED_REGISTER: u32 = 0b110_0101_0000;
pub const ORR_SHIFTED_REGISTER: u32 = 0b101_0101_0000;
pub const MUL: u32 = 0b100_1101_1000;
pub const HLT: u32 = 0b110_1010_0010;
pub const BR: u32 = 0b110_1011_0000;

// D format, bits 31-21.
pub const STUR: u32 = 0b111_1100_0000;
pub const STURB: u32 = 0b001_1100_0000;
pub const STURH: u32 = 0b011_1100_0000;
pub const LDUR: u32 = 0b111_1100_0010;
pub const LDURB: u32 = 0b001_1100_0010;
pub const LDURH: u32 = 0b011_1100_0010;

// I and CB formats, bits 31-24.
pub const ADDS_IMMEDIATE: u32 = 0b1011_0001;
pub const SUBS_IMMEDIATE: u32 = 0b1111_0001;
pub const ADD_IMMEDIATE: u32 = 0b1001_0001;
pub const B_COND: u32 = 0b0101_0100;
pub const CBZ: u32 = 0b1011_0100;
pub const CBNZ: u32 = 0b1011_0101;

// IW and bitfield formats, bits 31-23.
pub const MOVZ: u32 = 0b1_1010_0101;
pub const SHIFT_IMMEDIATE: u32 = 0b1_1010_0110;

// B format, bits 31-26.
pub const B: u32 = 0b00_0101;

/// Width of the opcode window, always ending at bit 31.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyWidth {
    Bits6,
    Bits8,
    Bits9,
    Bits11,
}

impl KeyWidth {
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Bits6 => 6,
            Self::Bits8 => 8,
            Self::Bits9 => 9,
            Self::Bits11 => 11,
        }
    }
}

/// The four candidate opcode keys of one word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeKeys {
    pub op11: u32,
    pub op9: u32,
    pub op8: u32,
    pub op6: u32,
}

impl OpcodeKeys {
    #[must_use]
    pub const fn get(self, width: KeyWidth) -> u32 {
        match width {
            KeyWidth::Bits6 => self.op6,
            KeyWidth::Bits8 => self.op8,
            KeyWidth::Bits9 => self.op9,
            KeyWidth::Bits11 => self.op11,
        }
    }
}

impl From<u32> for OpcodeKeys {
    fn from(word: u32) -> Self {
        Self {
            op11: field(word, 21, 11),
            op9: field(word, 23, 9),
            op8: field(word, 24, 8),
            op6: field(word, 26, 6),
        }
    }
}

/// Instruction family selected by dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    AddsShiftedRegister,
    AddsImmediate,
    SubsShiftedRegister,
    /// Also `CMP Xn, #imm` when `Rd` is the zero register.
    SubsImmediate,
    Halt,
    CmpExtendedRegister,
    AndsShiftedRegister,
    EorShiftedRegister,
    OrrShiftedRegister,
    BranchConditional,
    Movz,
    Branch,
    BranchRegister,
    AddImmediate,
    AddShiftedRegister,
    Cbnz,
    Cbz,
    Mul,
    Stur,
    Sturb,
    Sturh,
    Ldur,
    Ldurb,
    Ldurh,
    ShiftImmediate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchEntry {
    pub pattern: u32,
    pub width: KeyWidth,
    pub opcode: Opcode,
}

const fn entry(pattern: u32, width: KeyWidth, opcode: Opcode) -> DispatchEntry {
    DispatchEntry {
        pattern,
        width,
        opcode,
    }
}

/// Ordered dispatch table. Earlier entries win.
pub const DISPATCH_TABLE: [DispatchEntry; 25] = {
    use KeyWidth::{Bits11, Bits6, Bits8, Bits9};
    use Opcode::*;
    [
        entry(ADDS_SHIFTED_REGISTER, Bits11, AddsShiftedRegister),
        entry(ADDS_IMMEDIATE, Bits8, AddsImmediate),
        entry(SUBS_SHIFTED_REGISTER, Bits11, SubsShiftedRegister),
        entry(SUBS_IMMEDIATE, Bits8, SubsImmediate),
        entry(HLT, Bits11, Halt),
        entry(CMP_EXTENDED_REGISTER, Bits11, CmpExtendedRegister),
        entry(ANDS_SHIFTED_REGISTER, Bits11, AndsShiftedRegister),
        entry(EOR_SHIFTED_REGISTER, Bits11, EorShiftedRegister),
        entry(ORR_SHIFTED_REGISTER, Bits11, OrrShiftedRegister),
        entry(B_COND, Bits8, BranchConditional),
        entry(MOVZ, Bits9, Movz),
        entry(B, Bits6, Branch),
        entry(BR, Bits11, BranchRegister),
        entry(ADD_IMMEDIATE, Bits8, AddImmediate),
        entry(ADD_SHIFTED_REGISTER, Bits11, AddShiftedRegister),
        entry(CBNZ, Bits8, Cbnz),
        entry(CBZ, Bits8, Cbz),
        entry(MUL, Bits11, Mul),
        entry(STUR, Bits11, Stur),
        entry(STURB, Bits11, Sturb),
        entry(STURH, Bits11, Sturh),
        entry(LDUR, Bits11, Ldur),
        entry(LDURB, Bits11, Ldurb),
        entry(LDURH, Bits11, Ldurh),
        entry(SHIFT_IMMEDIATE, Bits9, ShiftImmediate),
    ]
};

/// First table entry matching `word`, if any.
#[must_use]
pub fn classify(word: u32) -> Option<Opcode> {
    let keys = OpcodeKeys::from(word);
    tracing::trace!(
        "opcode keys: op11=0x{:03X} op9=0x{:03X} op8=0x{:02X} op6=0x{:02X}",
        keys.op11,
        keys.op9,
        keys.op8,
        keys.op6
    );

    DISPATCH_TABLE
        .iter()
        .find(|entry| keys.get(entry.width) == entry.pattern)
        .map(|entry| entry.opcode)
}
