//! # LEGv8 Instruction Decoding
//!
//! Turns a classified word into an [`Instruction`] with every field
//! extracted and validated. Decoding is the only place where an encoding
//! can be rejected, so executing an `Instruction` never fails halfway.
//!
//! ## Formats
//!
//! ```text
//!            31         21 20   16 15     10 9     5 4     0
//! R  format  |  opcode    |  Rm   | shamt   |  Rn   |  Rd   |
//! I  format  | opcode |sh|      imm12      |  Rn   |  Rd   |
//! D  format  |  opcode    |   imm9    |op2|  Rn   |  Rt   |
//! IW format  | opcode  |hw|       imm16           |  Rd   |
//! CB format  | opcode |         imm19             |  Rt   |
//! B  format  | op |               imm26                   |
//! ```
//!
//! ## Branch Offsets
//!
//! Offsets are word counts. The raw field is shifted left by 2 first and the
//! shifted value is then sign-extended from `field width + 2` bits:
//!
//! ```text
//! imm19 = 0x7FFFF  →  0x1FFFFC (21 bits)  →  -4
//! ```

use serde::{Deserialize, Serialize};

use crate::bitwise::{Bits, field};
use crate::cpu::condition::Condition;
use crate::cpu::opcode::{self, Opcode};
use crate::cpu::outcome::UnsupportedEncoding;
use crate::cpu::registers::REG_ZERO;

/// ALU operation of a data processing instruction.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub enum AluOperation {
    Add,
    Sub,
    And,
    Eor,
    Orr,
}

/// Extend applied to `Rm` by the extended register forms, selected by
/// `option` (bits 13-15).
#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub enum ExtendKind {
    Uxtb,
    Uxth,
    Uxtw,
    Uxtx,
    Sxtb,
    Sxth,
    Sxtw,
    Sxtx,
}

impl ExtendKind {
    #[must_use]
    pub fn apply(self, value: u64) -> u64 {
        match self {
            Self::Uxtb => value.get_bits(0..=7),
            Self::Uxth => value.get_bits(0..=15),
            Self::Uxtw => value.get_bits(0..=31),
            Self::Uxtx | Self::Sxtx => value,
            Self::Sxtb => value.sign_extended(8),
            Self::Sxth => value.sign_extended(16),
            Self::Sxtw => value.sign_extended(32),
        }
    }
}

impl From<u32> for ExtendKind {
    fn from(option: u32) -> Self {
        match option & 0b111 {
            0b000 => Self::Uxtb,
            0b001 => Self::Uxth,
            0b010 => Self::Uxtw,
            0b011 => Self::Uxtx,
            0b100 => Self::Sxtb,
            0b101 => Self::Sxth,
            0b110 => Self::Sxtw,
            _ => Self::Sxtx,
        }
    }
}

impl std::fmt::Display for ExtendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uxtb => f.write_str("UXTB"),
            Self::Uxth => f.write_str("UXTH"),
            Self::Uxtw => f.write_str("UXTW"),
            Self::Uxtx => f.write_str("UXTX"),
            Self::Sxtb => f.write_str("SXTB"),
            Self::Sxth => f.write_str("SXTH"),
            Self::Sxtw => f.write_str("SXTW"),
            Self::Sxtx => f.write_str("SXTX"),
        }
    }
}

/// Second operand of a data processing instruction.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub enum SecondOperand {
    /// Already shifted by the `sh` field.
    Immediate(u64),

    /// `Rm, LSL #amount`.
    ShiftedRegister { register: usize, amount: u32 },

    /// `Rm, <extend> #amount`.
    ExtendedRegister {
        register: usize,
        extend: ExtendKind,
        amount: u32,
    },
}

impl std::fmt::Display for SecondOperand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Immediate(value) => write!(f, "#{value}"),
            Self::ShiftedRegister { register, amount } => {
                write!(f, "{}", RegisterName(register))?;
                if amount != 0 {
                    write!(f, ", LSL #{amount}")?;
                }
                Ok(())
            }
            Self::ExtendedRegister {
                register,
                extend,
                amount,
            } => {
                write!(f, "{}, {extend}", RegisterName(register))?;
                if amount != 0 {
                    write!(f, " #{amount}")?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub enum ShiftKind {
    Lsl,
    Lsr,
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub enum LoadStoreKind {
    Store,
    Load,
}

/// Size of a single data transfer.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub enum Quantity {
    Doubleword,
    Halfword,
    Byte,
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub enum CompareBranchKind {
    /// `CBZ`
    Zero,

    /// `CBNZ`
    NonZero,
}

/// All supported instructions after decoding.
///
/// | Variant              | Instructions                         |
/// |----------------------|--------------------------------------|
/// | `DataProcessing`     | ADD, ADDS, SUBS, CMP, ANDS, EOR, ORR |
/// | `Multiply`           | MUL, MADD, MNEG, MSUB                |
/// | `Halt`               | HLT                                  |
/// | `Branch`             | B                                    |
/// | `BranchRegister`     | BR                                   |
/// | `BranchConditional`  | B.cond                               |
/// | `CompareAndBranch`   | CBZ, CBNZ                            |
/// | `MoveWide`           | MOVZ                                 |
/// | `ShiftImmediate`     | LSL, LSR                             |
/// | `SingleDataTransfer` | STUR(B/H), LDUR(B/H)                 |
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub enum Instruction {
    DataProcessing {
        alu_instruction: AluOperation,
        set_flags: bool,
        /// `None` for compare forms, which only update flags.
        destination: Option<usize>,
        rn: usize,
        op2: SecondOperand,
    },
    Multiply {
        rd: usize,
        rn: usize,
        rm: usize,
        /// Accumulator, `XZR` for a plain `MUL` or `MNEG`.
        ra: usize,
        /// `Ra - Rn * Rm` instead of `Ra + Rn * Rm`.
        subtract: bool,
    },
    Halt,
    Branch {
        offset: i64,
    },
    BranchRegister {
        rn: usize,
    },
    BranchConditional {
        condition: Condition,
        offset: i64,
    },
    CompareAndBranch {
        kind: CompareBranchKind,
        rt: usize,
        offset: i64,
    },
    MoveWide {
        rd: usize,
        immediate: u16,
    },
    ShiftImmediate {
        kind: ShiftKind,
        rd: usize,
        rn: usize,
        amount: u32,
    },
    SingleDataTransfer {
        kind: LoadStoreKind,
        quantity: Quantity,
        rt: usize,
        base_register: usize,
        offset: i64,
    },
}

fn register(word: u32, offset: u8) -> usize {
    field(word, offset, 5) as usize
}

/// Sign-extended `imm << 2`, where `imm` is `width` bits at `offset`.
fn branch_offset(word: u32, offset: u8, width: u8) -> i64 {
    let scaled = field(word, offset, width) << 2;
    i64::from(scaled.sign_extended(width + 2).cast_signed())
}

fn immediate_operand(word: u32) -> Result<SecondOperand, UnsupportedEncoding> {
    let imm12 = u64::from(field(word, 10, 12));
    match field(word, 22, 2) {
        0b00 => Ok(SecondOperand::Immediate(imm12)),
        0b01 => Ok(SecondOperand::Immediate(imm12 << 12)),
        shift => Err(UnsupportedEncoding::ImmediateShift { word, shift }),
    }
}

fn shifted_register_operand(word: u32) -> SecondOperand {
    SecondOperand::ShiftedRegister {
        register: register(word, 16),
        amount: field(word, 10, 6),
    }
}

fn extended_register_operand(word: u32) -> SecondOperand {
    SecondOperand::ExtendedRegister {
        register: register(word, 16),
        extend: field(word, 13, 3).into(),
        amount: field(word, 10, 3),
    }
}

impl Instruction {
    /// Decodes `word` as a member of the `opcode` family.
    ///
    /// # Errors
    ///
    /// Returns the offending sub-field when the family is right but the
    /// encoding is one this core does not execute.
    pub fn decode(opcode: Opcode, word: u32) -> Result<Self, UnsupportedEncoding> {
        let rd = register(word, 0);
        let rn = register(word, 5);

        let data_processing =
            |alu_instruction, set_flags, destination, op2| Self::DataProcessing {
                alu_instruction,
                set_flags,
                destination,
                rn,
                op2,
            };

        // Only the unscaled-offset form (bits 11-10 = 00) is executed.
        let transfer = |kind, quantity| match field(word, 10, 2) {
            0b00 => Ok(Self::SingleDataTransfer {
                kind,
                quantity,
                rt: rd,
                base_register: rn,
                offset: i64::from(field(word, 12, 9).sign_extended(9).cast_signed()),
            }),
            mode => Err(UnsupportedEncoding::IndexingMode { word, mode }),
        };

        let instruction = match opcode {
            Opcode::AddsShiftedRegister => data_processing(
                AluOperation::Add,
                true,
                Some(rd),
                shifted_register_operand(word),
            ),
            Opcode::SubsShiftedRegister => data_processing(
                AluOperation::Sub,
                true,
                Some(rd),
                shifted_register_operand(word),
            ),
            Opcode::AddShiftedRegister => data_processing(
                AluOperation::Add,
                false,
                Some(rd),
                shifted_register_operand(word),
            ),
            Opcode::CmpExtendedRegister => {
                let destination = (rd != REG_ZERO).then_some(rd);
                data_processing(
                    AluOperation::Sub,
                    true,
                    destination,
                    extended_register_operand(word),
                )
            }
            Opcode::AndsShiftedRegister => data_processing(
                AluOperation::And,
                true,
                Some(rd),
                shifted_register_operand(word),
            ),
            Opcode::EorShiftedRegister => data_processing(
                AluOperation::Eor,
                true,
                Some(rd),
                shifted_register_operand(word),
            ),
            Opcode::OrrShiftedRegister => data_processing(
                AluOperation::Orr,
                true,
                Some(rd),
                shifted_register_operand(word),
            ),
            Opcode::AddsImmediate => {
                data_processing(AluOperation::Add, true, Some(rd), immediate_operand(word)?)
            }
            Opcode::AddImmediate => {
                data_processing(AluOperation::Add, false, Some(rd), immediate_operand(word)?)
            }
            Opcode::SubsImmediate => {
                // CMP Xn, #imm is SUBS XZR, Xn, #imm.
                let destination = (rd != REG_ZERO).then_some(rd);
                data_processing(AluOperation::Sub, true, destination, immediate_operand(word)?)
            }
            Opcode::Mul => Self::Multiply {
                rd,
                rn,
                rm: register(word, 16),
                ra: register(word, 10),
                subtract: word.get_bit(15),
            },
            Opcode::Halt => Self::Halt,
            Opcode::Branch => Self::Branch {
                offset: branch_offset(word, 0, 26),
            },
            Opcode::BranchRegister => Self::BranchRegister { rn },
            Opcode::BranchConditional => {
                let code = field(word, 0, 4) as u8;
                let condition = Condition::try_from(code)
                    .map_err(|code| UnsupportedEncoding::Condition { word, code })?;
                Self::BranchConditional {
                    condition,
                    offset: branch_offset(word, 5, 19),
                }
            }
            Opcode::Cbz | Opcode::Cbnz => Self::CompareAndBranch {
                kind: if opcode == Opcode::Cbz {
                    CompareBranchKind::Zero
                } else {
                    CompareBranchKind::NonZero
                },
                rt: rd,
                offset: branch_offset(word, 5, 19),
            },
            Opcode::Movz => {
                let hw = field(word, 21, 2);
                if hw != 0 {
                    return Err(UnsupportedEncoding::MoveWideShift { word, hw });
                }
                Self::MoveWide {
                    rd,
                    immediate: field(word, 5, 16) as u16,
                }
            }
            Opcode::ShiftImmediate => {
                let immr = field(word, 16, 6);
                let imms = field(word, 10, 6);
                let (kind, amount) = if imms == 63 {
                    (ShiftKind::Lsr, immr)
                } else {
                    (ShiftKind::Lsl, 63 - imms)
                };
                Self::ShiftImmediate {
                    kind,
                    rd,
                    rn,
                    amount,
                }
            }
            Opcode::Stur => transfer(LoadStoreKind::Store, Quantity::Doubleword)?,
            Opcode::Sturb => transfer(LoadStoreKind::Store, Quantity::Byte)?,
            Opcode::Sturh => transfer(LoadStoreKind::Store, Quantity::Halfword)?,
            Opcode::Ldur => transfer(LoadStoreKind::Load, Quantity::Doubleword)?,
            Opcode::Ldurb => transfer(LoadStoreKind::Load, Quantity::Byte)?,
            Opcode::Ldurh => transfer(LoadStoreKind::Load, Quantity::Halfword)?,
        };

        Ok(instruction)
    }

}

impl TryFrom<u32> for Instruction {
    type Error = UnsupportedEncoding;

    fn try_from(word: u32) -> Result<Self, Self::Error> {
        let opcode = opcode::classify(word).ok_or(UnsupportedEncoding::Unclassified { word })?;
        Self::decode(opcode, word)
    }
}

struct RegisterName(usize);

impl std::fmt::Display for RegisterName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 == REG_ZERO {
            f.write_str("XZR")
        } else {
            write!(f, "X{}", self.0)
        }
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::DataProcessing {
                alu_instruction,
                set_flags,
                destination,
                rn,
                op2,
            } => {
                let rn = RegisterName(rn);
                let Some(rd) = destination else {
                    return write!(f, "CMP {rn}, {op2}");
                };
                let mnemonic = match (alu_instruction, set_flags) {
                    (AluOperation::Add, false) => "ADD",
                    (AluOperation::Add, true) => "ADDS",
                    (AluOperation::Sub, false) => "SUB",
                    (AluOperation::Sub, true) => "SUBS",
                    (AluOperation::And, _) => "ANDS",
                    (AluOperation::Eor, _) => "EOR",
                    (AluOperation::Orr, _) => "ORR",
                };
                write!(f, "{mnemonic} {}, {rn}, {op2}", RegisterName(rd))
            }
            Self::Multiply {
                rd,
                rn,
                rm,
                ra,
                subtract,
            } => {
                let (rd, rn, rm) = (RegisterName(rd), RegisterName(rn), RegisterName(rm));
                match (ra == REG_ZERO, subtract) {
                    (true, false) => write!(f, "MUL {rd}, {rn}, {rm}"),
                    (true, true) => write!(f, "MNEG {rd}, {rn}, {rm}"),
                    (false, false) => write!(f, "MADD {rd}, {rn}, {rm}, {}", RegisterName(ra)),
                    (false, true) => write!(f, "MSUB {rd}, {rn}, {rm}, {}", RegisterName(ra)),
                }
            }
            Self::Halt => f.write_str("HLT"),
            Self::Branch { offset } => write!(f, "B #{offset}"),
            Self::BranchRegister { rn } => write!(f, "BR {}", RegisterName(rn)),
            Self::BranchConditional { condition, offset } => {
                write!(f, "B.{condition} #{offset}")
            }
            Self::CompareAndBranch { kind, rt, offset } => {
                let mnemonic = match kind {
                    CompareBranchKind::Zero => "CBZ",
                    CompareBranchKind::NonZero => "CBNZ",
                };
                write!(f, "{mnemonic} {}, #{offset}", RegisterName(rt))
            }
            Self::MoveWide { rd, immediate } => {
                write!(f, "MOVZ {}, #0x{immediate:X}", RegisterName(rd))
            }
            Self::ShiftImmediate {
                kind,
                rd,
                rn,
                amount,
            } => {
                let mnemonic = match kind {
                    ShiftKind::Lsl => "LSL",
                    ShiftKind::Lsr => "LSR",
                };
                write!(
                    f,
                    "{mnemonic} {}, {}, #{amount}",
                    RegisterName(rd),
                    RegisterName(rn)
                )
            }
            Self::SingleDataTransfer {
                kind,
                quantity,
                rt,
                base_register,
                offset,
            } => {
                let base = match kind {
                    LoadStoreKind::Store => "STUR",
                    LoadStoreKind::Load => "LDUR",
                };
                let (suffix, rt) = match quantity {
                    Quantity::Doubleword => ("", RegisterName(rt).to_string()),
                    Quantity::Halfword => ("H", format!("W{rt}")),
                    Quantity::Byte => ("B", format!("W{rt}")),
                };
                write!(
                    f,
                    "{base}{suffix} {rt}, [{}, #{offset}]",
                    RegisterName(base_register)
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decode_add_immediate() {
        // ADD X1, X0, #5
        let output = Instruction::try_from(0x9100_1401).unwrap();
        assert_eq!(
            Instruction::DataProcessing {
                alu_instruction: AluOperation::Add,
                set_flags: false,
                destination: Some(1),
                rn: 0,
                op2: SecondOperand::Immediate(5),
            },
            output
        );
        assert_eq!("ADD X1, X0, #5", output.to_string());

        // ADD X1, X0, #1, LSL #12
        let output = Instruction::try_from(0x9140_0401).unwrap();
        assert_eq!("ADD X1, X0, #4096", output.to_string());
    }

    #[test]
    fn decode_reserved_immediate_shift() {
        for shift in [0b10, 0b11] {
            let word = 0x9100_1401 | (shift << 22);
            assert_eq!(
                Instruction::try_from(word),
                Err(UnsupportedEncoding::ImmediateShift { word, shift })
            );
        }
    }

    #[test]
    fn decode_compare_immediate() {
        // CMP X2, #0
        let output = Instruction::try_from(0xF100_005F).unwrap();
        assert_eq!(
            Instruction::DataProcessing {
                alu_instruction: AluOperation::Sub,
                set_flags: true,
                destination: None,
                rn: 2,
                op2: SecondOperand::Immediate(0),
            },
            output
        );
        assert_eq!("CMP X2, #0", output.to_string());

        // SUBS X1, X2, #3
        let output = Instruction::try_from(0xF100_0C41).unwrap();
        assert_eq!("SUBS X1, X2, #3", output.to_string());
    }

    #[test]
    fn decode_registers() {
        // ADDS X1, X2, X3
        let output = Instruction::try_from(0xAB03_0041).unwrap();
        assert_eq!("ADDS X1, X2, X3", output.to_string());

        // ANDS X4, X5, X6, LSL #2
        let output = Instruction::try_from(0xEA06_08A4).unwrap();
        assert_eq!(
            Instruction::DataProcessing {
                alu_instruction: AluOperation::And,
                set_flags: true,
                destination: Some(4),
                rn: 5,
                op2: SecondOperand::ShiftedRegister {
                    register: 6,
                    amount: 2
                },
            },
            output
        );

        // CMP X0, X3, UXTX
        let output = Instruction::try_from(0xEB23_601F).unwrap();
        assert_eq!(
            Instruction::DataProcessing {
                alu_instruction: AluOperation::Sub,
                set_flags: true,
                destination: None,
                rn: 0,
                op2: SecondOperand::ExtendedRegister {
                    register: 3,
                    extend: ExtendKind::Uxtx,
                    amount: 0
                },
            },
            output
        );
        assert_eq!("CMP X0, X3, UXTX", output.to_string());

        // SUBS X1, X2, X3, UXTX
        let output = Instruction::try_from(0xEB23_6041).unwrap();
        assert!(matches!(
            output,
            Instruction::DataProcessing {
                destination: Some(1),
                rn: 2,
                ..
            }
        ));
        assert_eq!("SUBS X1, X2, X3, UXTX", output.to_string());
    }

    #[test]
    fn decode_multiply() {
        let output = Instruction::try_from(0x9B03_7C41).unwrap();
        assert_eq!(
            Instruction::Multiply {
                rd: 1,
                rn: 2,
                rm: 3,
                ra: REG_ZERO,
                subtract: false,
            },
            output
        );
        assert_eq!("MUL X1, X2, X3", output.to_string());

        // MSUB X1, X2, X3, X4
        let output = Instruction::try_from(0x9B03_9041).unwrap();
        assert_eq!(
            Instruction::Multiply {
                rd: 1,
                rn: 2,
                rm: 3,
                ra: 4,
                subtract: true,
            },
            output
        );
        assert_eq!("MSUB X1, X2, X3, X4", output.to_string());

        // MNEG X1, X2, X3
        let output = Instruction::try_from(0x9B03_FC41).unwrap();
        assert_eq!("MNEG X1, X2, X3", output.to_string());
    }

    #[test]
    fn decode_branch_offsets() {
        // B #8
        assert_eq!(
            Instruction::try_from(0x1400_0002),
            Ok(Instruction::Branch { offset: 8 })
        );
        // B #-4
        assert_eq!(
            Instruction::try_from(0x17FF_FFFF),
            Ok(Instruction::Branch { offset: -4 })
        );
        // B.EQ with imm19 = 0x7FFFF
        assert_eq!(
            Instruction::try_from(0x54FF_FFE0),
            Ok(Instruction::BranchConditional {
                condition: Condition::EQ,
                offset: -4
            })
        );
        // CBZ X0 with imm19 = 0
        assert_eq!(
            Instruction::try_from(0xB400_0000),
            Ok(Instruction::CompareAndBranch {
                kind: CompareBranchKind::Zero,
                rt: 0,
                offset: 0
            })
        );
        // CBNZ X3, #-16
        let output = Instruction::try_from(0xB5FF_FF83).unwrap();
        assert_eq!("CBNZ X3, #-16", output.to_string());
    }

    #[test]
    fn decode_branch_condition_rejected() {
        let word = 0x5400_0048; // B.HI
        assert_eq!(
            Instruction::try_from(word),
            Err(UnsupportedEncoding::Condition { word, code: 0x8 })
        );
        assert_eq!(
            Instruction::try_from(0x5400_004B).unwrap().to_string(),
            "B.LT #8"
        );
    }

    #[test]
    fn decode_branch_register() {
        assert_eq!(
            Instruction::try_from(0xD61F_0020),
            Ok(Instruction::BranchRegister { rn: 1 })
        );
    }

    #[test]
    fn decode_movz() {
        assert_eq!(
            Instruction::try_from(0xD280_0021),
            Ok(Instruction::MoveWide {
                rd: 1,
                immediate: 1
            })
        );

        let word = 0xD2A0_0021;
        assert_eq!(
            Instruction::try_from(word),
            Err(UnsupportedEncoding::MoveWideShift { word, hw: 1 })
        );
    }

    #[test]
    fn decode_shift_immediate() {
        let output = Instruction::try_from(0xD37C_EC20).unwrap();
        assert_eq!(
            Instruction::ShiftImmediate {
                kind: ShiftKind::Lsl,
                rd: 0,
                rn: 1,
                amount: 4
            },
            output
        );

        let output = Instruction::try_from(0xD344_FC20).unwrap();
        assert_eq!("LSR X0, X1, #4", output.to_string());
    }

    #[test]
    fn decode_transfers() {
        // STUR X0, [X1, #-8]
        let output = Instruction::try_from(0xF81F_8020).unwrap();
        assert_eq!(
            Instruction::SingleDataTransfer {
                kind: LoadStoreKind::Store,
                quantity: Quantity::Doubleword,
                rt: 0,
                base_register: 1,
                offset: -8,
            },
            output
        );
        assert_eq!("STUR X0, [X1, #-8]", output.to_string());

        // LDURB W2, [X3, #255]
        let output = Instruction::try_from(0x384F_F062).unwrap();
        assert_eq!("LDURB W2, [X3, #255]", output.to_string());

        // LDURH W2, [X3, #0]
        let output = Instruction::try_from(0x7840_0062).unwrap();
        assert_eq!("LDURH W2, [X3, #0]", output.to_string());
    }

    #[test]
    fn decode_transfers_with_writeback_rejected() {
        let cases = [
            (0xF840_8420, 0b01), // LDR X0, [X1], #8
            (0xF840_8C20, 0b11), // LDR X0, [X1, #8]!
            (0xF800_8820, 0b10), // STTR X0, [X1, #8]
            (0x3840_1420, 0b01), // LDRB W0, [X1], #1
        ];

        for (word, mode) in cases {
            assert_eq!(
                Instruction::try_from(word),
                Err(UnsupportedEncoding::IndexingMode { word, mode }),
                "word 0x{word:08X}"
            );
        }
    }

    #[test]
    fn decode_unclassified() {
        assert_eq!(
            Instruction::try_from(0),
            Err(UnsupportedEncoding::Unclassified { word: 0 })
        );
    }

    #[test]
    fn extend_kinds() {
        assert_eq!(ExtendKind::Uxtb.apply(0x1FF), 0xFF);
        assert_eq!(ExtendKind::Sxtb.apply(0x80), 0xFFFF_FFFF_FFFF_FF80);
        assert_eq!(ExtendKind::Sxth.apply(0x7FFF), 0x7FFF);
        assert_eq!(ExtendKind::Uxtw.apply(u64::MAX), 0xFFFF_FFFF);
        assert_eq!(ExtendKind::Sxtw.apply(0xFFFF_FFFF), u64::MAX);
        assert_eq!(ExtendKind::from(0b011), ExtendKind::Uxtx);
    }
}
