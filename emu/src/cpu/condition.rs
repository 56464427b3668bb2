//! # Branch Conditions
//!
//! `B.cond` carries a 4-bit condition in bits 0-3. The encoding follows the
//! ARM condition table, but only six codes are supported and they are
//! evaluated on N and Z only (this core does not track C or V):
//!
//! ```text
//! ┌───────┬────────┬─────────────────────┬──────────────────┐
//! │ Code  │ Suffix │     Meaning         │   Flags Tested   │
//! ├───────┼────────┼─────────────────────┼──────────────────┤
//! │ 0000  │   EQ   │ Equal               │ Z=1              │
//! │ 0001  │   NE   │ Not equal           │ Z=0              │
//! │ 1010  │   GE   │ ≥ (signed)          │ N=0              │
//! │ 1011  │   LT   │ < (signed)          │ N=1              │
//! │ 1100  │   GT   │ > (signed)          │ Z=0 AND N=0      │
//! │ 1101  │   LE   │ ≤ (signed)          │ Z=1 OR N=1       │
//! └───────┴────────┴─────────────────────┴──────────────────┘
//! ```
//!
//! Any other code is rejected at decode time.

use serde::{Deserialize, Serialize};

use super::flags::Flags;

#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub enum Condition {
    /// Equal (Z=1)
    EQ = 0x0,

    /// Not equal (Z=0)
    NE = 0x1,

    /// Signed greater or equal (N=0)
    GE = 0xA,

    /// Signed less than (N=1)
    LT = 0xB,

    /// Signed greater than (Z=0 AND N=0)
    GT = 0xC,

    /// Signed less than or equal (Z=1 OR N=1)
    LE = 0xD,
}

impl Condition {
    #[must_use]
    pub const fn holds(self, flags: Flags) -> bool {
        match self {
            Self::EQ => flags.zero(),
            Self::NE => !flags.zero(),
            Self::GE => !flags.negative(),
            Self::LT => flags.negative(),
            Self::GT => !flags.zero() && !flags.negative(),
            Self::LE => flags.zero() || flags.negative(),
        }
    }
}

impl TryFrom<u8> for Condition {
    /// The rejected code.
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0x0 => Ok(Self::EQ),
            0x1 => Ok(Self::NE),
            0xA => Ok(Self::GE),
            0xB => Ok(Self::LT),
            0xC => Ok(Self::GT),
            0xD => Ok(Self::LE),
            _ => Err(code),
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EQ => f.write_str("EQ"),
            Self::NE => f.write_str("NE"),
            Self::GE => f.write_str("GE"),
            Self::LT => f.write_str("LT"),
            Self::GT => f.write_str("GT"),
            Self::LE => f.write_str("LE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn zero_set_negative_clear() {
        let flags = Flags::new(false, true);
        assert!(Condition::EQ.holds(flags));
        assert!(!Condition::NE.holds(flags));
        assert!(Condition::GE.holds(flags));
        assert!(!Condition::GT.holds(flags));
        assert!(Condition::LE.holds(flags));
    }

    #[test]
    fn negative_set_zero_clear() {
        let flags = Flags::new(true, false);
        assert!(Condition::LT.holds(flags));
        assert!(!Condition::GE.holds(flags));
        assert!(Condition::NE.holds(flags));
        assert!(Condition::LE.holds(flags));
        assert!(!Condition::GT.holds(flags));
    }

    #[test]
    fn positive_nonzero() {
        let flags = Flags::new(false, false);
        assert!(Condition::GT.holds(flags));
        assert!(Condition::GE.holds(flags));
        assert!(!Condition::LE.holds(flags));
    }

    #[test]
    fn unsupported_codes_rejected() {
        for code in [0x2, 0x3, 0x4, 0x5, 0x6, 0x7, 0x8, 0x9, 0xE, 0xF] {
            assert_eq!(Condition::try_from(code), Err(code));
        }
        assert_eq!(Condition::try_from(0xB), Ok(Condition::LT));
    }
}
