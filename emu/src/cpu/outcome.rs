use super::instruction::Instruction;

/// A word the core refuses to execute. Nothing in the next state is touched
/// when one of these is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UnsupportedEncoding {
    #[error("no opcode pattern matches word 0x{word:08X}")]
    Unclassified { word: u32 },

    #[error("reserved immediate shift type {shift} in word 0x{word:08X}")]
    ImmediateShift { word: u32, shift: u32 },

    #[error("MOVZ with hw={hw} is not supported (word 0x{word:08X})")]
    MoveWideShift { word: u32, hw: u32 },

    #[error("unsupported branch condition 0x{code:X} in word 0x{word:08X}")]
    Condition { word: u32, code: u8 },

    #[error("load/store indexing mode {mode:#04b} is not supported (word 0x{word:08X})")]
    IndexingMode { word: u32, mode: u32 },
}

impl UnsupportedEncoding {
    #[must_use]
    pub const fn word(&self) -> u32 {
        match *self {
            Self::Unclassified { word }
            | Self::ImmediateShift { word, .. }
            | Self::MoveWideShift { word, .. }
            | Self::Condition { word, .. }
            | Self::IndexingMode { word, .. } => word,
        }
    }
}

/// Result of one fetch-decode-execute cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Executed(Instruction),

    /// The halt instruction ran and cleared the run flag.
    Halted,

    Unsupported(UnsupportedEncoding),
}
