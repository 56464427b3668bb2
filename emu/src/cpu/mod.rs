//! # LEGv8 Core
//!
//! A single-step decode/execute engine for a 64-bit LEGv8 subset.
//!
//! ## Step
//!
//! ```text
//!  current ──► fetch word at PC ──► classify ──► decode ──► execute ──► next
//!                                      │            │
//!                                      └── None ────┴── Err ──► Unsupported
//! ```
//!
//! One step reads the *current* [`ArchState`](state::ArchState) and writes the
//! *next* one. Copying next into current is the caller's job
//! ([`Legv8::commit`](legv8::Legv8::commit)), so several steps may be
//! inspected before anything is made visible.
//!
//! ## Formats
//!
//! | Format | Opcode bits | Examples                        |
//! |--------|-------------|---------------------------------|
//! | R      | 31-21       | ADDS, SUBS, ANDS, EOR, ORR, MUL |
//! | D      | 31-21       | STUR, LDURB, LDURH              |
//! | I      | 31-24       | ADD, ADDS, SUBS / CMP           |
//! | CB     | 31-24       | B.cond, CBZ, CBNZ               |
//! | IW     | 31-23       | MOVZ                            |
//! | B      | 31-26       | B                               |
//!
//! ## Submodules
//!
//! - [`opcode`]: opcode keys and the ordered dispatch table
//! - [`instruction`]: decoded instructions
//! - [`operations`]: what each instruction does
//! - [`legv8`]: step, commit and the run loop

pub mod condition;

#[allow(clippy::cast_possible_truncation)]
pub mod flags;

#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::module_name_repetitions)]
pub mod instruction;

#[allow(clippy::module_name_repetitions)]
pub mod legv8;
pub mod opcode;

#[allow(clippy::cast_possible_truncation)]
pub mod operations;
pub mod outcome;
pub mod registers;
pub mod state;
