use crate::config::{SimConfig, UnsupportedPolicy};
use crate::cpu::instruction::Instruction;
use crate::cpu::operations::Executor;
use crate::cpu::outcome::{StepOutcome, UnsupportedEncoding};
use crate::cpu::state::{ArchState, SIZE_OF_INSTRUCTION};
use crate::memory::{Memory, SubwordAccess};

/// Executes the word at `current`'s program counter.
///
/// Effects land in `next`, `memory` and `running`; `current` is only read.
/// When the word is unsupported nothing is written at all.
pub fn step<M: Memory + ?Sized>(
    current: &ArchState,
    next: &mut ArchState,
    memory: &mut M,
    running: &mut bool,
    subword_access: SubwordAccess,
) -> StepOutcome {
    let pc = current.program_counter();
    let word = memory.read_word(pc);
    tracing::trace!("fetched 0x{word:08X} at 0x{pc:016X}");

    let instruction = match Instruction::try_from(word) {
        Ok(instruction) => instruction,
        Err(error) => {
            tracing::warn!("0x{pc:016X}: {error}");
            return StepOutcome::Unsupported(error);
        }
    };
    tracing::debug!("0x{pc:016X}: {instruction}");

    Executor {
        current,
        next,
        memory,
        running,
        subword_access,
    }
    .execute(instruction);

    next.registers.clear_zero_register();

    match instruction {
        Instruction::Halt => StepOutcome::Halted,
        _ => StepOutcome::Executed(instruction),
    }
}

/// Why [`Legv8::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Halted,
    StepLimit,
    Unsupported {
        pc: u64,
        error: UnsupportedEncoding,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: u64,
    pub stop: StopReason,
}

/// The core together with the collaborators it needs: a memory, the
/// current/next state pair and the run flag.
pub struct Legv8<M: Memory> {
    pub memory: M,
    pub current: ArchState,
    pub next: ArchState,
    running: bool,
    config: SimConfig,
}

impl<M: Memory> Legv8<M> {
    pub fn new(memory: M, config: SimConfig) -> Self {
        let state = ArchState::with_program_counter(config.text_start);
        Self::with_state(memory, state, config)
    }

    pub fn with_state(memory: M, state: ArchState, config: SimConfig) -> Self {
        Self {
            memory,
            current: state.clone(),
            next: state,
            running: true,
            config,
        }
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    pub fn fetch(&self) -> u32 {
        self.memory.read_word(self.current.program_counter())
    }

    /// Runs one instruction without committing it.
    pub fn step(&mut self) -> StepOutcome {
        step(
            &self.current,
            &mut self.next,
            &mut self.memory,
            &mut self.running,
            self.config.subword_access,
        )
    }

    /// Makes the next state current.
    pub fn commit(&mut self) {
        self.current.clone_from(&self.next);
    }

    /// Steps and commits until halt, the step bound, or an unsupported word
    /// under [`UnsupportedPolicy::Stop`].
    pub fn run(&mut self) -> RunSummary {
        let mut steps = 0;

        let stop = loop {
            if !self.running {
                break StopReason::Halted;
            }
            if self.config.max_steps.is_some_and(|max| steps >= max) {
                break StopReason::StepLimit;
            }

            let outcome = self.step();
            steps += 1;

            if let StepOutcome::Unsupported(error) = outcome {
                let pc = self.current.program_counter();
                match self.config.on_unsupported {
                    UnsupportedPolicy::Stop => break StopReason::Unsupported { pc, error },
                    UnsupportedPolicy::Skip => {
                        tracing::info!("skipping 0x{:08X} at 0x{pc:016X}", error.word());
                        self.next.advance_program_counter(SIZE_OF_INSTRUCTION);
                    }
                }
            }

            self.commit();
        };

        tracing::info!("stopped after {steps} steps: {stop:?}");
        RunSummary { steps, stop }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TEXT_START;
    use crate::memory::SparseMemory;
    use pretty_assertions::assert_eq;

    fn core(program: &[u32], config: SimConfig) -> Legv8<SparseMemory> {
        let mut memory = SparseMemory::new();
        memory.load_words(config.text_start, program.iter().copied());
        Legv8::new(memory, config)
    }

    #[test]
    fn step_does_not_commit() {
        // ADD X1, X0, #5
        let mut cpu = core(&[0x9100_1401], SimConfig::default());

        cpu.step();
        assert_eq!(cpu.current.program_counter(), DEFAULT_TEXT_START);
        assert_eq!(cpu.next.program_counter(), DEFAULT_TEXT_START + 4);

        cpu.commit();
        assert_eq!(cpu.current.registers.register_at(1), 5);
    }

    #[test]
    fn run_until_halt() {
        let program = [
            0xD280_0140, // MOVZ X0, #10
            0x9100_1401, // ADD X1, X0, #5
            0xD440_0000, // HLT #0
        ];
        let mut cpu = core(&program, SimConfig::default());

        let summary = cpu.run();

        assert_eq!(
            summary,
            RunSummary {
                steps: 3,
                stop: StopReason::Halted
            }
        );
        assert!(!cpu.is_running());
        assert_eq!(cpu.current.registers.register_at(1), 15);
        assert_eq!(cpu.current.program_counter(), DEFAULT_TEXT_START + 8);
    }

    #[test]
    fn step_limit() {
        // B #0
        let config = SimConfig {
            max_steps: Some(10),
            ..SimConfig::default()
        };
        let mut cpu = core(&[0x1400_0000], config);

        let summary = cpu.run();

        assert_eq!(summary.steps, 10);
        assert_eq!(summary.stop, StopReason::StepLimit);
        assert!(cpu.is_running());
    }

    #[test]
    fn unsupported_stops_by_default() {
        let mut cpu = core(&[0x9100_1401, 0xFFFF_FFFF], SimConfig::default());

        let summary = cpu.run();

        assert_eq!(
            summary.stop,
            StopReason::Unsupported {
                pc: DEFAULT_TEXT_START + 4,
                error: UnsupportedEncoding::Unclassified { word: 0xFFFF_FFFF }
            }
        );
        assert_eq!(cpu.current.program_counter(), DEFAULT_TEXT_START + 4);
    }

    #[test]
    fn unsupported_skipped() {
        let config = SimConfig {
            on_unsupported: UnsupportedPolicy::Skip,
            ..SimConfig::default()
        };
        let program = [
            0xFFFF_FFFF, // unclassified
            0x9100_1401, // ADD X1, X0, #5
            0xD440_0000, // HLT #0
        ];
        let mut cpu = core(&program, config);

        let summary = cpu.run();

        assert_eq!(summary.stop, StopReason::Halted);
        assert_eq!(summary.steps, 3);
        assert_eq!(cpu.current.registers.register_at(1), 5);
    }

    #[test]
    fn fetch_reads_current_pc() {
        let cpu = core(&[0xD440_0000], SimConfig::default());
        assert_eq!(cpu.fetch(), 0xD440_0000);
    }
}
