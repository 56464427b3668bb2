use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use emu::config::{DEFAULT_TEXT_START, SimConfig, SubwordAccess, UnsupportedPolicy};
use emu::cpu::legv8::{Legv8, StopReason};
use emu::cpu::state::ArchState;
use emu::memory::SparseMemory;

mod program;

#[derive(Parser, Debug)]
#[command(name = "legv8", version, about = "Runs a LEGv8 program until it halts.")]
struct Args {
    /// Program listing: one hex instruction word per line.
    program: PathBuf,

    /// Load address and initial program counter.
    #[arg(long, value_name = "ADDR", value_parser = parse_address, default_value_t = DEFAULT_TEXT_START)]
    text_start: u64,

    /// Stop after this many instructions.
    #[arg(long, value_name = "N")]
    max_steps: Option<u64>,

    /// Byte and halfword transfers move whole words.
    #[arg(long, default_value_t = false)]
    legacy_subword: bool,

    /// Step over unsupported words instead of stopping.
    #[arg(long, default_value_t = false)]
    skip_unsupported: bool,

    /// Write logs to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the final state as JSON.
    #[arg(long, default_value_t = false)]
    dump_json: bool,
}

impl Args {
    fn config(&self) -> SimConfig {
        SimConfig {
            text_start: self.text_start,
            max_steps: self.max_steps,
            subword_access: if self.legacy_subword {
                SubwordAccess::Legacy
            } else {
                SubwordAccess::Precise
            },
            on_unsupported: if self.skip_unsupported {
                UnsupportedPolicy::Skip
            } else {
                UnsupportedPolicy::Stop
            },
        }
    }
}

fn parse_address(value: &str) -> Result<u64, String> {
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => value.replace('_', "").parse(),
    };
    parsed.map_err(|e| format!("invalid address `{value}`: {e}"))
}

fn init_tracing(log_file: Option<&Path>) -> Result<Option<WorkerGuard>, Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().ok_or("log file path has no file name")?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(Some(guard))
}

fn print_state(state: &ArchState) {
    println!("PC  0x{:016X}", state.program_counter());
    println!(
        "N={} Z={}",
        u8::from(state.flags.negative()),
        u8::from(state.flags.zero())
    );
    for (index, value) in state.registers.nonzero() {
        println!("X{index:<2} 0x{value:016X} ({value})");
    }
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    let args = Args::parse();
    let _guard = init_tracing(args.log_file.as_deref())?;

    let config = args.config();
    let words = program::read(&args.program)?;
    tracing::info!(
        "loaded {} words from {} at 0x{:016X}",
        words.len(),
        args.program.display(),
        config.text_start
    );

    let mut memory = SparseMemory::new();
    memory.load_words(config.text_start, words);

    let mut cpu = Legv8::new(memory, config);
    let summary = cpu.run();

    if args.dump_json {
        println!("{}", serde_json::to_string_pretty(&cpu.current)?);
    } else {
        print_state(&cpu.current);
    }

    match summary.stop {
        StopReason::Halted => Ok(ExitCode::SUCCESS),
        StopReason::StepLimit => {
            eprintln!("step limit reached after {} steps", summary.steps);
            Ok(ExitCode::from(2))
        }
        StopReason::Unsupported { pc, error } => {
            eprintln!("0x{pc:016X}: {error}");
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn addresses() {
        assert_eq!(parse_address("0x0040_0000"), Ok(0x40_0000));
        assert_eq!(parse_address("4096"), Ok(4096));
        assert!(parse_address("0xZZ").is_err());
    }

    #[test]
    fn flags_to_config() {
        let args = Args::parse_from([
            "legv8",
            "prog.hex",
            "--text-start",
            "0x1000",
            "--max-steps",
            "50",
            "--legacy-subword",
            "--skip-unsupported",
        ]);

        assert_eq!(
            args.config(),
            SimConfig {
                text_start: 0x1000,
                max_steps: Some(50),
                subword_access: SubwordAccess::Legacy,
                on_unsupported: UnsupportedPolicy::Skip,
            }
        );
        assert!(!args.dump_json);
    }

    #[test]
    fn default_config() {
        let args = Args::parse_from(["legv8", "prog.hex"]);
        assert_eq!(args.config(), SimConfig::default());
    }
}
