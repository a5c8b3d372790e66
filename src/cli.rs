//! Plumbing shared by the benchmark binaries.

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::harness::{BenchmarkResult, Clock, Harness};
use crate::schema::{BenchReport, RunMeta};

/// Options every benchmark binary accepts.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Time source; each benchmark has its own default.
    #[arg(long, value_enum)]
    pub clock: Option<Clock>,

    /// Also write a JSON report of the measurements to this file.
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Only log warnings and errors.
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}

impl CommonArgs {
    pub fn harness(&self, default: Clock) -> Harness {
        Harness::new(self.clock.unwrap_or(default))
    }

    /// Write the JSON report when `--json` was given.
    pub fn emit_json(&self, benchmark: &str, harness: &Harness, results: &[BenchmarkResult]) -> crate::Result<()> {
        let Some(path) = &self.json else {
            return Ok(());
        };
        BenchReport::new(RunMeta::new(benchmark, harness.clock()), results).write_to(path)?;
        tracing::info!(path = %path.display(), "wrote JSON report");
        Ok(())
    }
}

/// Parse arguments, exiting with status 1 on invalid usage and 0 for
/// `--help`/`--version`.
pub fn parse_or_exit<P: Parser>() -> P {
    match P::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    }
}
