//! Standalone micro-benchmarks and the small harness they share.
//!
//! Each binary under `src/bin` owns one workload from [`benches`]; the
//! harness only times a unit of work and formats the outcome.

pub mod benches;
pub mod cli;
pub mod error;
pub mod format;
pub mod harness;
pub mod logging;
pub mod plot;
pub mod report;
pub mod schema;

pub use error::{BenchError, Result};
pub use format::{format_bytes, ByteSize};
pub use harness::{run, BenchmarkResult, Clock, Harness, Timer};
