//! Human-readable result lines.

use std::io::{self, Write};

use crate::format::format_bytes;
use crate::harness::BenchmarkResult;

/// Line layouts used by the benchmark binaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStyle {
    /// `memset for 1.00GB took 210.412ms (4.75GB bytes/sec)`
    Throughput,
    /// `HashMap: Lookup time: 0.812331 seconds`
    Seconds,
    /// Total and per-iteration seconds on two lines.
    Totals,
    /// `Decoding a.png 100 times took 52.1ms => 0.521ms avg`
    Repeated,
}

pub fn report<W: Write>(result: &BenchmarkResult, style: LineStyle, w: &mut W) -> io::Result<()> {
    match style {
        LineStyle::Throughput => {
            let bytes = result.bytes_processed().unwrap_or(0);
            let rate = match result.throughput_bytes_per_sec() {
                Some(rate) => format_bytes(rate as u64),
                None => "--".to_string(),
            };
            writeln!(
                w,
                "{} for {} took {:.3}ms ({} bytes/sec)",
                result.label(),
                format_bytes(bytes),
                result.elapsed_ms(),
                rate
            )
        }
        LineStyle::Seconds => writeln!(
            w,
            "{} time: {:.6} seconds",
            result.label(),
            result.elapsed_seconds()
        ),
        LineStyle::Totals => {
            writeln!(w, "Total Time: {:.4} seconds", result.elapsed_seconds())?;
            writeln!(
                w,
                "Average Time per Iteration: {:.4} seconds",
                result.seconds_per_iteration()
            )
        }
        LineStyle::Repeated => writeln!(
            w,
            "{} {} times took {:.6}ms => {:.6}ms avg",
            result.label(),
            result.iterations(),
            result.elapsed_ms(),
            result.seconds_per_iteration() * 1e3
        ),
    }
}

pub fn report_all<W: Write>(results: &[BenchmarkResult], style: LineStyle, w: &mut W) -> io::Result<()> {
    for result in results {
        report(result, style, w)?;
    }
    Ok(())
}
