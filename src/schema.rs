use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::harness::{BenchmarkResult, Clock};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMeta {
    pub schema_version: u32,
    pub bench_version: String,
    pub benchmark: String,
    pub clock: String,
    pub timestamp_utc: String,
    pub git_sha: Option<String>,
}

impl RunMeta {
    pub fn new(benchmark: &str, clock: Clock) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            bench_version: env!("CARGO_PKG_VERSION").to_string(),
            benchmark: benchmark.to_string(),
            clock: clock.as_str().to_string(),
            timestamp_utc: unix_timestamp(),
            git_sha: git_sha_short(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    pub name: String,

    pub iters: u64,
    pub elapsed_seconds: f64,
    pub ns_per_iter: f64,

    pub bytes_processed: Option<u64>,
    pub throughput_bytes_per_s: Option<f64>,

    pub extra: serde_json::Value,
}

impl From<&BenchmarkResult> for Measurement {
    fn from(r: &BenchmarkResult) -> Self {
        Self {
            name: r.label().to_string(),
            iters: r.iterations(),
            elapsed_seconds: r.elapsed_seconds(),
            ns_per_iter: r.seconds_per_iteration() * 1e9,
            bytes_processed: r.bytes_processed(),
            throughput_bytes_per_s: r.throughput_bytes_per_sec(),
            extra: serde_json::Value::Null,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchReport {
    pub run: RunMeta,
    pub measurements: Vec<Measurement>,
}

impl BenchReport {
    pub fn new(run: RunMeta, results: &[BenchmarkResult]) -> Self {
        Self {
            run,
            measurements: results.iter().map(Measurement::from).collect(),
        }
    }

    pub fn write_to(&self, path: &Path) -> crate::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, json).map_err(|source| crate::BenchError::CreateOutput {
            path: path.to_path_buf(),
            source,
        })
    }
}

// No date crate in the tree; seconds since the epoch are enough to order runs.
fn unix_timestamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("unix:{secs}")
}

fn git_sha_short() -> Option<String> {
    std::env::var("GIT_SHA")
        .or_else(|_| std::env::var("GITHUB_SHA"))
        .ok()
        .map(|s| s.chars().take(12).collect())
}
