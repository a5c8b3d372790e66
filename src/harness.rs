use std::convert::Infallible;
use std::time::{Duration, Instant};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Time source a [`Timer`] reads from.
#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq)]
pub enum Clock {
    /// Wall-clock time from the monotonic clock.
    #[default]
    Monotonic,
    /// CPU time consumed by the whole process.
    ProcessCpu,
    /// CPU time spent in user mode.
    UserCpu,
}

impl Clock {
    pub fn as_str(&self) -> &'static str {
        match self {
            Clock::Monotonic => "monotonic",
            Clock::ProcessCpu => "process-cpu",
            Clock::UserCpu => "user-cpu",
        }
    }
}

#[cfg(unix)]
fn cpu_time(clock: Clock) -> Option<Duration> {
    match clock {
        Clock::Monotonic => None,
        Clock::ProcessCpu => {
            let mut ts = std::mem::MaybeUninit::<libc::timespec>::zeroed();
            // SAFETY: `ts` is a valid, writable timespec for the whole call.
            let rc = unsafe { libc::clock_gettime(libc::CLOCK_PROCESS_CPUTIME_ID, ts.as_mut_ptr()) };
            if rc != 0 {
                return None;
            }
            // SAFETY: zero-initialised and filled in by a successful call.
            let ts = unsafe { ts.assume_init() };
            Some(Duration::new(ts.tv_sec as u64, ts.tv_nsec as u32))
        }
        Clock::UserCpu => {
            let mut usage = std::mem::MaybeUninit::<libc::rusage>::zeroed();
            // SAFETY: `usage` is a valid, writable rusage for the whole call.
            let rc = unsafe { libc::getrusage(libc::RUSAGE_SELF, usage.as_mut_ptr()) };
            if rc != 0 {
                return None;
            }
            // SAFETY: zero-initialised and filled in by a successful call.
            let usage = unsafe { usage.assume_init() };
            let utime = usage.ru_utime;
            Some(Duration::new(utime.tv_sec as u64, (utime.tv_usec as u32) * 1_000))
        }
    }
}

#[cfg(not(unix))]
fn cpu_time(_clock: Clock) -> Option<Duration> {
    None
}

/// Records a start point; [`Timer::elapsed`] reads the time since then without
/// resetting it.
///
/// CPU clocks fall back to the monotonic clock where the platform cannot
/// report CPU time, including when a later read fails.
#[derive(Clone, Copy, Debug)]
pub struct Timer {
    clock: Clock,
    wall: Instant,
    cpu: Option<Duration>,
}

impl Timer {
    pub fn start(clock: Clock) -> Self {
        let cpu = cpu_time(clock);
        Self {
            clock,
            wall: Instant::now(),
            cpu,
        }
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub fn elapsed(&self) -> Duration {
        self.since(self.cpu.and(cpu_time(self.clock)))
    }

    fn since(&self, cpu_now: Option<Duration>) -> Duration {
        match (self.cpu, cpu_now) {
            (Some(start), Some(now)) => now.saturating_sub(start),
            (Some(_), None) => {
                tracing::warn!(clock = self.clock.as_str(), "cpu clock unavailable, using wall time");
                self.wall.elapsed()
            }
            (None, _) => self.wall.elapsed(),
        }
    }
}

/// Outcome of one timed trial. Built by the harness, read by reporters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    label: String,
    elapsed_seconds: f64,
    iterations: u64,
    bytes_processed: Option<u64>,
}

impl BenchmarkResult {
    pub fn new(label: impl Into<String>, elapsed: Duration, iterations: u64) -> Self {
        Self {
            label: label.into(),
            elapsed_seconds: elapsed.as_secs_f64(),
            iterations,
            bytes_processed: None,
        }
    }

    pub fn with_bytes_processed(mut self, bytes: u64) -> Self {
        self.bytes_processed = Some(bytes);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_seconds * 1e3
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn bytes_processed(&self) -> Option<u64> {
        self.bytes_processed
    }

    /// Bytes per second, or `None` when there is no byte count or the trial
    /// finished below the clock's resolution.
    pub fn throughput_bytes_per_sec(&self) -> Option<f64> {
        let bytes = self.bytes_processed?;
        if self.elapsed_seconds <= 0.0 {
            return None;
        }
        Some(bytes as f64 / self.elapsed_seconds)
    }

    pub fn seconds_per_iteration(&self) -> f64 {
        if self.iterations == 0 {
            return 0.0;
        }
        self.elapsed_seconds / self.iterations as f64
    }
}

/// Times caller-supplied work with a fixed [`Clock`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Harness {
    clock: Clock,
}

impl Harness {
    pub fn new(clock: Clock) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Invoke `work` exactly once inside the timed region.
    ///
    /// `iterations` is recorded as-is; batching several operations into one
    /// trial is up to `work`.
    pub fn run<T>(
        &self,
        label: impl Into<String>,
        iterations: u64,
        work: impl FnOnce() -> T,
    ) -> (BenchmarkResult, T) {
        match self.try_run(label, iterations, || Ok::<T, Infallible>(work())) {
            Ok(out) => out,
            Err(never) => match never {},
        }
    }

    /// Like [`Harness::run`], but a failing trial hands its error straight
    /// back and produces no result.
    pub fn try_run<T, E>(
        &self,
        label: impl Into<String>,
        iterations: u64,
        work: impl FnOnce() -> Result<T, E>,
    ) -> Result<(BenchmarkResult, T), E> {
        let label = label.into();
        let timer = Timer::start(self.clock);
        let output = work()?;
        let elapsed = timer.elapsed();
        tracing::debug!(
            label = %label,
            clock = self.clock.as_str(),
            elapsed_ms = elapsed.as_secs_f64() * 1e3,
            "trial finished"
        );
        Ok((BenchmarkResult::new(label, elapsed, iterations), output))
    }
}

/// Time `work` on the monotonic clock.
pub fn run<T>(
    label: impl Into<String>,
    iterations: u64,
    work: impl FnOnce() -> T,
) -> (BenchmarkResult, T) {
    Harness::default().run(label, iterations, work)
}
