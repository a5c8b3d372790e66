//! Raw memory operations on one large buffer: reserve, fill, copy, move.
//!
//! Phases run strictly in order and each one owns its scratch buffer, which is
//! dropped before the next phase starts. The source buffer lives for the whole
//! run.

use std::hint::black_box;

use crate::error::{BenchError, Result};
use crate::harness::{BenchmarkResult, Harness};

/// 1 GiB.
pub const DEFAULT_SIZE_BYTES: u64 = 1_073_741_824;

/// Byte written by the fill phase and used to pre-fill copy destinations.
pub const FILL_BYTE: u8 = 0x0F;

#[derive(Clone, Debug)]
pub struct MemoryConfig {
    pub size_bytes: u64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size_bytes: DEFAULT_SIZE_BYTES,
        }
    }
}

impl MemoryConfig {
    pub fn validate(&self) -> Result<usize> {
        if self.size_bytes == 0 {
            return Err(BenchError::InvalidConfig("buffer size must be at least 1 byte".into()));
        }
        usize::try_from(self.size_bytes).map_err(|_| BenchError::Alloc {
            bytes: self.size_bytes,
            context: "address space",
        })
    }
}

/// Reserve `len` bytes without touching them, reporting failure instead of
/// aborting.
pub fn try_alloc(len: usize, context: &'static str) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|_| BenchError::Alloc {
        bytes: len as u64,
        context,
    })?;
    Ok(buf)
}

/// A reserved buffer filled with [`FILL_BYTE`].
pub fn try_alloc_filled(len: usize, context: &'static str) -> Result<Vec<u8>> {
    let mut buf = try_alloc(len, context)?;
    fill(&mut buf, len, FILL_BYTE);
    Ok(buf)
}

pub fn fill(buf: &mut Vec<u8>, len: usize, byte: u8) {
    buf.clear();
    buf.resize(len, byte);
}

pub fn copy(dst: &mut [u8], src: &[u8]) {
    dst.copy_from_slice(src);
}

/// Overlap-tolerant copy of `src` into `dst`.
pub fn move_bytes(dst: &mut [u8], src: &[u8]) {
    let len = dst.len().min(src.len());
    // SAFETY: both pointers are valid for `len` bytes; `ptr::copy` allows the
    // regions to overlap.
    unsafe { std::ptr::copy(src.as_ptr(), dst.as_mut_ptr(), len) };
}

/// Run the four phases and return one result per phase, in order.
pub fn run(cfg: &MemoryConfig, harness: &Harness) -> Result<Vec<BenchmarkResult>> {
    let len = cfg.validate()?;
    let bytes = cfg.size_bytes;
    let mut out = Vec::with_capacity(4);

    let (malloc, mut source) = harness.try_run("malloc", 1, || try_alloc(len, "source buffer"))?;
    out.push(malloc.with_bytes_processed(bytes));

    let (memset, ()) = harness.run("memset", 1, || {
        fill(&mut source, len, FILL_BYTE);
        black_box(source.as_ptr());
    });
    out.push(memset.with_bytes_processed(bytes));

    {
        let mut dest = try_alloc_filled(len, "memcpy destination")?;
        let (memcpy, ()) = harness.run("memcpy", 1, || {
            copy(&mut dest, &source);
            black_box(dest.as_ptr());
        });
        out.push(memcpy.with_bytes_processed(bytes));
    }

    {
        // Source and destination are disjoint, as in the memcpy phase.
        let mut dest = try_alloc_filled(len, "memmove destination")?;
        let (memmove, ()) = harness.run("memmove", 1, || {
            move_bytes(&mut dest, &source);
            black_box(dest.as_ptr());
        });
        out.push(memmove.with_bytes_processed(bytes));
    }

    for r in &out {
        tracing::debug!(phase = r.label(), elapsed_ms = r.elapsed_ms(), "memory phase");
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phases_in_order() {
        let cfg = MemoryConfig { size_bytes: 1 << 20 };
        let results = run(&cfg, &Harness::default()).unwrap();
        let labels: Vec<_> = results.iter().map(|r| r.label()).collect();
        assert_eq!(labels, ["malloc", "memset", "memcpy", "memmove"]);
        for r in &results {
            assert_eq!(r.bytes_processed(), Some(1 << 20));
            assert_eq!(r.iterations(), 1);
            assert!(r.elapsed_seconds() >= 0.0);
        }
    }

    #[test]
    fn test_zero_size_rejected() {
        let cfg = MemoryConfig { size_bytes: 0 };
        assert!(matches!(
            run(&cfg, &Harness::default()),
            Err(BenchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_impossible_allocation_is_an_error() {
        let err = try_alloc(usize::MAX, "test").unwrap_err();
        assert!(matches!(err, BenchError::Alloc { context: "test", .. }));
    }

    #[test]
    fn test_copy_and_move_match_source() {
        let src: Vec<u8> = (0..4096u32).map(|i| (i % 251) as u8).collect();

        let mut dst = try_alloc_filled(src.len(), "test").unwrap();
        assert!(dst.iter().all(|&b| b == FILL_BYTE));
        copy(&mut dst, &src);
        assert_eq!(dst, src);

        let mut dst = try_alloc_filled(src.len(), "test").unwrap();
        move_bytes(&mut dst, &src);
        assert_eq!(dst, src);
    }

    #[test]
    fn test_fill_writes_every_byte() {
        let mut buf = try_alloc(333, "test").unwrap();
        fill(&mut buf, 333, 0xAB);
        assert_eq!(buf.len(), 333);
        assert!(buf.iter().all(|&b| b == 0xAB));
    }
}
