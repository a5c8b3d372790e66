//! Criterion suite over the workload kernels at small sizes.
//!
//! Useful for spotting regressions in the harness plumbing itself; the
//! binaries remain the reference numbers.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use microbench::benches::{containers, memory, raster};
use microbench::{format_bytes, Harness};
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bench_memory_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("memory");

    for size in [4 * 1024usize, 64 * 1024, 1024 * 1024] {
        let src = memory::try_alloc_filled(size, "bench source").unwrap();
        let mut dst = memory::try_alloc_filled(size, "bench destination").unwrap();
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("memset", size), &size, |b, &sz| {
            let mut buf = Vec::with_capacity(sz);
            b.iter(|| {
                memory::fill(&mut buf, sz, memory::FILL_BYTE);
                black_box(buf.as_ptr());
            })
        });
        group.bench_with_input(BenchmarkId::new("memcpy", size), &size, |b, _| {
            b.iter(|| memory::copy(black_box(&mut dst), black_box(&src)))
        });
        group.bench_with_input(BenchmarkId::new("memmove", size), &size, |b, _| {
            b.iter(|| memory::move_bytes(black_box(&mut dst), black_box(&src)))
        });
    }

    group.finish();
}

fn bench_container_phases(c: &mut Criterion) {
    let mut group = c.benchmark_group("containers");
    group.sample_size(20);
    let harness = Harness::default();

    for n in [1_000u32, 10_000] {
        group.bench_with_input(BenchmarkId::new("array", n), &n, |b, &n| {
            b.iter(|| black_box(containers::array_phases(&harness, n)))
        });
        group.bench_with_input(BenchmarkId::new("list", n), &n, |b, &n| {
            b.iter(|| black_box(containers::list_phases(&harness, n)))
        });
        group.bench_with_input(BenchmarkId::new("hash", n), &n, |b, &n| {
            b.iter(|| black_box(containers::hash_phases(&harness, n)))
        });
        group.bench_with_input(BenchmarkId::new("tree", n), &n, |b, &n| {
            b.iter(|| black_box(containers::tree_phases(&harness, n)))
        });
    }

    group.finish();
}

fn bench_raster_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("raster");
    group.sample_size(20);

    let cfg = raster::RasterConfig {
        width: 320,
        height: 240,
        ..Default::default()
    };
    let mut pixmap = cfg.surface().unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(cfg.seed);
    group.bench_function("frame_320x240", |b| {
        b.iter(|| {
            raster::draw_frame(&mut pixmap, &mut rng);
            black_box(pixmap.data());
        })
    });

    group.finish();
}

fn bench_format_bytes(c: &mut Criterion) {
    c.bench_function("format_bytes", |b| {
        b.iter(|| {
            for bytes in [0u64, 1023, 1 << 20, 3 << 30, u64::MAX] {
                black_box(format_bytes(black_box(bytes)));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_memory_kernels,
    bench_container_phases,
    bench_raster_frame,
    bench_format_bytes
);
criterion_main!(benches);
