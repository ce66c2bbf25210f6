//! Benchmarks for scour
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn benchmark_batch_sizing(c: &mut Criterion) {
    use scour::batch::batch_size;

    c.bench_function("batch_size_sweep", |b| {
        b.iter(|| {
            for n in [100usize, 5_000, 100_000, 2_000_000] {
                for workers in [1usize, 8, 64] {
                    black_box(batch_size(black_box(n), black_box(workers)));
                }
            }
        })
    });
}

fn benchmark_partition(c: &mut Criterion) {
    use scour::batch::{partition, DeletionTarget};

    c.bench_function("partition_5000", |b| {
        let targets: Vec<_> = (0..5_000)
            .map(|i| DeletionTarget::file(format!("/data/render-{i}.png")))
            .collect();

        b.iter(|| {
            let batches = partition(black_box(targets.clone()), 333);
            black_box(batches);
        })
    });
}

criterion_group!(benches, benchmark_batch_sizing, benchmark_partition);
criterion_main!(benches);
