//! Benchmark for field-hash throughput.
//!
//! Hashing dominates scan cost, so this number bounds exploration speed.
//!
//! Run with: cargo bench --package umbra_core --bench hash_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use umbra_core::MimcHasher;

fn benchmark_single_hash(c: &mut Criterion) {
    let hasher = MimcHasher::new(1);

    c.bench_function("single_coordinate_hash", |b| {
        let mut x = 0i64;
        b.iter(|| {
            x += 1;
            black_box(hasher.hash(black_box(&[x, -x])))
        });
    });
}

fn benchmark_hash_row(c: &mut Criterion) {
    let hasher = MimcHasher::new(1);

    let mut group = c.benchmark_group("hash_row");
    group.throughput(Throughput::Elements(256));
    group.sample_size(20);

    group.bench_function("256_coordinate_hashes", |b| {
        b.iter(|| {
            for x in 0i64..256 {
                black_box(hasher.hash(&[x, 7]));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_single_hash, benchmark_hash_row);
criterion_main!(benches);
