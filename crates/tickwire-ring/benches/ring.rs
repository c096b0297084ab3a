//! Benchmarks for the SPSC ring.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tickwire_ring::SpscRing;

fn bench_ring(c: &mut Criterion) {
    let mut group = c.benchmark_group("spsc_ring");

    group.bench_function("enqueue_dequeue", |b| {
        let ring: SpscRing<u64, 65536> = SpscRing::new();
        b.iter(|| {
            ring.try_enqueue(black_box(42)).unwrap();
            black_box(ring.try_dequeue())
        });
    });

    group.bench_function("burst_1024", |b| {
        let ring: SpscRing<u64, 65536> = SpscRing::new();
        b.iter(|| {
            for i in 0..1024u64 {
                ring.try_enqueue(black_box(i)).unwrap();
            }
            while ring.try_dequeue().is_some() {}
        });
    });

    group.finish();
}

criterion_group!(benches, bench_ring);
criterion_main!(benches);
