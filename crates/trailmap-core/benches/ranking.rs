use criterion::{black_box, criterion_group, criterion_main, Criterion};

use trailmap_core::progress::compute_progress;
use trailmap_core::ranking::{percentile, rank, ScoreEntry};

fn make_entries(n: usize) -> Vec<ScoreEntry> {
    (0..n)
        .map(|i| {
            // Coarse scores so the board has plenty of ties.
            let score = ((i * 7919) % 101) as f64;
            ScoreEntry::new(format!("u{i}"), format!("learner {i}"), score)
        })
        .collect()
}

fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");

    for n in [10usize, 1_000, 10_000] {
        let entries = make_entries(n);
        group.bench_function(format!("n={n}"), |b| {
            b.iter(|| rank(black_box(entries.clone())))
        });
    }

    group.finish();
}

fn bench_percentages(c: &mut Criterion) {
    let mut group = c.benchmark_group("percentages");

    group.bench_function("compute_progress", |b| {
        b.iter(|| compute_progress(black_box(37), black_box(12)))
    });

    group.bench_function("percentile", |b| {
        b.iter(|| percentile(black_box(12), black_box(37)))
    });

    group.finish();
}

criterion_group!(benches, bench_rank, bench_percentages);
criterion_main!(benches);
