//! Benchmarks the three line-diff engines against synthetic inputs of
//! varying size and edit density (see `DESIGN.md` for why this uses
//! generated corpora rather than real file checkouts).

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use diffcore::{diff, Algorithm, DiffOptions};

fn synthetic_corpus(lines: usize, churn_every: usize) -> (String, String) {
    let old: Vec<String> = (0..lines).map(|i| format!("line number {i} unchanged")).collect();
    let mut new = old.clone();
    for i in (0..lines).step_by(churn_every) {
        new[i] = format!("line number {i} modified");
    }
    (old.join("\n"), new.join("\n"))
}

fn bench_engines(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_engines");
    for &size in &[100usize, 1_000, 10_000] {
        let (old, new) = synthetic_corpus(size, 7);
        for algorithm in [Algorithm::Myers, Algorithm::Patience, Algorithm::Histogram] {
            let options = DiffOptions {
                algorithm,
                ..Default::default()
            };
            group.bench_with_input(BenchmarkId::new(format!("{algorithm:?}"), size), &size, |b, _| {
                b.iter(|| diff(&old, &new, options));
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_engines);
criterion_main!(benches);
