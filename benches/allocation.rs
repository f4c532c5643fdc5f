//! 分配效能基準

use batch_plan::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal::Decimal;

fn family(size: usize) -> Vec<CandidateVariant> {
    (0..size)
        .map(|idx| {
            let candidate = CandidateVariant::new(
                format!("VAR-{idx}"),
                Decimal::from((idx % 7) * 40),
                Decimal::from(1 + idx % 13),
            );
            if idx % 10 == 0 {
                candidate.with_fixed_quantity(Decimal::from(25))
            } else {
                candidate
            }
        })
        .collect()
}

fn bench_allocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("proportional_allocation");
    let rounding = PackagingRounding::new(Some(Decimal::from(5)), RoundingMode::Down);

    for size in [10usize, 100, 500] {
        let candidates = family(size);
        let capacity = Decimal::from(size * 150);

        group.bench_with_input(BenchmarkId::from_parameter(size), &candidates, |b, candidates| {
            b.iter(|| {
                ProportionalAllocator::allocate(
                    black_box("SEMI"),
                    black_box(capacity),
                    black_box(candidates),
                    &rounding,
                )
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_allocate);
criterion_main!(benches);
