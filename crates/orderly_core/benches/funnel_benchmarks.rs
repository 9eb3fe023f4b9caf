//! Criterion benchmarks for the orderly_core funnel calculator
//!
//! Run with: cargo bench -p orderly_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use orderly_core::funnel::{BaseField, DerivedField, FunnelInputs, SweepAxis, evaluate, solve, sweep};

fn reference_inputs() -> FunnelInputs {
    FunnelInputs {
        leads: 1_000.0,
        ad_spend: 20_000.0,
        confirmation_rate: 60.0,
        delivery_rate: 50.0,
        selling_price: 250.0,
        product_cost: 100.0,
        shipping_fee: 40.0,
    }
}

fn bench_evaluate(c: &mut Criterion) {
    let inputs = reference_inputs();

    c.bench_function("evaluate_reference", |b| {
        b.iter(|| evaluate(black_box(&inputs)))
    });
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");
    let inputs = reference_inputs();
    let current = evaluate(&inputs);

    for field in DerivedField::ALL {
        let target = current.get(field) * 1.1;
        group.bench_with_input(BenchmarkId::new("field", field.key()), &target, |b, t| {
            b.iter(|| solve(black_box(&inputs), field, black_box(*t)))
        });
    }

    group.finish();
}

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep");
    let inputs = reference_inputs();

    for points in [10, 50, 200].iter() {
        let x = SweepAxis::new(BaseField::SellingPrice, 150.0, 400.0, *points);
        let y = SweepAxis::new(BaseField::ConfirmationRate, 30.0, 90.0, *points);

        group.bench_with_input(BenchmarkId::new("roi_grid", points), points, |b, _| {
            b.iter(|| sweep(black_box(&inputs), x, Some(y), DerivedField::Roi))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_solve, bench_sweep);
criterion_main!(benches);
