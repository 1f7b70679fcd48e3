use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use heated_plate::relaxation::{relax_pass, relax_pass_parallel};
use heated_plate::{BoundaryConditions, TemperatureGrid};

fn bench_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("relax_pass");
    for size in [64usize, 256, 1000] {
        let grid = TemperatureGrid::initialized(size, size, &BoundaryConditions::default())
            .expect("valid grid");
        let previous = grid.values().clone();

        group.bench_with_input(BenchmarkId::new("sequential", size), &size, |b, _| {
            let mut next = previous.clone();
            b.iter(|| relax_pass(black_box(&previous), &mut next).expect("same shape"));
        });
        group.bench_with_input(BenchmarkId::new("parallel", size), &size, |b, _| {
            let mut next = previous.clone();
            b.iter(|| relax_pass_parallel(black_box(&previous), &mut next).expect("same shape"));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pass);
criterion_main!(benches);
