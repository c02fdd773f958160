//! Simulator throughput on the chart objectives.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gradviz_core::{
    objectives::{AxisQuadratic, Rosenbrock},
    sampling::SurfaceGrid,
    simulator::GradientDescent,
    types::{point, Point},
};

fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("run");
    for iterations in [25usize, 250, 1500] {
        let descent = GradientDescent::new(0.0012, iterations).unwrap();
        group.bench_with_input(
            BenchmarkId::new("closure", iterations),
            &descent,
            |b, descent| {
                b.iter(|| {
                    descent.run(
                        |x: &Point| point(&[x[0], 5.0 * x[1]]),
                        black_box(point(&[-3.5, 1.8])),
                    )
                });
            },
        );
    }
    group.finish();
}

fn bench_simulate(c: &mut Criterion) {
    let rosenbrock = Rosenbrock::default();
    let descent = GradientDescent::new(0.0012, 1500).unwrap();
    c.bench_function("simulate/rosenbrock_1500", |b| {
        b.iter(|| descent.simulate(&rosenbrock, black_box(point(&[-1.5, 2.5]))));
    });
}

fn bench_surface_grid(c: &mut Criterion) {
    let bowl = AxisQuadratic::shifted();
    c.bench_function("surface_grid/200x200", |b| {
        b.iter(|| SurfaceGrid::sample(&bowl, -3.0..=7.0, -1.0..=5.0, black_box(200), 200));
    });
}

criterion_group!(benches, bench_run, bench_simulate, bench_surface_grid);
criterion_main!(benches);
