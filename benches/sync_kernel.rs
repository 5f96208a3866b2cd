use chronogeo::sync::lift_distance;
use chronogeo::{GeomPoint, Instant, Interpolation, Sequence, Timestamp};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn sine_trajectory(n: usize, amplitude: f64, srid: i32) -> Sequence<GeomPoint> {
    let instants = (0..n)
        .map(|i| {
            let t = (i as f64) * 1_000_000.0;
            let x = i as f64;
            let y = amplitude * (i as f64 * 0.1).sin();
            Instant::new(GeomPoint::new_2d(x, y, srid), Timestamp::from_micros(t as i64))
        })
        .collect();
    Sequence::new(instants, true, true, Interpolation::Linear).unwrap()
}

fn benchmark_lift_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("sync_kernel");

    for &size in &[10usize, 100, 1_000] {
        let a = sine_trajectory(size, 5.0, 4326);
        let b = sine_trajectory(size, -5.0, 4326);

        group.bench_with_input(BenchmarkId::new("lift_distance", size), &size, |bench, _| {
            bench.iter(|| lift_distance(black_box(&a), black_box(&b)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_lift_distance);
criterion_main!(benches);
