use chronogeo::bbox::BBox4D;
use chronogeo::octree::Octree;
use chronogeo::Timestamp;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn grid_bbox(i: i64) -> BBox4D {
    let x = (i % 1000) as f64;
    let y = (i / 1000) as f64;
    BBox4D::from_point_time(x, y, None, Timestamp::from_micros(i), false)
}

fn benchmark_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("octree_insert");

    for &size in &[1_000i64, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::new("insert", size), &size, |b, &size| {
            b.iter(|| {
                let mut tree: Octree<i64> = Octree::new();
                for i in 0..size {
                    tree.insert(black_box(&grid_bbox(i)), i);
                }
                tree
            })
        });
    }

    group.finish();
}

fn benchmark_range_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("octree_range_query");

    for &size in &[1_000i64, 10_000, 100_000] {
        let mut tree: Octree<i64> = Octree::new();
        for i in 0..size {
            tree.insert(&grid_bbox(i), i);
        }

        let mut query = grid_bbox(0);
        query.union(&grid_bbox(size / 10));

        group.bench_with_input(BenchmarkId::new("range_query", size), &size, |b, _| {
            b.iter(|| tree.range_query(black_box(&query)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_insert, benchmark_range_query);
criterion_main!(benches);
