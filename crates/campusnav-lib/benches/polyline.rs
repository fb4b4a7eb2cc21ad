use criterion::{criterion_group, criterion_main, Criterion};
use campusnav_lib::shuttle::SHUTTLE_STREET_PATH;
use campusnav_lib::{decode_polyline, encode_polyline, great_circle_distance_meters, Point};
use once_cell::sync::Lazy;
use std::hint::black_box;

static SHUTTLE_POLYLINE: Lazy<String> = Lazy::new(|| encode_polyline(&SHUTTLE_STREET_PATH));
static LONG_POLYLINE: Lazy<String> = Lazy::new(|| {
    let points: Vec<Point> = (0..5_000)
        .map(|i| {
            let t = i as f64 / 5_000.0;
            Point::new(45.45 + t * 0.05, -73.64 + (t * 40.0).sin() * 0.01)
        })
        .collect();
    encode_polyline(&points)
});

fn benchmark_polyline(c: &mut Criterion) {
    c.bench_function("decode_shuttle_path", |b| {
        let encoded = SHUTTLE_POLYLINE.as_str();
        b.iter(|| {
            let points = decode_polyline(black_box(encoded)).expect("valid polyline");
            black_box(points.len())
        });
    });

    c.bench_function("decode_5000_points", |b| {
        let encoded = LONG_POLYLINE.as_str();
        b.iter(|| {
            let points = decode_polyline(black_box(encoded)).expect("valid polyline");
            black_box(points.len())
        });
    });

    c.bench_function("encode_shuttle_path", |b| {
        b.iter(|| black_box(encode_polyline(black_box(&SHUTTLE_STREET_PATH))));
    });

    c.bench_function("shuttle_path_length", |b| {
        b.iter(|| {
            let meters: f64 = SHUTTLE_STREET_PATH
                .windows(2)
                .map(|pair| great_circle_distance_meters(pair[0], pair[1]))
                .sum();
            black_box(meters)
        });
    });
}

criterion_group!(benches, benchmark_polyline);
criterion_main!(benches);
