//! Performance benchmarks for track-kinematics-lib
//!
//! Run with: cargo bench --package track-kinematics-lib

use chrono::{NaiveDate, TimeDelta};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use track_kinematics_lib::{
    Config, DistanceCalculator, GeoPoint, Haversine, Projected, SphericalLawOfCosines, Track,
    TrackMetricsComputer,
};

/// Generate a realistic track with the specified number of points, one every 5 seconds.
fn generate_track(num_points: usize, base_lat: f64, base_lon: f64) -> Track {
    let start = NaiveDate::from_ymd_opt(2021, 6, 1)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .unwrap();

    (0..num_points)
        .map(|i| {
            let t = i as f64 / num_points as f64;
            let lat = base_lat + t * 0.1 + (t * 50.0).sin() * 0.001;
            let lon = base_lon + t * 0.1 + (t * 30.0).cos() * 0.001;
            let time = start + TimeDelta::seconds(5 * i as i64);
            GeoPoint::new(lat, lon, time).unwrap()
        })
        .collect()
}

// ============================================================================
// Distance methods
// ============================================================================

fn bench_distance_methods(c: &mut Criterion) {
    let mut group = c.benchmark_group("distance");
    let track = generate_track(2, 51.5, -0.1);
    let (a, b) = track.segments().next().unwrap();

    let methods: Vec<(&str, Box<dyn DistanceCalculator>)> = vec![
        ("projected", Box::new(Projected::web_mercator())),
        ("haversine", Box::new(Haversine::default())),
        ("law_of_cosines", Box::new(SphericalLawOfCosines::default())),
    ];
    for (name, method) in &methods {
        group.bench_function(*name, |bench| {
            bench.iter(|| method.distance(black_box(a), black_box(b)))
        });
    }

    group.finish();
}

// ============================================================================
// Full track computation
// ============================================================================

fn bench_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute");
    group.sample_size(20);

    for num_points in [1_000, 50_000] {
        let track = generate_track(num_points, 51.5, -0.1);
        group.throughput(Throughput::Elements(num_points as u64));

        let sequential = TrackMetricsComputer::new(Config {
            parallel_threshold: usize::MAX,
            ..Config::default()
        })
        .unwrap();
        group.bench_with_input(
            BenchmarkId::new("sequential", num_points),
            &track,
            |bench, track| bench.iter(|| sequential.compute(black_box(track)).unwrap()),
        );

        let parallel = TrackMetricsComputer::new(Config {
            parallel_threshold: 1,
            ..Config::default()
        })
        .unwrap();
        group.bench_with_input(
            BenchmarkId::new("parallel", num_points),
            &track,
            |bench, track| bench.iter(|| parallel.compute(black_box(track)).unwrap()),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_distance_methods, bench_compute);
criterion_main!(benches);
