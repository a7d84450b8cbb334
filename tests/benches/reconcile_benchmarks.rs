//! # Reconciliation Benchmarks
//!
//! Pass cost against the headless backend:
//! - Steady state: unchanged roster, every marker untouched
//! - Churn: every unit moves each pass
//! - Turnover: half the fleet leaves and is replaced each pass
//! - Overlay refresh: density recomputed for a large roster

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fleet_types::Unit;
use fm_map_sync::MapSyncApi;
use fm_tests::fixtures::{fleet, ready_service};

const FLEET_SIZES: [usize; 3] = [100, 1_000, 5_000];

fn shifted(roster: &[Unit], step: usize) -> Vec<Unit> {
    let delta = (step % 10) as f64 * 0.0001;
    roster
        .iter()
        .map(|u| {
            let mut unit = u.clone();
            if let Some(c) = unit.coordinates.as_mut() {
                c.lon += delta;
            }
            unit
        })
        .collect()
}

fn bench_steady_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile_steady_state");
    for size in FLEET_SIZES {
        let roster = fleet(size);
        let (mut service, _scene) = ready_service();
        service.reconcile(&roster);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &roster, |b, roster| {
            b.iter(|| black_box(service.reconcile(black_box(roster))))
        });
    }
    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile_churn");
    for size in FLEET_SIZES {
        let base = fleet(size);
        let frames: Vec<_> = (0..10).map(|step| shifted(&base, step + 1)).collect();
        let (mut service, _scene) = ready_service();
        service.reconcile(&base);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut frame = 0;
            b.iter(|| {
                frame = (frame + 1) % frames.len();
                black_box(service.reconcile(&frames[frame]))
            })
        });
    }
    group.finish();
}

fn bench_turnover(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile_turnover");
    for size in FLEET_SIZES {
        let all = fleet(size * 2);
        let frames = [all[..size].to_vec(), all[size / 2..size + size / 2].to_vec()];
        let (mut service, _scene) = ready_service();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut frame = 0;
            b.iter(|| {
                frame ^= 1;
                black_box(service.reconcile(&frames[frame]))
            })
        });
    }
    group.finish();
}

fn bench_overlay_refresh(c: &mut Criterion) {
    let roster = fleet(10_000);
    let (mut service, _scene) = ready_service();
    service.reconcile(&roster);

    c.bench_function("overlay_refresh_10000", |b| {
        b.iter(|| black_box(service.reconcile(black_box(&roster))))
    });
}

criterion_group!(
    name = reconcile_benches;
    config = Criterion::default()
        .sample_size(50)
        .measurement_time(std::time::Duration::from_secs(5));
    targets =
        bench_steady_state,
        bench_churn,
        bench_turnover,
        bench_overlay_refresh,
);

criterion_main!(reconcile_benches);
