//! Benchmarks for the leg solver.

use criterion::{Criterion, criterion_group, criterion_main};
use legion_geometry::{GeometryConfig, LegId, Site};
use legion_kinematics::{JointAngles, Kinematics};
use std::hint::black_box;

fn bench_to_joint_angles(c: &mut Criterion) {
    let ik = Kinematics::new(GeometryConfig::default());
    let site = Site::new(62.0, 40.0, -50.0);

    c.bench_function("to_joint_angles", |b| {
        b.iter(|| black_box(ik.to_joint_angles(black_box(site), LegId::FrontLeft)));
    });
}

fn bench_solve_all_legs(c: &mut Criterion) {
    let ik = Kinematics::new(GeometryConfig::default());
    let sites = [
        Site::new(62.0, 0.0, -50.0),
        Site::new(62.0, 40.0, -50.0),
        Site::new(62.0, 80.0, -30.0),
        Site::new(200.0, 0.0, 0.0),
    ];

    c.bench_function("solve_all_legs", |b| {
        b.iter(|| {
            for (leg, site) in LegId::ALL.into_iter().zip(sites) {
                let _ = black_box(ik.solve(black_box(site), leg));
            }
        });
    });
}

fn bench_to_site(c: &mut Criterion) {
    let ik = Kinematics::new(GeometryConfig::default());
    let angles = JointAngles::new(122.8, 60.0, 59.0);

    c.bench_function("to_site", |b| {
        b.iter(|| black_box(ik.to_site(black_box(angles), LegId::FrontRight)));
    });
}

criterion_group!(benches, bench_to_joint_angles, bench_solve_all_legs, bench_to_site);
criterion_main!(benches);
