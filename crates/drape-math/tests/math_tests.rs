//! Integration tests for drape-math.

use std::sync::atomic::{AtomicU32, Ordering};

use drape_math::fixed_point::{self, FixedVec3Accumulator, FIXED_POINT_SCALE};
use drape_math::ordered;
use drape_math::transform::{average_axis_scale, world_length_to_local, world_vector_to_local};
use drape_math::{Aabb, AtomicAabb, Mat4, Quat, RigidTransform, Vec3};

// ─── Fixed-point Tests ────────────────────────────────────────

#[test]
fn fixed_point_precision() {
    for &v in &[0.0_f32, 1.0, -1.0, 0.123_456, -3.75e-4, 250.5] {
        let back = fixed_point::decode(fixed_point::encode(v));
        assert!((back - v).abs() <= 1.0 / FIXED_POINT_SCALE, "{v} -> {back}");
    }
}

#[test]
fn accumulator_averages_contributions() {
    let acc = FixedVec3Accumulator::new();
    acc.add(Vec3::new(1.0, 0.0, -2.0));
    acc.add(Vec3::new(3.0, 0.5, 0.0));
    assert_eq!(acc.count(), 2);

    let avg = acc.take_average().unwrap();
    assert!((avg - Vec3::new(2.0, 0.25, -1.0)).length() < 1e-6);

    // take_average resets
    assert_eq!(acc.count(), 0);
    assert!(acc.take_average().is_none());
}

#[test]
fn accumulator_is_order_independent_across_threads() {
    let acc = FixedVec3Accumulator::new();
    std::thread::scope(|scope| {
        for t in 0..8 {
            let acc = &acc;
            scope.spawn(move || {
                for i in 0..1000 {
                    // Powers of two sit exactly on the 2^-24 grid.
                    let d = if (i + t) % 2 == 0 { 1.0 / 1024.0 } else { -1.0 / 2048.0 };
                    acc.add(Vec3::new(d, 0.0, -d));
                }
            });
        }
    });
    assert_eq!(acc.count(), 8000);
    // 4000 / 1024 − 4000 / 2048 = 1.953125, with no rounding at all.
    assert_eq!(acc.sum(), Vec3::new(1.953_125, 0.0, -1.953_125));
}

#[test]
fn accumulator_rounding_error_is_bounded() {
    let acc = FixedVec3Accumulator::new();
    let n = 8000;
    for i in 0..n {
        let s = if i % 2 == 0 { 1.0 } else { -0.5 };
        acc.add(Vec3::new(s * 1e-3, 0.0, 0.0));
    }
    // Each contribution rounds by at most half a grid step.
    let bound = n as f32 * 0.5 / FIXED_POINT_SCALE;
    assert!((acc.sum().x - 2.0).abs() <= bound, "{}", acc.sum().x);
}

// ─── Ordered Encoding Tests ───────────────────────────────────

#[test]
fn ordered_encoding_preserves_order() {
    let values = [
        f32::NEG_INFINITY,
        -1.0e9,
        -2.5,
        -1.0e-30,
        -0.0,
        0.0,
        1.0e-30,
        0.75,
        3.0e8,
        f32::INFINITY,
    ];
    for pair in values.windows(2) {
        assert!(
            ordered::encode(pair[0]) <= ordered::encode(pair[1]),
            "{} vs {}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn ordered_encoding_round_trips() {
    for &v in &[-7.25_f32, -0.0, 0.0, 1.5, f32::MAX, f32::MIN] {
        assert_eq!(ordered::decode(ordered::encode(v)).to_bits(), v.to_bits());
    }
}

#[test]
fn atomic_min_emulates_float_min() {
    let cell = AtomicU32::new(ordered::encode(f32::INFINITY));
    for v in [3.0_f32, -1.5, 2.0, -0.25] {
        cell.fetch_min(ordered::encode(v), Ordering::Relaxed);
    }
    assert_eq!(ordered::decode(cell.load(Ordering::Relaxed)), -1.5);
}

#[test]
fn atomic_aabb_matches_sequential_fold() {
    let points: Vec<Vec3> = (0..500)
        .map(|i| {
            let f = i as f32;
            Vec3::new((f * 0.37).sin() * 3.0, f * 0.01 - 2.0, (f * 1.3).cos())
        })
        .collect();

    let aabb = AtomicAabb::new();
    std::thread::scope(|scope| {
        for chunk in points.chunks(64) {
            let aabb = &aabb;
            scope.spawn(move || chunk.iter().for_each(|&p| aabb.include(p)));
        }
    });

    assert_eq!(aabb.load(), Aabb::from_points(&points));

    aabb.reset();
    assert!(aabb.load().is_empty());
}

// ─── Aabb Tests ───────────────────────────────────────────────

#[test]
fn guarded_extent_floors_flat_axes() {
    let flat = Aabb::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(2.0, 1.0, 3.0));
    let e = flat.guarded_extent(1e-6);
    assert_eq!(e.x, 2.0);
    assert_eq!(e.y, 1e-6);
    assert!(flat.contains(Vec3::new(1.0, 1.0, 1.0)));
}

// ─── Transform Tests ──────────────────────────────────────────

#[test]
fn average_scale_of_non_uniform_matrix() {
    let m = Mat4::from_scale_rotation_translation(
        Vec3::new(1.0, 2.0, 3.0),
        Quat::from_rotation_y(0.7),
        Vec3::new(5.0, 0.0, 0.0),
    );
    assert!((average_axis_scale(&m) - 2.0).abs() < 1e-5);
    assert!((world_length_to_local(0.02, &m) - 0.01).abs() < 1e-7);
}

#[test]
fn gravity_is_rotated_and_scaled_into_local_space() {
    let m = Mat4::from_scale_rotation_translation(
        Vec3::splat(2.0),
        Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
        Vec3::ZERO,
    );
    let g = world_vector_to_local(Vec3::new(0.0, -9.81, 0.0), &m);
    // Rotating -Y by -90° about Z gives -X; scale halves the magnitude.
    assert!((g - Vec3::new(-4.905, 0.0, 0.0)).length() < 1e-4);
}

#[test]
fn rigid_transform_has_no_scale() {
    let t = RigidTransform::new(Vec3::new(1.0, 2.0, 3.0), Quat::from_rotation_x(1.0));
    let m = t.to_matrix();
    assert!((average_axis_scale(&m) - 1.0).abs() < 1e-6);
    assert!((m.transform_point3(Vec3::ZERO) - t.translation).length() < 1e-6);
}
