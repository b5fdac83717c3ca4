//! Integration tests for drape-debug.

use drape_contact::{BoundsReduction, VoxelGrid};
use drape_debug::snapshot::StateSnapshot;
use drape_debug::voxels::{active_voxel_wireframes, voxel_wireframe, wireframes_to_json};
use drape_garment::GarmentState;
use drape_math::{Aabb, Vec3};
use drape_mesh::generators::quad_grid;

// ─── Snapshot Tests ───────────────────────────────────────────

#[test]
fn snapshot_round_trip() {
    let mut state = GarmentState::from_mesh(&quad_grid(2, 2, 1.0, 1.0));
    state.velocities[4] = Vec3::new(0.1, -0.2, 0.3);

    let snap = StateSnapshot::capture(42, 0.7, &state);
    let bytes = snap.to_bytes().unwrap();
    let recovered = StateSnapshot::from_bytes(&bytes).unwrap();

    assert_eq!(recovered, snap);
    assert_eq!(recovered.tick, 42);
    assert_eq!(recovered.vertex_count(), 9);
    assert_eq!(recovered.velocities[4], Vec3::new(0.1, -0.2, 0.3));
}

#[test]
fn snapshot_rejects_garbage() {
    assert!(StateSnapshot::from_bytes(&[1, 2, 3]).is_err());
}

#[test]
fn snapshot_file_round_trip() {
    let state = GarmentState::from_mesh(&quad_grid(1, 1, 1.0, 1.0));
    let snap = StateSnapshot::capture(3, 0.05, &state);
    let path = std::env::temp_dir().join(format!("drape_snapshot_{}.bin", std::process::id()));
    snap.save(&path).unwrap();
    let loaded = StateSnapshot::load(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(loaded, snap);
}

#[test]
fn snapshot_position_delta() {
    let state = GarmentState::from_mesh(&quad_grid(1, 1, 1.0, 1.0));
    let a = StateSnapshot::capture(0, 0.0, &state);
    let mut b = a.clone();
    b.positions[2].y -= 0.25;
    assert!((a.max_position_delta(&b).unwrap() - 0.25).abs() < 1e-6);

    b.positions.pop();
    assert!(a.max_position_delta(&b).is_none());
}

// ─── Voxel Wireframe Tests ────────────────────────────────────

#[test]
fn wireframe_has_twelve_axis_aligned_edges() {
    let bounds = Aabb::new(Vec3::ZERO, Vec3::splat(4.0));
    // Cell (1, 2, 3) of a 4³ grid: 1 + (2 + 3·4)·4.
    let segments = voxel_wireframe(57, 4, bounds);
    assert_eq!(segments.len(), 12);

    let lo = Vec3::new(1.0, 2.0, 3.0);
    let hi = lo + Vec3::ONE;
    for [a, b] in segments {
        assert!((a.distance(b) - 1.0).abs() < 1e-6);
        for p in [a, b] {
            assert!(p.cmpge(lo).all() && p.cmple(hi).all());
        }
    }
}

#[test]
fn active_wireframes_cover_occupied_cells() {
    let points = vec![Vec3::ZERO, Vec3::splat(0.01), Vec3::ONE];
    let bounds = BoundsReduction::new();
    bounds.reset();
    bounds.accumulate(&points);
    let mut grid = VoxelGrid::new(8, points.len());
    let mut ids = vec![0; points.len()];
    grid.analyze(bounds.bounds(), 1e-6, &points, &mut ids);

    let wireframes = active_voxel_wireframes(&grid);
    assert_eq!(wireframes.len(), 2);
    for w in &wireframes {
        assert_eq!(w.segments.len(), 12);
        assert_eq!(w.triangle_count, 0);
    }

    let json = wireframes_to_json(&wireframes).unwrap();
    assert!(json.contains("segments"));
}
