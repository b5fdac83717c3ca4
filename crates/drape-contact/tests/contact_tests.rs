//! Integration tests for drape-contact.

use std::collections::{BTreeSet, HashSet};

use drape_contact::{
    Body, BodyCollisionPass, BodyTriangle, BodyTriangleBinner, BoundsReduction, CollisionPipeline,
    VoxelGrid,
};
use drape_math::{Aabb, Mat4, Quat, RigidTransform, Vec3};
use drape_mesh::generators::{quad_grid, translated, uv_sphere};
use drape_mesh::{StaticSkin, TriangleMesh};
use drape_solver::{CollisionStage, LocalParameters, SolverState, NO_VOXEL};

/// Deterministic scattered points (no RNG dependency).
fn scattered_points(n: usize) -> Vec<Vec3> {
    (0..n)
        .map(|i| {
            let f = i as f32;
            Vec3::new(
                (f * 0.618).fract() * 2.0 - 1.0,
                (f * 0.414).fract() * 1.5 - 0.75,
                (f * 0.271).fract() * 0.5,
            )
        })
        .collect()
}

fn analyzed_grid(points: &[Vec3], resolution: u32) -> (VoxelGrid, Vec<u32>) {
    let bounds = BoundsReduction::new();
    bounds.reset();
    bounds.accumulate(points);

    let mut grid = VoxelGrid::new(resolution, points.len());
    let mut ids = vec![NO_VOXEL; points.len()];
    grid.analyze(bounds.bounds(), 1e-6, points, &mut ids);
    (grid, ids)
}

fn body_triangles(mesh: &TriangleMesh) -> Vec<BodyTriangle> {
    let mut body = Body::init(mesh).unwrap();
    body.update_triangles(&mesh.positions, &Mat4::IDENTITY).unwrap();
    body.triangles().to_vec()
}

/// Triangle ids whose `margin`-grown bounding box overlaps `cell`,
/// found by testing every triangle against the cell box.
fn overlapping_triangles(triangles: &[BodyTriangle], cell: Aabb, margin: f32) -> Vec<u32> {
    triangles
        .iter()
        .enumerate()
        .filter(|(_, t)| {
            let lo = t.min() - Vec3::splat(margin);
            let hi = t.max() + Vec3::splat(margin);
            lo.cmple(cell.max).all() && hi.cmpge(cell.min).all()
        })
        .map(|(i, _)| i as u32)
        .collect()
}

// ─── Bounds Tests ─────────────────────────────────────────────

#[test]
fn bounds_reduction_matches_sequential() {
    let points = scattered_points(1000);
    let bounds = BoundsReduction::new();
    bounds.reset();
    bounds.accumulate(&points);
    assert_eq!(bounds.bounds(), Aabb::from_points(&points));

    bounds.reset();
    assert!(bounds.bounds().is_empty());
}

// ─── Voxel Grid Tests ─────────────────────────────────────────

#[test]
fn active_voxels_equal_distinct_cells() {
    let points = scattered_points(2000);
    let (grid, ids) = analyzed_grid(&points, 16);

    let distinct: HashSet<u32> = points.iter().map(|&p| grid.flatten(grid.cell_of(p))).collect();
    assert_eq!(grid.active_count(), distinct.len());

    let active_ids: HashSet<u32> = grid.active().iter().map(|v| v.id()).collect();
    assert_eq!(active_ids, distinct);

    for (&p, &id) in points.iter().zip(&ids) {
        assert_eq!(id, grid.flatten(grid.cell_of(p)));
        let slot = grid.slot_of(id).unwrap();
        assert_eq!(grid.active()[slot].id(), id);
    }
}

#[test]
fn cell_of_clamps_to_grid() {
    let points = vec![Vec3::ZERO, Vec3::ONE];
    let (grid, ids) = analyzed_grid(&points, 8);
    assert_eq!(grid.cell_of(Vec3::splat(-5.0)), drape_math::UVec3::ZERO);
    assert_eq!(grid.cell_of(Vec3::ONE), drape_math::UVec3::splat(7));
    assert_eq!(ids[1], 7 + (7 + 7 * 8) * 8);
    assert_eq!(grid.unflatten(ids[1]), drape_math::UVec3::splat(7));
}

#[test]
fn flat_garment_uses_guarded_extent() {
    // All points share z: the z extent is floored at epsilon, no NaN cells.
    let points = quad_grid(4, 4, 1.0, 1.0).positions;
    let (grid, _) = analyzed_grid(&points, 4);
    assert!(grid.active_count() > 0);
    for v in grid.active() {
        assert_eq!(grid.unflatten(v.id()).z, 0);
    }
}

#[test]
fn reanalysis_clears_previous_cells() {
    let points = scattered_points(200);
    let (mut grid, mut ids) = analyzed_grid(&points, 8);
    let single = vec![Vec3::ZERO; 200];
    let bounds = Aabb::from_points(&single);
    assert_eq!(grid.analyze(bounds, 1e-6, &single, &mut ids), 1);
}

// ─── Binner Tests ─────────────────────────────────────────────

#[test]
fn binning_partition_matches_brute_force() {
    let garment = uv_sphere(1.2, 12, 24).positions;
    let (mut grid, _) = analyzed_grid(&garment, 12);

    let mut body = uv_sphere(1.0, 10, 20);
    // One huge triangle whose voxel box exceeds the active list.
    let base = body.positions.len() as u32;
    body.positions.extend([
        Vec3::new(-3.0, -3.0, 0.0),
        Vec3::new(3.0, -3.0, 0.0),
        Vec3::new(0.0, 3.0, 0.0),
    ]);
    body.normals.extend([Vec3::Z; 3]);
    body.tangents.extend([Vec3::X; 3]);
    body.indices.extend([base, base + 1, base + 2]);

    let margin = 0.02;
    let mut triangles = body_triangles(&body);
    BodyTriangleBinner::refresh_voxel_bounds(&mut triangles, &grid, margin);
    let mut binner = BodyTriangleBinner::new();
    let report = binner.bin(&triangles, &mut grid);

    assert!(report.triangle_refs > 0);
    assert!(binner.buffer().capacity() >= report.triangle_refs);
    assert!(binner.buffer().capacity().is_power_of_two());

    let mut covered = 0;
    let mut brute_total = 0;
    for voxel in grid.active() {
        let cell = grid.cell_bounds(grid.unflatten(voxel.id()));
        let expected = overlapping_triangles(&triangles, cell, margin);
        let got: Vec<u32> = binner.triangles_in(voxel).collect();
        assert_eq!(got, expected, "voxel {}", voxel.id());
        brute_total += expected.len();

        // Ranges tile the buffer in slot order.
        assert_eq!(voxel.index as usize, covered);
        covered = voxel.end_index as usize;
    }
    assert_eq!(covered, report.triangle_refs);
    assert_eq!(brute_total, report.triangle_refs);
}

#[test]
fn binning_counts_match_aabb_overlap_on_sphere() {
    let garment = uv_sphere(0.331, 16, 32).positions;
    let (mut grid, _) = analyzed_grid(&garment, 16);
    let margin = 0.017;
    let mut triangles = body_triangles(&uv_sphere(0.3, 16, 32));

    BodyTriangleBinner::refresh_voxel_bounds(&mut triangles, &grid, margin);
    let mut binner = BodyTriangleBinner::new();
    let report = binner.bin(&triangles, &mut grid);

    let mut brute_total = 0;
    for voxel in grid.active() {
        let cell = grid.cell_bounds(grid.unflatten(voxel.id()));
        let expected = overlapping_triangles(&triangles, cell, margin);
        assert_eq!(voxel.range().len(), expected.len(), "voxel {}", voxel.id());
        brute_total += expected.len();
    }
    assert!(brute_total > 0);
    assert_eq!(brute_total, report.triangle_refs);
}

#[test]
fn buffer_grows_once_then_stabilizes() {
    let garment = scattered_points(500);
    let (mut grid, _) = analyzed_grid(&garment, 8);
    let mut triangles = body_triangles(&translated(uv_sphere(0.5, 6, 12), Vec3::new(0.0, 0.0, 0.25)));

    let mut binner = BodyTriangleBinner::new();
    assert_eq!(binner.buffer().capacity(), 1);

    BodyTriangleBinner::refresh_voxel_bounds(&mut triangles, &grid, 0.0);
    let first = binner.bin(&triangles, &mut grid);
    assert_eq!(first.grown_capacity, Some(binner.buffer().capacity()));

    let second = binner.bin(&triangles, &mut grid);
    assert_eq!(second.grown_capacity, None);
    assert_eq!(second.triangle_refs, first.triangle_refs);
}

#[test]
fn triangles_outside_grid_are_not_binned() {
    let garment = scattered_points(100);
    let (mut grid, _) = analyzed_grid(&garment, 8);
    let far = translated(quad_grid(1, 1, 0.1, 0.1), Vec3::new(50.0, 0.0, 0.0));
    let mut triangles = body_triangles(&far);

    BodyTriangleBinner::refresh_voxel_bounds(&mut triangles, &grid, 0.02);
    assert!(triangles.iter().all(|t| !t.in_grid));
    let report = BodyTriangleBinner::new().bin(&triangles, &mut grid);
    assert_eq!(report.triangle_refs, 0);
}

// ─── Collision Tests ──────────────────────────────────────────

/// Large floor triangle in the XZ plane facing +Y.
fn floor() -> BodyTriangle {
    BodyTriangle::new(
        Vec3::new(-10.0, 0.0, 10.0),
        Vec3::new(10.0, 0.0, 10.0),
        Vec3::new(0.0, 0.0, -10.0),
    )
}

#[test]
fn floor_normal_faces_up() {
    assert!((floor().normal - Vec3::Y).length() < 1e-6);
}

#[test]
fn vertices_in_collision_band_end_at_front_radius() {
    let pass = BodyCollisionPass::new(0.01, 0.02);
    let tri = [floor()];

    for d in [-0.019, -0.01, 0.0, 0.005, 0.0099] {
        let (p, n) = pass
            .resolve_vertex(Vec3::new(0.3, d, -0.2), &tri)
            .unwrap_or_else(|| panic!("no contact at d={d}"));
        assert!((p.y - 0.01).abs() < 1e-6, "d={d} → {p:?}");
        assert!((p.x - 0.3).abs() < 1e-6 && (p.z + 0.2).abs() < 1e-6);
        assert_eq!(n, tri[0].normal);
    }

    for d in [-0.5, -0.02, 0.01, 0.3] {
        assert!(pass.resolve_vertex(Vec3::new(0.3, d, -0.2), &tri).is_none(), "d={d}");
    }
    // Projects outside the triangle
    assert!(pass.resolve_vertex(Vec3::new(50.0, 0.0, 0.0), &tri).is_none());
}

#[test]
fn pipeline_contains_vertices_and_skips_pinned() {
    let garment = quad_grid(6, 6, 1.0, 1.0);
    // Lay the sheet flat, slightly below a floor at y = 0.
    let points: Vec<Vec3> = garment
        .positions
        .iter()
        .map(|p| Vec3::new(p.x, -0.005, p.y))
        .collect();

    let mut floor_mesh = quad_grid(1, 1, 4.0, 4.0);
    floor_mesh.positions = floor_mesh
        .positions
        .iter()
        .map(|p| Vec3::new(p.x, 0.0, -p.y))
        .collect();

    let body = Body::init(&floor_mesh).unwrap();
    let mut pipeline = CollisionPipeline::new(body, 16, points.len());
    let skin = StaticSkin::new(floor_mesh.positions.clone());
    assert!(pipeline.begin_frame(Some(&skin), &Mat4::IDENTITY).unwrap());

    let mut state = SolverState::new(points.len());
    state.next_positions = points.clone();
    let mut inv_mass = vec![1.0; points.len()];
    inv_mass[0] = 0.0;

    let params = LocalParameters::default();
    let summary = pipeline.resolve(&mut state, &inv_mass, &params).unwrap().unwrap();

    assert_eq!(summary.contacts, points.len() - 1);
    assert_eq!(state.next_positions[0], points[0]);
    for p in &state.next_positions[1..] {
        assert!((p.y - params.front_radius).abs() < 1e-5, "{p:?}");
    }
    assert!(summary.active_voxels > 0);
    assert!(summary.triangle_refs >= summary.active_voxels);
}

#[test]
fn pipeline_skips_without_body_pose() {
    let body = Body::init(&uv_sphere(1.0, 4, 8)).unwrap();
    let mut pipeline = CollisionPipeline::new(body, 8, 4);
    let mut state = SolverState::new(4);
    let params = LocalParameters::default();

    assert!(!pipeline.begin_frame(None, &Mat4::IDENTITY).unwrap());
    assert!(pipeline.resolve(&mut state, &[1.0; 4], &params).unwrap().is_none());

    let unavailable = StaticSkin::unavailable();
    assert!(!pipeline.begin_frame(Some(&unavailable), &Mat4::IDENTITY).unwrap());
    assert!(!pipeline.body_posed());
}

#[test]
fn body_pose_uses_root_and_garment_transform() {
    let mesh = quad_grid(1, 1, 1.0, 1.0);
    let body = Body::init(&mesh).unwrap();
    let mut pipeline = CollisionPipeline::new(body, 8, 4);

    let skin = StaticSkin::new(mesh.positions.clone())
        .with_root(RigidTransform::new(Vec3::new(0.0, 2.0, 0.0), Quat::IDENTITY));
    let world_to_garment = Mat4::from_scale(Vec3::splat(2.0)).inverse();
    pipeline.begin_frame(Some(&skin), &world_to_garment).unwrap();

    let tri = pipeline.body().triangles()[0];
    let expected = (mesh.positions[mesh.indices[0] as usize] + Vec3::new(0.0, 2.0, 0.0)) * 0.5;
    assert!((tri.positions[0] - expected).length() < 1e-6);
}

#[test]
fn body_rejects_bad_meshes() {
    assert!(Body::init(&TriangleMesh::default()).is_err());
    let mut body = Body::init(&uv_sphere(1.0, 4, 8)).unwrap();
    assert!(body.update_triangles(&[Vec3::ZERO; 3], &Mat4::IDENTITY).is_err());
}

#[test]
fn sorted_ranges_are_ascending() {
    let garment = uv_sphere(1.1, 8, 16).positions;
    let (mut grid, _) = analyzed_grid(&garment, 6);
    let mut triangles = body_triangles(&uv_sphere(1.0, 16, 32));
    BodyTriangleBinner::refresh_voxel_bounds(&mut triangles, &grid, 0.05);
    let mut binner = BodyTriangleBinner::new();
    binner.bin(&triangles, &mut grid);

    for voxel in grid.active() {
        let ids: Vec<u32> = binner.triangles_in(voxel).collect();
        let sorted: BTreeSet<u32> = ids.iter().copied().collect();
        assert_eq!(ids.len(), sorted.len());
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }
}
