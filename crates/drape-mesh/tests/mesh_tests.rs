//! Integration tests for drape-mesh.

use drape_math::{RigidTransform, Vec3};
use drape_mesh::generators::{quad_grid, uv_sphere};
use drape_mesh::normals::{compute_mesh_normals, compute_vertex_normals};
use drape_mesh::topology::{weld_vertices, weld_vertices_naive, Edge, GarmentTopology};
use drape_mesh::{SkinSource, StaticSkin, TriangleMesh};

// ─── TriangleMesh Tests ───────────────────────────────────────

fn make_single_triangle() -> TriangleMesh {
    TriangleMesh {
        positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
        normals: vec![Vec3::Z; 3],
        tangents: vec![Vec3::X; 3],
        indices: vec![0, 1, 2],
    }
}

/// Two quads side by side whose shared column is duplicated, as an
/// exporter splitting a UV seam would produce.
///
/// ```text
/// 0 ── 1   4 ── 5
/// │    │   │    │
/// 2 ── 3   6 ── 7      (1≡4, 3≡6)
/// ```
fn make_seamed_strip() -> TriangleMesh {
    let positions = vec![
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(2.0, 1.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(2.0, 0.0, 0.0),
    ];
    TriangleMesh {
        normals: vec![Vec3::Z; positions.len()],
        tangents: vec![Vec3::X; positions.len()],
        positions,
        indices: vec![0, 2, 1, 1, 2, 3, 4, 6, 5, 5, 6, 7],
    }
}

#[test]
fn basic_counts() {
    let mesh = make_single_triangle();
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.triangle_count(), 1);
    assert_eq!(mesh.triangle(0), [0, 1, 2]);
    assert_eq!(mesh.position(1), Vec3::X);
}

#[test]
fn validate_ok() {
    assert!(make_single_triangle().validate().is_ok());
}

#[test]
fn validate_catches_inconsistent_lengths() {
    let mut mesh = make_single_triangle();
    mesh.normals.push(Vec3::Z);
    assert!(mesh.validate().is_err());
}

#[test]
fn validate_catches_oob_index() {
    let mut mesh = make_single_triangle();
    mesh.indices[2] = 99;
    assert!(mesh.validate().is_err());
}

#[test]
fn validate_catches_degenerate() {
    let mut mesh = make_single_triangle();
    mesh.indices = vec![0, 0, 1];
    assert!(mesh.validate().is_err());
}

#[test]
fn validate_catches_nan() {
    let mut mesh = make_single_triangle();
    mesh.positions[0].x = f32::NAN;
    assert!(mesh.validate().is_err());
}

#[test]
fn from_interleaved() {
    let positions = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let mesh = TriangleMesh::from_interleaved(&positions, &[0, 1, 2]).unwrap();
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.positions[1], Vec3::X);
    assert_eq!(mesh.normals, vec![Vec3::ZERO; 3]);
}

#[test]
fn mesh_json_roundtrip() {
    let mesh = make_seamed_strip();
    let json = serde_json::to_string(&mesh).unwrap();
    let back: TriangleMesh = serde_json::from_str(&json).unwrap();
    assert_eq!(mesh, back);
}

// ─── Generator Tests ──────────────────────────────────────────

#[test]
fn quad_grid_2x2() {
    let mesh = quad_grid(2, 2, 1.0, 1.0);
    assert_eq!(mesh.vertex_count(), 9);
    assert_eq!(mesh.triangle_count(), 8);
    assert!(mesh.validate().is_ok());
}

#[test]
fn quad_grid_dimensions() {
    let mesh = quad_grid(4, 4, 2.0, 2.0);
    assert!((mesh.positions[0] - Vec3::new(-1.0, 1.0, 0.0)).length() < 1e-6);
    assert!((mesh.positions[4] - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-6);
}

#[test]
fn uv_sphere_radius() {
    let mesh = uv_sphere(2.5, 8, 16);
    assert!(mesh.validate().is_ok());
    for (i, p) in mesh.positions.iter().enumerate() {
        assert!((p.length() - 2.5).abs() < 1e-4, "Vertex {} at distance {}", i, p.length());
    }
}

// ─── Weld Tests ───────────────────────────────────────────────

#[test]
fn weld_merges_seam_duplicates() {
    let mesh = make_seamed_strip();
    let reps = weld_vertices(&mesh.positions);
    assert_eq!(reps, vec![0, 1, 2, 3, 1, 5, 3, 7]);
}

#[test]
fn weld_matches_naive_scan() {
    let mut positions = uv_sphere(1.0, 12, 24).positions;
    // Near-duplicates just inside and just outside the weld radius.
    positions.push(positions[30] + Vec3::new(5e-6, 0.0, 0.0));
    positions.push(positions[31] + Vec3::new(2e-5, 0.0, 0.0));

    assert_eq!(weld_vertices(&positions), weld_vertices_naive(&positions));
}

#[test]
fn weld_picks_lowest_representative() {
    let positions = vec![
        Vec3::new(5.0, 5.0, 5.0),
        Vec3::ZERO,
        Vec3::new(5.0, 5.0, 5.0),
        Vec3::ZERO,
        Vec3::new(5.0, 5.0, 5.0),
    ];
    assert_eq!(weld_vertices(&positions), vec![0, 1, 0, 1, 0]);
}

// ─── Topology Tests ───────────────────────────────────────────

#[test]
fn edge_is_canonical() {
    let e = Edge::new(7, 3, 0.5);
    assert_eq!((e.start, e.end), (3, 7));
    assert_eq!(e.key(), Edge::new(3, 7, 0.0).key());
}

#[test]
fn topology_single_quad() {
    let mesh = quad_grid(1, 1, 1.0, 1.0);
    let topo = GarmentTopology::build(&mesh).unwrap();
    assert_eq!(topo.edges.len(), 5);
    assert_eq!(topo.unique_vertex_count(), 4);
}

#[test]
fn topology_2x2_grid_has_16_edges() {
    let mesh = quad_grid(2, 2, 1.0, 1.0);
    let topo = GarmentTopology::build(&mesh).unwrap();
    assert_eq!(topo.edges.len(), 16);
    assert_eq!(topo.vertex_triangles[4].len(), 6);
}

#[test]
fn topology_edges_are_canonical_unique_sorted() {
    let mesh = uv_sphere(1.0, 10, 20);
    let topo = GarmentTopology::build(&mesh).unwrap();

    for e in &topo.edges {
        assert!(e.start < e.end);
        assert_eq!(e.length, 0.0);
    }
    for pair in topo.edges.windows(2) {
        assert!(pair[0].key() < pair[1].key());
    }
}

#[test]
fn seam_edges_use_representatives() {
    let mesh = make_seamed_strip();
    let topo = GarmentTopology::build(&mesh).unwrap();

    assert_eq!(topo.unique_vertex_count(), 6);
    // 2 quads sharing one edge: 5 + 5 - 1
    assert_eq!(topo.edges.len(), 9);
    for e in &topo.edges {
        assert!(topo.is_representative(e.start as usize));
        assert!(topo.is_representative(e.end as usize));
    }
    assert!(topo.vertex_triangles[4].is_empty());
}

#[test]
fn topology_is_invariant_under_triangle_permutation() {
    let mesh = uv_sphere(1.0, 8, 16);
    let forward = GarmentTopology::build(&mesh).unwrap();

    let mut shuffled = mesh.clone();
    let tris: Vec<[u32; 3]> = (0..mesh.triangle_count()).map(|t| mesh.triangle(t)).collect();
    // Deterministic permutation: reverse, then rotate each triangle's corners.
    shuffled.indices = tris
        .iter()
        .rev()
        .flat_map(|&[a, b, c]| [b, c, a])
        .collect();
    let permuted = GarmentTopology::build(&shuffled).unwrap();

    assert_eq!(forward.edges, permuted.edges);
    assert_eq!(forward.representatives, permuted.representatives);
}

#[test]
fn sphere_poles_collapse_to_single_vertex() {
    let mesh = uv_sphere(1.0, 6, 12);
    let topo = GarmentTopology::build(&mesh).unwrap();
    // Both pole rings weld to one vertex; the seam column welds onto column 0.
    assert_eq!(topo.unique_vertex_count(), 2 + 5 * 12);
}

#[test]
fn empty_mesh_is_rejected() {
    let mesh = TriangleMesh::default();
    assert!(GarmentTopology::build(&mesh).is_err());

    let mut no_tris = make_single_triangle();
    no_tris.indices.clear();
    assert!(GarmentTopology::build(&no_tris).is_err());
}

// ─── Normal Tests ─────────────────────────────────────────────

#[test]
fn flat_grid_normals() {
    let mut mesh = quad_grid(4, 4, 1.0, 1.0);
    mesh.normals.iter_mut().for_each(|n| *n = Vec3::ZERO);
    compute_mesh_normals(&mut mesh);
    for n in &mesh.normals {
        assert!((*n - Vec3::Z).length() < 1e-5);
    }
}

#[test]
fn sphere_normals_point_outward() {
    let mut mesh = uv_sphere(1.0, 8, 16);
    let topo = GarmentTopology::build(&mesh).unwrap();
    compute_vertex_normals(&mesh.positions, &topo.welded_indices, &mut mesh.normals);

    let mut checked = 0;
    for i in 0..mesh.vertex_count() {
        if !topo.is_representative(i) {
            continue;
        }
        let dot = mesh.normals[i].dot(mesh.positions[i].normalize());
        assert!(dot > 0.9, "Vertex {} normal misaligned: dot={}", i, dot);
        checked += 1;
    }
    assert!(checked > 0);
}

// ─── Skin Tests ───────────────────────────────────────────────

#[test]
fn static_skin_reports_stream_and_weights() {
    let mut skin = StaticSkin::new(vec![Vec3::ONE]).with_root(RigidTransform::new(
        Vec3::Y,
        Default::default(),
    ));
    assert_eq!(skin.skinned_positions(), Some(&[Vec3::ONE][..]));
    assert_eq!(skin.root_transform().translation, Vec3::Y);

    skin.set_blend_shape_weight(2, 40.0);
    assert_eq!(skin.blend_shape_weights(), &[0.0, 0.0, 40.0]);

    skin.set_positions(None);
    assert!(skin.skinned_positions().is_none());
    assert!(StaticSkin::unavailable().skinned_positions().is_none());
}
