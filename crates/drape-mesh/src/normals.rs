//! Vertex normal computation from triangle geometry.
//!
//! Area-weighted: each triangle's unnormalized face normal (magnitude =
//! 2 × area) is accumulated at its three corners, then normalized.

use drape_math::Vec3;

use crate::mesh::TriangleMesh;

/// Recompute `normals` from `positions` and a flat triangle index buffer.
///
/// Vertices referenced by no triangle, or whose accumulated normal
/// vanishes, are left at zero.
pub fn compute_vertex_normals(positions: &[Vec3], indices: &[u32], normals: &mut [Vec3]) {
    normals.iter_mut().for_each(|n| *n = Vec3::ZERO);

    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let e1 = positions[b] - positions[a];
        let e2 = positions[c] - positions[a];
        let n = e1.cross(e2);

        normals[a] += n;
        normals[b] += n;
        normals[c] += n;
    }

    for n in normals.iter_mut() {
        let len = n.length();
        if len > 1e-10 {
            *n /= len;
        }
    }
}

/// Recompute the normals of a whole mesh in place.
pub fn compute_mesh_normals(mesh: &mut TriangleMesh) {
    compute_vertex_normals(&mesh.positions, &mesh.indices, &mut mesh.normals);
}

/// Unit normal of triangle `(a, b, c)` with counter-clockwise winding.
///
/// Returns zero for degenerate triangles.
#[inline]
pub fn triangle_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).normalize_or_zero()
}
