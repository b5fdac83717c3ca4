//! Vertex vs. body-triangle resolution.
//!
//! A vertex is tested only against the triangles binned into its own
//! voxel. For each such triangle with plane normal `n` and signed
//! distance `d = (p − a)·n`:
//!
//! - if `−back_radius < d < front_radius` and the projection of `p` onto
//!   the plane falls inside the triangle, `p` moves to `plane + front_radius·n`
//!   and `n` is recorded as the vertex's contact normal.
//!
//! Triangles are visited in ascending id order, each seeing the position
//! left by the previous one.

use drape_math::Vec3;
use rayon::prelude::*;

use crate::binner::BodyTriangleBinner;
use crate::body::BodyTriangle;
use crate::voxel_grid::VoxelGrid;

/// Push-out pass over all garment vertices.
#[derive(Debug, Clone, Copy)]
pub struct BodyCollisionPass {
    pub front_radius: f32,
    pub back_radius: f32,
}

impl BodyCollisionPass {
    pub fn new(front_radius: f32, back_radius: f32) -> Self {
        Self {
            front_radius,
            back_radius,
        }
    }

    /// Resolves every free vertex. Returns the number of vertices moved.
    #[allow(clippy::too_many_arguments)]
    pub fn run(
        &self,
        next_positions: &mut [Vec3],
        voxel_ids: &[u32],
        contact_normals: &mut [Vec3],
        inv_mass: &[f32],
        grid: &VoxelGrid,
        binner: &BodyTriangleBinner,
        triangles: &[BodyTriangle],
    ) -> usize {
        let active = grid.active();
        next_positions
            .par_iter_mut()
            .zip(contact_normals.par_iter_mut())
            .zip(voxel_ids.par_iter().zip(inv_mass.par_iter()))
            .map(|((p, normal), (&voxel_id, &w))| {
                if w == 0.0 {
                    return 0;
                }
                let Some(slot) = grid.slot_of(voxel_id) else {
                    return 0;
                };
                let candidates = binner
                    .triangles_in(&active[slot])
                    .map(|t| &triangles[t as usize]);
                match self.resolve_vertex(*p, candidates) {
                    Some((moved, n)) => {
                        *p = moved;
                        *normal = n;
                        1
                    }
                    None => 0,
                }
            })
            .sum()
    }

    /// Applies every candidate triangle in order.
    ///
    /// Returns the final position and the last contact normal, or `None`
    /// if no triangle moved the point.
    pub fn resolve_vertex<'a>(
        &self,
        mut p: Vec3,
        candidates: impl IntoIterator<Item = &'a BodyTriangle>,
    ) -> Option<(Vec3, Vec3)> {
        let mut contact = None;
        for tri in candidates {
            let n = tri.normal;
            if n == Vec3::ZERO {
                continue;
            }
            let d = (p - tri.positions[0]).dot(n);
            if d <= -self.back_radius || d >= self.front_radius {
                continue;
            }
            let on_plane = p - d * n;
            if !inside_triangle(on_plane, tri) {
                continue;
            }
            p = on_plane + self.front_radius * n;
            contact = Some(n);
        }
        contact.map(|n| (p, n))
    }
}

/// Barycentric inside test for a point already on the triangle's plane.
fn inside_triangle(p: Vec3, tri: &BodyTriangle) -> bool {
    let [a, b, c] = tri.positions;
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d00 = ab.dot(ab);
    let d01 = ab.dot(ac);
    let d11 = ac.dot(ac);
    let d20 = ap.dot(ab);
    let d21 = ap.dot(ac);

    let denom = d00 * d11 - d01 * d01;
    if denom.abs() < 1e-12 {
        return false;
    }
    let inv_denom = 1.0 / denom;

    let v = (d11 * d20 - d01 * d21) * inv_denom;
    let w = (d00 * d21 - d01 * d20) * inv_denom;
    let u = 1.0 - v - w;

    u >= 0.0 && v >= 0.0 && w >= 0.0
}
