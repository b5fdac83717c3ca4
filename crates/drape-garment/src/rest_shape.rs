//! Rest shape and rest edge lengths.
//!
//! `rest = base + Σ (wᵢ / 100) · deltaᵢ`, evaluated per vertex in parallel,
//! then every edge length is measured on the rest positions, also in
//! parallel. Both passes write disjoint elements, so no atomics are needed.

use drape_math::Vec3;
use drape_mesh::Edge;
use rayon::prelude::*;

use crate::blend_shape::BlendShapeSet;

/// Weighted rest shape of a garment.
#[derive(Debug, Clone, Default)]
pub struct RestShape {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tangents: Vec<Vec3>,
}

impl RestShape {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            positions: vec![Vec3::ZERO; vertex_count],
            normals: vec![Vec3::ZERO; vertex_count],
            tangents: vec![Vec3::ZERO; vertex_count],
        }
    }

    /// Re-evaluates the rest shape from `shapes` and their current weights.
    pub fn compute(&mut self, shapes: &BlendShapeSet) {
        let factors = shapes.factors();
        let base = shapes.base();

        self.positions
            .par_iter_mut()
            .zip(self.normals.par_iter_mut())
            .zip(self.tangents.par_iter_mut())
            .enumerate()
            .for_each(|(v, ((position, normal), tangent))| {
                let mut rest = base[v];
                for (delta, &f) in shapes.vertex_deltas(v).iter().zip(&factors) {
                    rest.position += f * delta.position;
                    rest.normal += f * delta.normal;
                    rest.tangent += f * delta.tangent;
                }
                *position = rest.position;
                *normal = rest.normal;
                *tangent = rest.tangent;
            });
    }

    /// Measures every edge on the rest positions.
    pub fn update_edge_lengths(&self, edges: &mut [Edge]) {
        let positions = &self.positions;
        edges.par_iter_mut().for_each(|edge| {
            edge.length = (positions[edge.end as usize] - positions[edge.start as usize]).length();
        });
    }
}
