//! Jacobi distance constraints.
//!
//! Each edge computes its correction independently and adds it to both
//! endpoints through fixed-point atomic accumulators. A second pass
//! moves every vertex by the average of the corrections it received.
//! Averaging (rather than summing) keeps the iteration stable no matter
//! how many edges share a vertex.

use drape_math::{FixedVec3Accumulator, Vec3};
use drape_mesh::Edge;
use rayon::prelude::*;

/// Accumulate + project pass over all edges.
#[derive(Debug, Clone, Copy)]
pub struct DistanceConstraintPass {
    /// Edges shorter than this are skipped (direction undefined).
    pub epsilon: f32,
}

impl DistanceConstraintPass {
    pub fn new(epsilon: f32) -> Self {
        Self { epsilon }
    }

    /// Adds every edge's correction to its endpoints' accumulators.
    ///
    /// `C = |d| − rest` is distributed by inverse mass; an edge between two
    /// pinned vertices does nothing.
    pub fn accumulate(
        &self,
        edges: &[Edge],
        inv_mass: &[f32],
        next_positions: &[Vec3],
        deltas: &[FixedVec3Accumulator],
    ) {
        let epsilon = self.epsilon;
        edges.par_iter().for_each(|edge| {
            let a = edge.start as usize;
            let b = edge.end as usize;
            let (wa, wb) = (inv_mass[a], inv_mass[b]);
            let w = wa + wb;
            if w == 0.0 {
                return;
            }

            let d = next_positions[b] - next_positions[a];
            let len = d.length();
            if len < epsilon {
                return;
            }
            let correction = (len - edge.length) / (len * w) * d;

            if wa > 0.0 {
                deltas[a].add(correction * wa);
            }
            if wb > 0.0 {
                deltas[b].add(-correction * wb);
            }
        });
    }

    /// Applies `sum / count` to each vertex and resets the accumulators.
    pub fn project(&self, next_positions: &mut [Vec3], deltas: &[FixedVec3Accumulator]) {
        next_positions
            .par_iter_mut()
            .zip(deltas.par_iter())
            .for_each(|(p, acc)| {
                if let Some(avg) = acc.take_average() {
                    *p += avg;
                }
            });
    }
}
