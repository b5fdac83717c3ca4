//! Transient solver buffers.
//!
//! Recomputed every sub-step; only their sizes persist between steps.

use drape_math::{FixedVec3Accumulator, Vec3};

/// Voxel id of a vertex the grid has not classified this sub-step.
pub const NO_VOXEL: u32 = u32::MAX;

/// Per-vertex scratch state of one sub-step.
#[derive(Debug, Default)]
pub struct SolverState {
    /// Predicted positions the constraints and collisions operate on.
    pub next_positions: Vec<Vec3>,

    /// Flattened voxel id of each predicted position, or [`NO_VOXEL`].
    pub voxel_ids: Vec<u32>,

    /// Body normal of the last contact this sub-step, or zero.
    pub contact_normals: Vec<Vec3>,

    /// Jacobi correction sums and counts.
    pub deltas: Vec<FixedVec3Accumulator>,
}

impl SolverState {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            next_positions: vec![Vec3::ZERO; vertex_count],
            voxel_ids: vec![NO_VOXEL; vertex_count],
            contact_normals: vec![Vec3::ZERO; vertex_count],
            deltas: (0..vertex_count).map(|_| FixedVec3Accumulator::new()).collect(),
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.next_positions.len()
    }

    /// Number of vertices with a recorded contact.
    pub fn contact_count(&self) -> usize {
        self.contact_normals.iter().filter(|n| **n != Vec3::ZERO).count()
    }
}
