//! Collision seam.
//!
//! The solver knows nothing about bodies or voxel grids. It hands its
//! predicted positions to a [`CollisionStage`] once per sub-step, after
//! the first constraint iteration.

use drape_types::DrapeResult;

use crate::config::LocalParameters;
use crate::state::SolverState;

/// Counters reported by one collision pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionSummary {
    /// Distinct voxels occupied by garment vertices.
    pub active_voxels: usize,
    /// Total (voxel, triangle) references written by the binner.
    pub triangle_refs: usize,
    /// Vertices pushed out of a body triangle.
    pub contacts: usize,
    /// New sorted-buffer capacity if it grew during this pass.
    pub grown_capacity: Option<usize>,
}

/// Resolves garment–body contacts on predicted positions.
pub trait CollisionStage {
    /// Moves colliding entries of `state.next_positions` out of the body
    /// and records contact normals.
    ///
    /// Returns `Ok(None)` when collision was skipped for this sub-step
    /// (no body pose available, nothing to collide with).
    fn resolve(
        &mut self,
        state: &mut SolverState,
        inv_mass: &[f32],
        params: &LocalParameters,
    ) -> DrapeResult<Option<CollisionSummary>>;

    /// Returns the stage's name.
    fn name(&self) -> &str;
}
