//! Explicit position prediction.

use drape_math::Vec3;
use rayon::prelude::*;

use crate::state::{SolverState, NO_VOXEL};

/// `next = p + v·dt`; clears voxel ids and contact normals.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredictPositions;

impl PredictPositions {
    pub fn run(&self, positions: &[Vec3], velocities: &[Vec3], state: &mut SolverState, dt: f32) {
        state
            .next_positions
            .par_iter_mut()
            .zip(state.voxel_ids.par_iter_mut())
            .zip(state.contact_normals.par_iter_mut())
            .zip(positions.par_iter().zip(velocities.par_iter()))
            .for_each(|(((next, voxel), normal), (&p, &v))| {
                *next = p + v * dt;
                *voxel = NO_VOXEL;
                *normal = Vec3::ZERO;
            });
    }
}
