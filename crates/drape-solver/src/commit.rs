//! Velocity derivation and position commit.

use drape_math::Vec3;
use rayon::prelude::*;

use crate::state::SolverState;

/// `v = (next − p) / dt`, minus any velocity into a contacted body; `p = next`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommitPositions;

impl CommitPositions {
    pub fn run(
        &self,
        positions: &mut [Vec3],
        velocities: &mut [Vec3],
        state: &SolverState,
        dt: f32,
    ) {
        let inv_dt = 1.0 / dt;
        positions
            .par_iter_mut()
            .zip(velocities.par_iter_mut())
            .zip(state.next_positions.par_iter())
            .zip(state.contact_normals.par_iter())
            .for_each(|(((p, v), &next), &n)| {
                let mut vel = (next - *p) * inv_dt;
                let into_body = vel.dot(n);
                if into_body < 0.0 {
                    vel -= into_body * n;
                }
                *v = vel;
                *p = next;
            });
    }
}
