//! External forces, damping and velocity clamp.

use drape_math::Vec3;
use rayon::prelude::*;

use crate::config::LocalParameters;

/// `v += g·dt`, `v *= 1 - damping`, `|v| ≤ velocity_clamp`.
#[derive(Debug, Clone, Copy)]
pub struct IntegrateForces {
    pub gravity: Vec3,
    pub damping: f32,
    pub velocity_clamp: f32,
}

impl IntegrateForces {
    pub fn from_params(params: &LocalParameters) -> Self {
        Self {
            gravity: params.gravity,
            damping: params.damping,
            velocity_clamp: params.velocity_clamp,
        }
    }

    /// Pinned vertices (`inv_mass == 0`) are held at zero velocity.
    pub fn run(&self, velocities: &mut [Vec3], inv_mass: &[f32], dt: f32) {
        let gravity_step = self.gravity * dt;
        let keep = 1.0 - self.damping;
        let clamp = self.velocity_clamp;

        velocities
            .par_iter_mut()
            .zip(inv_mass.par_iter())
            .for_each(|(v, &w)| {
                if w == 0.0 {
                    *v = Vec3::ZERO;
                    return;
                }
                *v = ((*v + gravity_step) * keep).clamp_length_max(clamp);
            });
    }
}
