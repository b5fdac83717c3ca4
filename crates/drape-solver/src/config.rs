//! Solver configuration.
//!
//! All lengths and speeds are given in world units. [`SolverConfig::to_local`]
//! rescales them into the garment's local space once per tick.

use std::path::Path;

use drape_math::transform::{world_length_to_local, world_vector_to_local};
use drape_math::{Mat4, Vec3};
use drape_types::constants::{
    DEFAULT_BACK_RADIUS, DEFAULT_DAMPING, DEFAULT_FRONT_RADIUS, DEFAULT_ITERATIONS,
    DEFAULT_SUB_STEPS, DEFAULT_VELOCITY_CLAMP, DEFAULT_VOXEL_RESOLUTION, EPSILON, GRAVITY,
    MAX_VOXEL_RESOLUTION,
};
use drape_types::{DrapeError, DrapeResult};
use serde::{Deserialize, Serialize};

/// Configuration for the PBD solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Gravity vector [gx, gy, gz] in world units/s².
    pub gravity: [f32; 3],

    /// Fraction of velocity removed each sub-step (0.0 = none, 1.0 = all).
    pub damping: f32,

    /// Maximum vertex speed in world units/s.
    pub velocity_clamp: f32,

    /// Sub-steps per tick.
    pub sub_steps: u32,

    /// Constraint iterations per sub-step.
    pub iterations: u32,

    /// Distance kept in front of body triangles.
    pub front_radius: f32,

    /// Depth behind a body triangle within which a vertex is still
    /// pushed out to the front.
    pub back_radius: f32,

    /// Smallest meaningful length, in world units.
    pub epsilon: f32,

    /// Voxels per axis of the collision grid, at most
    /// [`MAX_VOXEL_RESOLUTION`]. Memory and per-sub-step clearing grow
    /// with `voxel_resolution³`.
    pub voxel_resolution: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -GRAVITY, 0.0],
            damping: DEFAULT_DAMPING,
            velocity_clamp: DEFAULT_VELOCITY_CLAMP,
            sub_steps: DEFAULT_SUB_STEPS,
            iterations: DEFAULT_ITERATIONS,
            front_radius: DEFAULT_FRONT_RADIUS,
            back_radius: DEFAULT_BACK_RADIUS,
            epsilon: EPSILON,
            voxel_resolution: DEFAULT_VOXEL_RESOLUTION,
        }
    }
}

impl SolverConfig {
    /// Creates a config for debugging (one sub-step, few iterations, coarse grid).
    pub fn debug() -> Self {
        Self {
            sub_steps: 1,
            iterations: 4,
            voxel_resolution: 16,
            ..Default::default()
        }
    }

    /// Creates a high-quality config (more sub-steps and iterations, finer grid).
    pub fn high_quality() -> Self {
        Self {
            sub_steps: 6,
            iterations: 40,
            voxel_resolution: 128,
            ..Default::default()
        }
    }

    /// Rejects parameter combinations the solver cannot run with.
    pub fn validate(&self) -> DrapeResult<()> {
        if self.sub_steps == 0 {
            return Err(DrapeError::InvalidConfig("sub_steps must be at least 1".into()));
        }
        if self.iterations == 0 {
            return Err(DrapeError::InvalidConfig("iterations must be at least 1".into()));
        }
        if self.front_radius < 0.0 || self.back_radius < 0.0 {
            return Err(DrapeError::InvalidConfig(format!(
                "collision radii must be non-negative (front {}, back {})",
                self.front_radius, self.back_radius
            )));
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(DrapeError::InvalidConfig(format!(
                "damping {} outside [0, 1]",
                self.damping
            )));
        }
        if self.velocity_clamp <= 0.0 || self.epsilon <= 0.0 {
            return Err(DrapeError::InvalidConfig(
                "velocity_clamp and epsilon must be positive".into(),
            ));
        }
        if self.voxel_resolution == 0 || self.voxel_resolution > MAX_VOXEL_RESOLUTION {
            return Err(DrapeError::InvalidConfig(format!(
                "voxel_resolution {} outside 1..={}",
                self.voxel_resolution, MAX_VOXEL_RESOLUTION
            )));
        }
        if self.gravity.iter().any(|g| !g.is_finite()) {
            return Err(DrapeError::InvalidConfig("gravity must be finite".into()));
        }
        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> DrapeResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| DrapeError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> DrapeResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn gravity_vec(&self) -> Vec3 {
        Vec3::from_array(self.gravity)
    }

    /// Rescales the world-space parameters into the local space of a
    /// garment placed by `garment_to_world`.
    ///
    /// Gravity goes through the inverse matrix; radii, the velocity clamp
    /// and epsilon are divided by the average axis scale.
    pub fn to_local(&self, garment_to_world: &Mat4) -> LocalParameters {
        LocalParameters {
            gravity: world_vector_to_local(self.gravity_vec(), garment_to_world),
            damping: self.damping,
            velocity_clamp: world_length_to_local(self.velocity_clamp, garment_to_world),
            front_radius: world_length_to_local(self.front_radius, garment_to_world),
            back_radius: world_length_to_local(self.back_radius, garment_to_world),
            epsilon: world_length_to_local(self.epsilon, garment_to_world),
        }
    }
}

/// Solver parameters expressed in garment-local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalParameters {
    pub gravity: Vec3,
    pub damping: f32,
    pub velocity_clamp: f32,
    pub front_radius: f32,
    pub back_radius: f32,
    pub epsilon: f32,
}

impl Default for LocalParameters {
    fn default() -> Self {
        SolverConfig::default().to_local(&Mat4::IDENTITY)
    }
}
