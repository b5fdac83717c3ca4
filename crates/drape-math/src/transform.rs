//! Scene transforms and world → garment-local rescaling.
//!
//! The simulation runs in the garment's local space. Lengths supplied in
//! world units are divided by the average of the garment's axis scales so
//! behavior does not depend on how the garment is scaled in the scene.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Translation + rotation without scale (a root bone pose).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidTransform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl RigidTransform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self { translation, rotation }
    }

    /// `TRS(translation, rotation, 1)`.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.translation)
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Per-axis scale encoded in an affine matrix.
pub fn axis_scale(matrix: &Mat4) -> Vec3 {
    Vec3::new(
        matrix.x_axis.truncate().length(),
        matrix.y_axis.truncate().length(),
        matrix.z_axis.truncate().length(),
    )
}

/// Mean of the three axis scales.
pub fn average_axis_scale(matrix: &Mat4) -> f32 {
    let s = axis_scale(matrix);
    (s.x + s.y + s.z) / 3.0
}

/// Converts a world-space length into garment-local units.
#[inline]
pub fn world_length_to_local(length: f32, garment_to_world: &Mat4) -> f32 {
    let scale = average_axis_scale(garment_to_world);
    if scale > 0.0 {
        length / scale
    } else {
        length
    }
}

/// Converts a world-space direction (e.g. gravity) into garment-local space.
#[inline]
pub fn world_vector_to_local(vector: Vec3, garment_to_world: &Mat4) -> Vec3 {
    garment_to_world.inverse().transform_vector3(vector)
}
