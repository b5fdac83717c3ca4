//! Host-side skinning interface.
//!
//! The animation runtime that deforms the body (and the garment's own
//! skinned copy used for position resets) lives outside this workspace.
//! It is reached only through [`SkinSource`].

use drape_math::{RigidTransform, Vec3};

/// Provider of skinned vertex positions for one mesh.
pub trait SkinSource {
    /// Skinned positions in the skin's root-bone space.
    ///
    /// `None` when the stream is not available this frame; callers skip
    /// the work that needs it and retry on the next tick.
    fn skinned_positions(&self) -> Option<&[Vec3]>;

    /// Pose of the root bone in world space.
    fn root_transform(&self) -> RigidTransform;

    /// Pushes a blend-shape weight (0–100) to the skinned renderer.
    fn set_blend_shape_weight(&mut self, _index: usize, _weight: f32) {}
}

/// A skin whose positions are supplied directly by the caller.
///
/// Used by tests, benchmarks and the CLI in place of a host animation
/// runtime.
#[derive(Debug, Clone, Default)]
pub struct StaticSkin {
    positions: Option<Vec<Vec3>>,
    root: RigidTransform,
    blend_shape_weights: Vec<f32>,
}

impl StaticSkin {
    /// A skin that always reports `positions` with an identity root.
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self {
            positions: Some(positions),
            root: RigidTransform::IDENTITY,
            blend_shape_weights: Vec::new(),
        }
    }

    /// A skin whose stream is not ready.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, root: RigidTransform) -> Self {
        self.root = root;
        self
    }

    /// Replaces (or withdraws, with `None`) the skinned positions.
    pub fn set_positions(&mut self, positions: Option<Vec<Vec3>>) {
        self.positions = positions;
    }

    pub fn set_root(&mut self, root: RigidTransform) {
        self.root = root;
    }

    /// Weights most recently pushed via [`SkinSource::set_blend_shape_weight`].
    pub fn blend_shape_weights(&self) -> &[f32] {
        &self.blend_shape_weights
    }
}

impl SkinSource for StaticSkin {
    fn skinned_positions(&self) -> Option<&[Vec3]> {
        self.positions.as_deref()
    }

    fn root_transform(&self) -> RigidTransform {
        self.root
    }

    fn set_blend_shape_weight(&mut self, index: usize, weight: f32) {
        if self.blend_shape_weights.len() <= index {
            self.blend_shape_weights.resize(index + 1, 0.0);
        }
        self.blend_shape_weights[index] = weight;
    }
}
