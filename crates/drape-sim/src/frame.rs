//! Per-frame inputs and outputs.

use drape_math::Mat4;
use drape_mesh::SkinSource;

/// Scene data supplied by the host once per frame.
pub struct FrameInput<'a> {
    /// Garment local space → world space.
    pub garment_to_world: Mat4,
    /// Skinned body, posed in its root-bone space.
    pub body_skin: Option<&'a dyn SkinSource>,
    /// Skinned copy of the garment, used for position resets.
    pub garment_skin: Option<&'a dyn SkinSource>,
}

impl<'a> FrameInput<'a> {
    /// A garment at the world origin with no skins attached.
    pub fn identity() -> Self {
        Self::new(Mat4::IDENTITY)
    }

    pub fn new(garment_to_world: Mat4) -> Self {
        Self {
            garment_to_world,
            body_skin: None,
            garment_skin: None,
        }
    }

    pub fn with_body(mut self, skin: &'a dyn SkinSource) -> Self {
        self.body_skin = Some(skin);
        self
    }

    pub fn with_garment_skin(mut self, skin: &'a dyn SkinSource) -> Self {
        self.garment_skin = Some(skin);
        self
    }
}

impl Default for FrameInput<'_> {
    fn default() -> Self {
        Self::identity()
    }
}

/// What one call to `Simulator::step` did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Tick number (0-indexed).
    pub tick: u64,
    pub sub_steps: u32,
    /// Constraint iterations summed over all sub-steps.
    pub iterations: u32,
    /// Whether the body was posed this frame.
    pub body_posed: bool,
    /// Sub-steps in which the collision stage ran.
    pub collision_sub_steps: u32,
    /// Vertices pushed out of the body, summed over sub-steps.
    pub contacts: usize,
    /// Active voxels in the last collision sub-step.
    pub active_voxels: usize,
    /// Triangle references in the last collision sub-step.
    pub triangle_refs: usize,
    /// Whether a pending position reset was applied.
    pub reset_applied: bool,
    /// Garment kinetic energy after the tick.
    pub kinetic_energy: f32,
    /// Wall-clock time (seconds).
    pub wall_time: f64,
}
