//! Physical constants and simulation defaults.
//!
//! All lengths are world units (meters) unless a name says otherwise.
//! The orchestrator rescales them into garment-local space each tick.

/// Gravitational acceleration (m/s²).
pub const GRAVITY: f32 = 9.81;

/// Default fixed timestep (seconds). 1/60th of a second.
pub const DEFAULT_DT: f32 = 1.0 / 60.0;

/// Default number of sub-steps per fixed tick.
pub const DEFAULT_SUB_STEPS: u32 = 3;

/// Default number of Jacobi constraint iterations per sub-step.
pub const DEFAULT_ITERATIONS: u32 = 25;

/// Default voxel grid resolution per axis.
pub const DEFAULT_VOXEL_RESOLUTION: u32 = 64;

/// Largest supported voxel grid resolution per axis.
///
/// The `resolution³` cell lookup is cleared every collision sub-step;
/// 256³ cells is 64 MiB of `AtomicI32`.
pub const MAX_VOXEL_RESOLUTION: u32 = 256;

/// Default minimum distance kept on the outward side of the body (meters).
pub const DEFAULT_FRONT_RADIUS: f32 = 0.01;

/// Default depth behind the body surface still treated as a penetration (meters).
pub const DEFAULT_BACK_RADIUS: f32 = 0.02;

/// Default speed clamp (m/s).
pub const DEFAULT_VELOCITY_CLAMP: f32 = 10.0;

/// Default velocity damping per sub-step.
pub const DEFAULT_DAMPING: f32 = 0.01;

/// Epsilon for floating-point comparisons (world units).
pub const EPSILON: f32 = 1.0e-6;

/// Squared distance under which two mesh vertices are welded (mesh units²).
pub const WELD_DISTANCE_SQ: f32 = 1.0e-10;

/// Blend-shape weights are exposed in 0..=100; this maps them to 0..=1.
pub const BLEND_SHAPE_WEIGHT_SCALE: f32 = 100.0;

/// How long the skin pose must settle before a requested reset applies (ms).
pub const RESET_SETTLE_MS: u64 = 500;
