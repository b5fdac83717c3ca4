//! # drape-math
//!
//! Math primitives for the Drape garment simulator.
//!
//! Provides:
//! - Re-exports of `glam` types (`Vec3`, `Mat4`, etc.)
//! - Fixed-point atomic accumulation of float vectors (lock-free summation)
//! - Order-preserving float ↔ integer encoding for atomic min/max reductions
//! - Axis-aligned bounding boxes and scene-scale helpers

pub mod aabb;
pub mod fixed_point;
pub mod ordered;
pub mod transform;

pub use aabb::Aabb;
pub use fixed_point::FixedVec3Accumulator;
pub use ordered::AtomicAabb;
pub use transform::RigidTransform;

// Re-export glam types as the canonical math types for Drape.
pub use glam::{IVec3, Mat3, Mat4, Quat, UVec3, Vec3, Vec4};
