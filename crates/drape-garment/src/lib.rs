//! # drape-garment
//!
//! Everything the solver needs to know about one garment:
//!
//! - [`BlendShapeSet`] — base shape, per-shape deltas and UI weights
//! - [`RestShape`] — the weighted rest shape the edge lengths derive from
//! - [`GarmentState`] — per-vertex simulation channels
//! - [`PositionReset`] — deferred snap of the garment onto its skinned pose
//! - [`Garment`] — owns the above plus the welded topology

pub mod blend_shape;
pub mod garment;
pub mod reset;
pub mod rest_shape;
pub mod state;

pub use blend_shape::{BlendShapeSet, BlendShapeVertex};
pub use garment::Garment;
pub use reset::PositionReset;
pub use rest_shape::RestShape;
pub use state::GarmentState;
