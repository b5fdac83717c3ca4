//! # drape-debug
//!
//! State snapshots and voxel wireframes for debugging simulation issues.
//! Snapshots serialize garment state to binary for replay; wireframes
//! export the collision grid's active cells as line segments.

pub mod snapshot;
pub mod voxels;

pub use snapshot::StateSnapshot;
pub use voxels::{active_voxel_wireframes, voxel_wireframe, wireframes_to_json, VoxelWireframe};
