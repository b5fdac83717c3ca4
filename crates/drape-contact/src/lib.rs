//! # drape-contact
//!
//! Collision of garment vertices against a deforming body surface.
//!
//! Per sub-step, on the garment's predicted positions:
//! 1. **Bounds** — parallel min/max reduction ([`BoundsReduction`])
//! 2. **Voxel grid** — classify vertices, compact occupied cells ([`VoxelGrid`])
//! 3. **Binning** — count, range and scatter body triangles into the
//!    occupied voxels ([`BodyTriangleBinner`])
//! 4. **Resolve** — push vertices out of the triangles binned in their own
//!    voxel ([`BodyCollisionPass`])
//!
//! [`CollisionPipeline`] strings these together behind the solver's
//! `CollisionStage` seam.

pub mod binner;
pub mod body;
pub mod bounds;
pub mod collision;
pub mod collision_pipeline;
pub mod voxel_grid;

pub use binner::{BinningReport, BodyTriangleBinner};
pub use body::{Body, BodyTriangle, SortedTriangleBuffer};
pub use bounds::BoundsReduction;
pub use collision::BodyCollisionPass;
pub use collision_pipeline::CollisionPipeline;
pub use voxel_grid::{ActiveVoxel, VoxelGrid, NO_ACTIVE_VOXEL};
