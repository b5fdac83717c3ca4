//! # drape-mesh
//!
//! Triangle mesh representation and preprocessing for garments and bodies.
//!
//! ## Key Types
//!
//! - [`TriangleMesh`] — Per-channel vertex buffers (positions, normals,
//!   tangents) plus a flat index buffer.
//! - [`GarmentTopology`] — Welded triangle indices and the canonical,
//!   deduplicated edge list the distance constraints run over.
//! - [`SkinSource`] — Host-side provider of skinned vertex positions.
//! - Procedural generators for tests and benchmarks (quad grids, UV spheres).

pub mod generators;
pub mod mesh;
pub mod normals;
pub mod skin;
pub mod topology;

pub use mesh::TriangleMesh;
pub use skin::{SkinSource, StaticSkin};
pub use topology::{Edge, GarmentTopology};
