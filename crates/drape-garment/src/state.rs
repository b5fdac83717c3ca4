//! Per-vertex garment simulation channels.
//!
//! Positions, velocities and friends in the garment's local space. The
//! solver reads and writes these every sub-step; everything else about
//! the garment (topology, blend shapes) is immutable during a step.

use drape_math::Vec3;
use drape_mesh::TriangleMesh;
use serde::{Deserialize, Serialize};

/// Per-vertex mutable channels of a garment.
///
/// All channels have length `vertex_count`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GarmentState {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tangents: Vec<Vec3>,
    pub velocities: Vec<Vec3>,

    /// Inverse mass; `0.0` pins the vertex in place.
    pub inv_mass: Vec<f32>,
}

impl GarmentState {
    /// Copies the mesh's channels; velocities start at zero, all vertices free.
    pub fn from_mesh(mesh: &TriangleMesh) -> Self {
        let n = mesh.vertex_count();
        Self {
            positions: mesh.positions.clone(),
            normals: mesh.normals.clone(),
            tangents: mesh.tangents.clone(),
            velocities: vec![Vec3::ZERO; n],
            inv_mass: vec![1.0; n],
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_pinned(&self, i: usize) -> bool {
        self.inv_mass[i] == 0.0
    }

    /// Total kinetic energy assuming unit mass per free vertex.
    pub fn kinetic_energy(&self) -> f32 {
        self.velocities
            .iter()
            .zip(&self.inv_mass)
            .filter(|(_, w)| **w > 0.0)
            .map(|(v, _)| 0.5 * v.length_squared())
            .sum()
    }

    /// Largest vertex speed.
    pub fn max_speed(&self) -> f32 {
        self.velocities
            .iter()
            .map(|v| v.length())
            .fold(0.0_f32, f32::max)
    }
}
