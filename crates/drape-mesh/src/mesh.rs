//! Core triangle mesh type.
//!
//! Each vertex attribute lives in its own contiguous channel:
//! - `positions: [p0, p1, p2, ...]`
//! - `normals:   [n0, n1, n2, ...]`
//! - `tangents:  [t0, t1, t2, ...]`
//!
//! Parallel phases iterate one channel at a time, so keeping channels
//! separate lets `rayon` split them into independent mutable slices.

use drape_math::Vec3;
use drape_types::{DrapeError, DrapeResult};
use serde::{Deserialize, Serialize};

/// A triangle mesh stored as per-attribute channels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Vertex normals.
    pub normals: Vec<Vec3>,
    /// Vertex tangents (xyz only).
    pub tangents: Vec<Vec3>,

    /// Triangle indices, flat: `[t0v0, t0v1, t0v2, t1v0, ...]`.
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn position(&self, i: usize) -> Vec3 {
        self.positions[i]
    }

    /// Returns the three vertex indices of triangle `t`.
    #[inline]
    pub fn triangle(&self, t: usize) -> [u32; 3] {
        let base = t * 3;
        [self.indices[base], self.indices[base + 1], self.indices[base + 2]]
    }

    /// Creates an empty mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_capacity: usize, triangle_capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_capacity),
            normals: Vec::with_capacity(vertex_capacity),
            tangents: Vec::with_capacity(vertex_capacity),
            indices: Vec::with_capacity(triangle_capacity * 3),
        }
    }

    /// Validates mesh integrity.
    ///
    /// Checks:
    /// - All vertex channels have the same length
    /// - Positions are finite
    /// - Triangle indices are within bounds
    /// - No degenerate triangles (repeated vertex indices)
    pub fn validate(&self) -> DrapeResult<()> {
        let n = self.positions.len();

        if self.normals.len() != n || self.tangents.len() != n {
            return Err(DrapeError::InvalidMesh(format!(
                "Vertex channels have inconsistent lengths (positions {}, normals {}, tangents {})",
                n,
                self.normals.len(),
                self.tangents.len()
            )));
        }

        if let Some(i) = self.positions.iter().position(|p| !p.is_finite()) {
            return Err(DrapeError::InvalidMesh(format!(
                "Vertex {} has a non-finite position",
                i
            )));
        }

        if self.indices.len() % 3 != 0 {
            return Err(DrapeError::InvalidMesh(
                "Index count is not divisible by 3".into(),
            ));
        }

        for (i, &idx) in self.indices.iter().enumerate() {
            if idx as usize >= n {
                return Err(DrapeError::InvalidMesh(format!(
                    "Index {} at position {} is out of range (vertex count: {})",
                    idx, i, n
                )));
            }
        }

        for t in 0..self.triangle_count() {
            let [a, b, c] = self.triangle(t);
            if a == b || b == c || a == c {
                return Err(DrapeError::InvalidMesh(format!(
                    "Triangle {} has repeated vertex indices: [{}, {}, {}]",
                    t, a, b, c
                )));
            }
        }

        Ok(())
    }

    /// Fails unless the mesh has at least one vertex and one triangle.
    pub fn require_non_empty(&self, what: &str) -> DrapeResult<()> {
        if self.vertex_count() == 0 {
            return Err(DrapeError::InvalidMesh(format!("{} mesh has no vertices", what)));
        }
        if self.triangle_count() == 0 {
            return Err(DrapeError::InvalidMesh(format!("{} mesh has no triangles", what)));
        }
        Ok(())
    }

    /// Constructs a mesh from interleaved position data `[x0, y0, z0, x1, ...]`.
    ///
    /// Normals and tangents start zeroed; call
    /// [`compute_mesh_normals`](crate::normals::compute_mesh_normals) afterwards
    /// if they are needed.
    pub fn from_interleaved(positions: &[f32], indices: &[u32]) -> DrapeResult<Self> {
        if positions.len() % 3 != 0 {
            return Err(DrapeError::InvalidMesh(
                "Interleaved positions length not divisible by 3".into(),
            ));
        }

        let n = positions.len() / 3;
        let mesh = Self {
            positions: positions
                .chunks_exact(3)
                .map(|p| Vec3::new(p[0], p[1], p[2]))
                .collect(),
            normals: vec![Vec3::ZERO; n],
            tangents: vec![Vec3::ZERO; n],
            indices: indices.to_vec(),
        };

        mesh.validate()?;
        Ok(mesh)
    }
}
