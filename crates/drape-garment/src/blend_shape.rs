//! Blend shapes (morph targets) of a garment.
//!
//! Deltas are stored vertex-major: the delta of shape `s` at vertex `v`
//! lives at `v * shape_count + s`, so one vertex's contributions are
//! contiguous when the rest shape is recomputed per vertex.

use drape_math::Vec3;
use drape_mesh::TriangleMesh;
use drape_types::constants::BLEND_SHAPE_WEIGHT_SCALE;
use drape_types::{DrapeError, DrapeResult};
use serde::{Deserialize, Serialize};

/// Position, normal and tangent of one vertex (absolute or delta).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BlendShapeVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tangent: Vec3,
}

impl BlendShapeVertex {
    pub fn new(position: Vec3, normal: Vec3, tangent: Vec3) -> Self {
        Self {
            position,
            normal,
            tangent,
        }
    }

    /// A delta that only moves the position.
    pub fn offset(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// Base shape plus weighted deltas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlendShapeSet {
    base: Vec<BlendShapeVertex>,
    deltas: Vec<BlendShapeVertex>,
    names: Vec<String>,
    /// UI units, `0..=100`.
    weights: Vec<f32>,
}

impl BlendShapeSet {
    /// Builds a set from the base shape and one delta array per shape.
    ///
    /// Every delta array must have the base's length and there must be
    /// exactly one name per shape. All weights start at zero.
    pub fn new(
        base: Vec<BlendShapeVertex>,
        per_shape_deltas: Vec<Vec<BlendShapeVertex>>,
        names: Vec<String>,
    ) -> DrapeResult<Self> {
        let vertex_count = base.len();
        let shape_count = per_shape_deltas.len();

        if names.len() != shape_count {
            return Err(DrapeError::InvalidMesh(format!(
                "Blend shape name count ({}) != shape count ({})",
                names.len(),
                shape_count
            )));
        }
        if let Some((s, d)) = per_shape_deltas
            .iter()
            .enumerate()
            .find(|(_, d)| d.len() != vertex_count)
        {
            return Err(DrapeError::InvalidMesh(format!(
                "Blend shape '{}' has {} deltas, expected {}",
                names[s],
                d.len(),
                vertex_count
            )));
        }

        let mut deltas = vec![BlendShapeVertex::default(); vertex_count * shape_count];
        for (s, shape) in per_shape_deltas.iter().enumerate() {
            for (v, delta) in shape.iter().enumerate() {
                deltas[v * shape_count + s] = *delta;
            }
        }

        Ok(Self {
            base,
            deltas,
            names,
            weights: vec![0.0; shape_count],
        })
    }

    /// A set with no shapes whose base is `mesh`.
    pub fn neutral(mesh: &TriangleMesh) -> Self {
        Self {
            base: Self::base_from_mesh(mesh),
            deltas: Vec::new(),
            names: Vec::new(),
            weights: Vec::new(),
        }
    }

    /// Base vertices taken from a mesh's channels.
    pub fn base_from_mesh(mesh: &TriangleMesh) -> Vec<BlendShapeVertex> {
        mesh.positions
            .iter()
            .zip(&mesh.normals)
            .zip(&mesh.tangents)
            .map(|((&p, &n), &t)| BlendShapeVertex::new(p, n, t))
            .collect()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.base.len()
    }

    #[inline]
    pub fn shape_count(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn base(&self) -> &[BlendShapeVertex] {
        &self.base
    }

    /// Deltas of vertex `v`, one per shape.
    #[inline]
    pub fn vertex_deltas(&self, v: usize) -> &[BlendShapeVertex] {
        let s = self.shape_count();
        &self.deltas[v * s..(v + 1) * s]
    }

    pub fn weight(&self, index: usize) -> DrapeResult<f32> {
        self.weights
            .get(index)
            .copied()
            .ok_or(DrapeError::BlendShapeIndex {
                index,
                count: self.shape_count(),
            })
    }

    /// Sets weight `index`, clamped to `0..=100`. Returns the stored value.
    pub fn set_weight(&mut self, index: usize, weight: f32) -> DrapeResult<f32> {
        let count = self.shape_count();
        let slot = self
            .weights
            .get_mut(index)
            .ok_or(DrapeError::BlendShapeIndex { index, count })?;
        *slot = weight.clamp(0.0, BLEND_SHAPE_WEIGHT_SCALE);
        Ok(*slot)
    }

    /// Weights as blend factors (`weight / 100`).
    pub fn factors(&self) -> Vec<f32> {
        self.weights
            .iter()
            .map(|w| w / BLEND_SHAPE_WEIGHT_SCALE)
            .collect()
    }
}
