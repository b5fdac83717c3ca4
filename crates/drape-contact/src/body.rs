//! Collision body: a skinned triangle mesh seen from garment space.

use std::sync::atomic::{AtomicU32, Ordering};

use drape_math::{Mat4, UVec3, Vec3};
use drape_mesh::normals::triangle_normal;
use drape_mesh::TriangleMesh;
use drape_types::{DrapeError, DrapeResult};
use rayon::prelude::*;

/// One body triangle in garment space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BodyTriangle {
    pub positions: [Vec3; 3],
    /// Unit outward normal (zero for degenerate triangles).
    pub normal: Vec3,
    /// Lowest voxel cell overlapped (inclusive).
    pub min_voxel: UVec3,
    /// Highest voxel cell overlapped (inclusive).
    pub max_voxel: UVec3,
    /// False when the triangle lies entirely outside the voxel grid.
    pub in_grid: bool,
}

impl BodyTriangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self {
            positions: [a, b, c],
            normal: triangle_normal(a, b, c),
            ..Default::default()
        }
    }

    pub fn min(&self) -> Vec3 {
        self.positions[0].min(self.positions[1]).min(self.positions[2])
    }

    pub fn max(&self) -> Vec3 {
        self.positions[0].max(self.positions[1]).max(self.positions[2])
    }

    /// True when voxel `cell` lies inside this triangle's voxel box.
    #[inline]
    pub fn covers(&self, cell: UVec3) -> bool {
        self.in_grid && cell.cmpge(self.min_voxel).all() && cell.cmple(self.max_voxel).all()
    }

    /// Number of cells in the voxel box.
    #[inline]
    pub fn voxel_span(&self) -> usize {
        if !self.in_grid {
            return 0;
        }
        let d = self.max_voxel - self.min_voxel + UVec3::ONE;
        d.x as usize * d.y as usize * d.z as usize
    }
}

/// Static body topology plus its per-frame garment-space triangles.
#[derive(Debug, Clone)]
pub struct Body {
    indices: Vec<u32>,
    vertex_count: usize,
    triangles: Vec<BodyTriangle>,
}

impl Body {
    /// Takes the body's triangle list. Fails on an empty or malformed mesh.
    pub fn init(mesh: &TriangleMesh) -> DrapeResult<Self> {
        mesh.validate()?;
        mesh.require_non_empty("Body")?;

        let body = Self {
            indices: mesh.indices.clone(),
            vertex_count: mesh.vertex_count(),
            triangles: vec![BodyTriangle::default(); mesh.triangle_count()],
        };

        tracing::info!(
            vertices = body.vertex_count,
            triangles = body.triangle_count(),
            "Body initialized"
        );

        Ok(body)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn triangles(&self) -> &[BodyTriangle] {
        &self.triangles
    }

    pub fn triangles_mut(&mut self) -> &mut [BodyTriangle] {
        &mut self.triangles
    }

    /// Transforms skinned positions into garment space and rebuilds
    /// every triangle's corners and normal.
    pub fn update_triangles(&mut self, skinned: &[Vec3], body_to_garment: &Mat4) -> DrapeResult<()> {
        if skinned.len() != self.vertex_count {
            return Err(DrapeError::InvalidMesh(format!(
                "Skinned body has {} vertices, expected {}",
                skinned.len(),
                self.vertex_count
            )));
        }

        let m = *body_to_garment;
        self.triangles
            .par_iter_mut()
            .zip(self.indices.par_chunks_exact(3))
            .for_each(|(tri, idx)| {
                let a = m.transform_point3(skinned[idx[0] as usize]);
                let b = m.transform_point3(skinned[idx[1] as usize]);
                let c = m.transform_point3(skinned[idx[2] as usize]);
                *tri = BodyTriangle::new(a, b, c);
            });
        Ok(())
    }
}

/// Triangle ids grouped by active voxel.
///
/// Grows geometrically and never shrinks; starts at one slot.
#[derive(Debug)]
pub struct SortedTriangleBuffer {
    data: Vec<AtomicU32>,
}

impl SortedTriangleBuffer {
    pub fn new() -> Self {
        Self {
            data: vec![AtomicU32::new(0)],
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Doubles the capacity until it holds `required` entries.
    ///
    /// Returns the new capacity if the buffer was reallocated.
    pub fn ensure_capacity(&mut self, required: usize) -> Option<usize> {
        let mut size = self.capacity().max(1);
        if size >= required {
            return None;
        }
        while size < required {
            size *= 2;
        }
        self.data = (0..size).map(|_| AtomicU32::new(0)).collect();
        Some(size)
    }

    #[inline]
    pub fn store(&self, index: usize, triangle: u32) {
        self.data[index].store(triangle, Ordering::Relaxed);
    }

    /// Triangle ids stored in `range`.
    pub fn range(&self, range: std::ops::Range<usize>) -> impl Iterator<Item = u32> + '_ {
        self.data[range].iter().map(|t| t.load(Ordering::Relaxed))
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [AtomicU32] {
        &mut self.data
    }
}

impl Default for SortedTriangleBuffer {
    fn default() -> Self {
        Self::new()
    }
}
