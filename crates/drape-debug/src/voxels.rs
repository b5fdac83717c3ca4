//! Line-segment export of collision voxels.

use serde::{Deserialize, Serialize};

use drape_contact::VoxelGrid;
use drape_math::{Aabb, Vec3};
use drape_types::{DrapeError, DrapeResult};

/// Box edges as `[start, end]` pairs.
pub type Segment = [Vec3; 2];

/// One active voxel and the edges of its box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoxelWireframe {
    pub id: u32,
    /// Body triangles binned into the voxel.
    pub triangle_count: usize,
    pub segments: Vec<Segment>,
}

/// The 12 edges of voxel `id` in a `resolution³` grid spanning `bounds`.
pub fn voxel_wireframe(id: u32, resolution: u32, bounds: Aabb) -> [Segment; 12] {
    let r = resolution.max(1);
    let cell = Vec3::new((id % r) as f32, ((id / r) % r) as f32, (id / (r * r)) as f32);
    let size = (bounds.max - bounds.min) / r as f32;
    let min = bounds.min + cell * size;
    box_edges(&Aabb::new(min, min + size))
}

/// Wireframes of every active voxel of `grid`, using its last analyzed bounds.
pub fn active_voxel_wireframes(grid: &VoxelGrid) -> Vec<VoxelWireframe> {
    grid.active()
        .iter()
        .map(|voxel| {
            let cell = grid.unflatten(voxel.id());
            VoxelWireframe {
                id: voxel.id(),
                triangle_count: voxel.range().len(),
                segments: box_edges(&grid.cell_bounds(cell)).to_vec(),
            }
        })
        .collect()
}

/// JSON dump of `wireframes` for external viewers.
pub fn wireframes_to_json(wireframes: &[VoxelWireframe]) -> DrapeResult<String> {
    serde_json::to_string_pretty(wireframes)
        .map_err(|e| DrapeError::Serialization(e.to_string()))
}

fn box_edges(aabb: &Aabb) -> [Segment; 12] {
    let (lo, hi) = (aabb.min, aabb.max);
    let corner = |x: bool, y: bool, z: bool| {
        Vec3::new(
            if x { hi.x } else { lo.x },
            if y { hi.y } else { lo.y },
            if z { hi.z } else { lo.z },
        )
    };
    [
        // Bottom face (y = lo)
        [corner(false, false, false), corner(true, false, false)],
        [corner(true, false, false), corner(true, false, true)],
        [corner(true, false, true), corner(false, false, true)],
        [corner(false, false, true), corner(false, false, false)],
        // Top face (y = hi)
        [corner(false, true, false), corner(true, true, false)],
        [corner(true, true, false), corner(true, true, true)],
        [corner(true, true, true), corner(false, true, true)],
        [corner(false, true, true), corner(false, true, false)],
        // Verticals
        [corner(false, false, false), corner(false, true, false)],
        [corner(true, false, false), corner(true, true, false)],
        [corner(true, false, true), corner(true, true, true)],
        [corner(false, false, true), corner(false, true, true)],
    ]
}
