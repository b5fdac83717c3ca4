//! Uniform voxel grid over the garment's bounds.
//!
//! Only cells that contain at least one garment vertex become *active*.
//! Active cells are compacted into a dense list so the binner only ever
//! touches as many voxels as there are occupied cells, while a flat
//! `resolution³` lookup maps a cell id to its slot in that list.
//!
//! Cell of a point: `clamp(floor((p − min) / max(extent, ε) · res), 0, res − 1)`,
//! flattened as `x + (y + z · res) · res`.

use std::sync::atomic::{AtomicI32, AtomicU32, AtomicUsize, Ordering};

use drape_math::{Aabb, UVec3, Vec3};
use rayon::prelude::*;

/// Lookup value of a cell with no garment vertex.
pub const NO_ACTIVE_VOXEL: i32 = -1;

/// Lookup value while a thread is allocating the cell's slot.
const CLAIMING: i32 = -2;

/// An occupied voxel and its range in the sorted triangle buffer.
#[derive(Debug, Default)]
pub struct ActiveVoxel {
    /// Flattened cell id.
    pub id: AtomicU32,
    /// Body triangles overlapping this voxel (count phase).
    pub triangle_count: AtomicU32,
    /// First index of this voxel's range in the sorted buffer.
    pub index: u32,
    /// One past the last index of the range.
    pub end_index: u32,
    /// Scatter write cursor, relative to `index`.
    pub cursor: AtomicU32,
}

impl ActiveVoxel {
    #[inline]
    pub fn id(&self) -> u32 {
        self.id.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn range(&self) -> std::ops::Range<usize> {
        self.index as usize..self.end_index as usize
    }
}

/// Voxel grid with active-cell compaction.
#[derive(Debug)]
pub struct VoxelGrid {
    resolution: u32,
    lookup: Vec<AtomicI32>,
    active: Vec<ActiveVoxel>,
    active_count: AtomicUsize,
    bounds: Aabb,
    extent: Vec3,
}

impl VoxelGrid {
    /// Creates a grid of `resolution³` cells with room for
    /// `max_active` occupied cells (the garment's vertex count suffices).
    pub fn new(resolution: u32, max_active: usize) -> Self {
        let cells = (resolution as usize).pow(3);
        Self {
            resolution,
            lookup: (0..cells).map(|_| AtomicI32::new(NO_ACTIVE_VOXEL)).collect(),
            active: (0..max_active).map(|_| ActiveVoxel::default()).collect(),
            active_count: AtomicUsize::new(0),
            bounds: Aabb::new(Vec3::ZERO, Vec3::ONE),
            extent: Vec3::ONE,
        }
    }

    #[inline]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Bounds used by the last [`analyze`](Self::analyze).
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.active_count.load(Ordering::Acquire)
    }

    /// Occupied voxels of the last analysis, in slot order.
    pub fn active(&self) -> &[ActiveVoxel] {
        &self.active[..self.active_count()]
    }

    pub fn active_mut(&mut self) -> &mut [ActiveVoxel] {
        let n = self.active_count();
        &mut self.active[..n]
    }

    /// Classifies every position into its cell and compacts the occupied
    /// cells. Writes each position's flattened cell id into `voxel_ids`.
    ///
    /// Returns the number of active voxels, which equals the number of
    /// distinct occupied cells.
    pub fn analyze(
        &mut self,
        bounds: Aabb,
        epsilon: f32,
        positions: &[Vec3],
        voxel_ids: &mut [u32],
    ) -> usize {
        if self.active.len() < positions.len() {
            self.active.resize_with(positions.len(), ActiveVoxel::default);
        }

        // Pass 1
        self.lookup
            .par_iter()
            .for_each(|cell| cell.store(NO_ACTIVE_VOXEL, Ordering::Relaxed));
        self.active_count.store(0, Ordering::Relaxed);
        self.bounds = bounds;
        self.extent = bounds.guarded_extent(epsilon);

        // Pass 2
        let grid = &*self;
        voxel_ids
            .par_iter_mut()
            .zip(positions.par_iter())
            .for_each(|(voxel_id, &p)| {
                let id = grid.flatten(grid.cell_of(p));
                grid.claim(id);
                *voxel_id = id;
            });

        self.active_count()
    }

    /// Allocates an active slot for cell `id` unless another thread did.
    fn claim(&self, id: u32) {
        let cell = &self.lookup[id as usize];
        loop {
            match cell.compare_exchange(
                NO_ACTIVE_VOXEL,
                CLAIMING,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    let slot = self.active_count.fetch_add(1, Ordering::AcqRel);
                    let voxel = &self.active[slot];
                    voxel.id.store(id, Ordering::Relaxed);
                    voxel.triangle_count.store(0, Ordering::Relaxed);
                    voxel.cursor.store(0, Ordering::Relaxed);
                    cell.store(slot as i32, Ordering::Release);
                    return;
                }
                Err(CLAIMING) => std::hint::spin_loop(),
                Err(_) => return,
            }
        }
    }

    /// Clamped cell coordinates of `p`.
    #[inline]
    pub fn cell_of(&self, p: Vec3) -> UVec3 {
        let res = self.resolution as f32;
        let scaled = ((p - self.bounds.min) / self.extent * res).floor();
        scaled
            .clamp(Vec3::ZERO, Vec3::splat(res - 1.0))
            .as_uvec3()
    }

    #[inline]
    pub fn flatten(&self, cell: UVec3) -> u32 {
        cell.x + (cell.y + cell.z * self.resolution) * self.resolution
    }

    #[inline]
    pub fn unflatten(&self, id: u32) -> UVec3 {
        let r = self.resolution;
        UVec3::new(id % r, (id / r) % r, id / (r * r))
    }

    /// Active slot of cell `id`, if occupied.
    #[inline]
    pub fn slot_of(&self, id: u32) -> Option<usize> {
        let slot = self.lookup.get(id as usize)?.load(Ordering::Acquire);
        (slot >= 0).then_some(slot as usize)
    }

    /// World-space box of one cell.
    pub fn cell_bounds(&self, cell: UVec3) -> Aabb {
        let size = self.extent / self.resolution as f32;
        let min = self.bounds.min + cell.as_vec3() * size;
        Aabb::new(min, min + size)
    }
}
