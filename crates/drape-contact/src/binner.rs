//! Bins body triangles into the active voxels they overlap.
//!
//! Three data-parallel phases, like a GPU counting sort:
//! 1. **Count** — every triangle bumps `triangle_count` of each active
//!    voxel inside its voxel box.
//! 2. **Range** — exclusive prefix sum over active voxels assigns each a
//!    disjoint `[index, end_index)` slice of the sorted buffer.
//! 3. **Scatter** — every triangle writes its id at `index + cursor++` of
//!    each voxel it overlaps.
//!
//! Scatter order depends on thread timing, so each range is sorted
//! afterwards to make collision resolution deterministic.

use std::sync::atomic::{AtomicU32, Ordering};

use drape_math::{UVec3, Vec3};
use rayon::prelude::*;

use crate::body::{BodyTriangle, SortedTriangleBuffer};
use crate::voxel_grid::{ActiveVoxel, VoxelGrid};

/// Outcome of one binning pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinningReport {
    /// Total (voxel, triangle) references.
    pub triangle_refs: usize,
    /// New buffer capacity if the buffer grew.
    pub grown_capacity: Option<usize>,
}

/// Owner of the sorted triangle buffer and the three binning phases.
#[derive(Debug, Default)]
pub struct BodyTriangleBinner {
    buffer: SortedTriangleBuffer,
}

impl BodyTriangleBinner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &SortedTriangleBuffer {
        &self.buffer
    }

    /// Runs count → range → (grow → count → range) → scatter → sort.
    pub fn bin(&mut self, triangles: &[BodyTriangle], grid: &mut VoxelGrid) -> BinningReport {
        self.count(triangles, grid);
        let mut total = Self::assign_ranges(grid);

        let grown_capacity = self.buffer.ensure_capacity(total);
        if let Some(capacity) = grown_capacity {
            tracing::info!(capacity, "Sorted body triangle buffer grown");
            self.count(triangles, grid);
            total = Self::assign_ranges(grid);
        }

        self.scatter(triangles, grid);
        self.sort_ranges(grid);

        BinningReport {
            triangle_refs: total,
            grown_capacity,
        }
    }

    /// Computes each triangle's clamped voxel box, grown by `margin` so
    /// vertices within collision range of a triangle share a voxel with it.
    pub fn refresh_voxel_bounds(triangles: &mut [BodyTriangle], grid: &VoxelGrid, margin: f32) {
        let bounds = grid.bounds();
        triangles.par_iter_mut().for_each(|tri| {
            let lo = tri.min() - Vec3::splat(margin);
            let hi = tri.max() + Vec3::splat(margin);
            tri.in_grid = lo.cmple(bounds.max).all() && hi.cmpge(bounds.min).all();
            if tri.in_grid {
                tri.min_voxel = grid.cell_of(lo);
                tri.max_voxel = grid.cell_of(hi);
            }
        });
    }

    /// Count phase.
    pub fn count(&self, triangles: &[BodyTriangle], grid: &VoxelGrid) {
        grid.active()
            .par_iter()
            .for_each(|v| v.triangle_count.store(0, Ordering::Relaxed));

        triangles.par_iter().for_each(|tri| {
            for_each_covered_voxel(tri, grid, |voxel| {
                voxel.triangle_count.fetch_add(1, Ordering::Relaxed);
            });
        });
    }

    /// Range phase: exclusive prefix sum. Returns the total reference count.
    pub fn assign_ranges(grid: &mut VoxelGrid) -> usize {
        let mut running = 0u32;
        for voxel in grid.active_mut() {
            voxel.index = running;
            running += *voxel.triangle_count.get_mut();
            voxel.end_index = running;
            *voxel.cursor.get_mut() = 0;
        }
        running as usize
    }

    /// Scatter phase.
    pub fn scatter(&self, triangles: &[BodyTriangle], grid: &VoxelGrid) {
        let buffer = &self.buffer;
        triangles.par_iter().enumerate().for_each(|(t, tri)| {
            for_each_covered_voxel(tri, grid, |voxel| {
                let k = voxel.cursor.fetch_add(1, Ordering::Relaxed);
                buffer.store((voxel.index + k) as usize, t as u32);
            });
        });
    }

    /// Sorts every voxel's range ascending.
    pub fn sort_ranges(&mut self, grid: &VoxelGrid) {
        let mut chunks: Vec<&mut [AtomicU32]> = Vec::with_capacity(grid.active_count());
        let mut rest = self.buffer.slots_mut();
        // Ranges were assigned in slot order, so they tile the buffer front to back.
        for voxel in grid.active() {
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(voxel.range().len());
            chunks.push(head);
            rest = tail;
        }
        chunks
            .par_iter_mut()
            .for_each(|range| range.sort_unstable_by_key(|t| t.load(Ordering::Relaxed)));
    }

    /// Triangle ids binned into `voxel`.
    pub fn triangles_in<'a>(&'a self, voxel: &ActiveVoxel) -> impl Iterator<Item = u32> + 'a {
        self.buffer.range(voxel.range())
    }
}

/// Calls `f` for every active voxel inside `tri`'s voxel box.
///
/// Walks whichever is smaller: the box's cells (through the lookup) or
/// the active list (with a containment test). Both visit the same set.
fn for_each_covered_voxel(tri: &BodyTriangle, grid: &VoxelGrid, mut f: impl FnMut(&ActiveVoxel)) {
    let span = tri.voxel_span();
    if span == 0 {
        return;
    }
    let active = grid.active();

    if span <= active.len() {
        for z in tri.min_voxel.z..=tri.max_voxel.z {
            for y in tri.min_voxel.y..=tri.max_voxel.y {
                for x in tri.min_voxel.x..=tri.max_voxel.x {
                    if let Some(slot) = grid.slot_of(grid.flatten(UVec3::new(x, y, z))) {
                        f(&active[slot]);
                    }
                }
            }
        }
    } else {
        for voxel in active {
            if tri.covers(grid.unflatten(voxel.id())) {
                f(voxel);
            }
        }
    }
}
