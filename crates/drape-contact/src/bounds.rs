//! Parallel bounding-box reduction over predicted positions.

use drape_math::{Aabb, AtomicAabb, Vec3};
use rayon::prelude::*;

/// Two-pass min/max reduction: [`reset`](Self::reset), then
/// [`accumulate`](Self::accumulate) from any number of threads.
#[derive(Debug, Default)]
pub struct BoundsReduction {
    aabb: AtomicAabb,
}

impl BoundsReduction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pass 1: min = +∞, max = −∞.
    pub fn reset(&self) {
        self.aabb.reset();
    }

    /// Pass 2: fold every position in with atomic min/max.
    pub fn accumulate(&self, positions: &[Vec3]) {
        positions.par_iter().for_each(|&p| self.aabb.include(p));
    }

    pub fn bounds(&self) -> Aabb {
        self.aabb.load()
    }
}
