//! Axis-aligned bounding box.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box given by its two corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// An inverted box that any `expand` call will overwrite.
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    /// Box enclosing all `points`.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Self {
        points.into_iter().fold(Self::empty(), |acc, &p| acc.expanded(p))
    }

    /// Returns a copy grown to include `p`.
    #[inline]
    pub fn expanded(self, p: Vec3) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    /// True when no point has been folded in.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Extent per axis, floored at `epsilon` so it can be divided by.
    #[inline]
    pub fn guarded_extent(&self, epsilon: f32) -> Vec3 {
        (self.max - self.min).max(Vec3::splat(epsilon))
    }

    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}
