//! Order-preserving float encoding for atomic min/max reductions.
//!
//! An IEEE-754 `f32` maps to a `u32` whose unsigned order matches the
//! float order: flip every bit of negative values, flip only the sign
//! bit of non-negative values. `AtomicU32::fetch_min` / `fetch_max` then
//! act as float min/max.

use std::sync::atomic::{AtomicU32, Ordering};

use glam::Vec3;

use crate::aabb::Aabb;

/// Encode `value` so that `a < b` ⇔ `encode(a) < encode(b)` (NaN excluded).
#[inline]
pub fn encode(value: f32) -> u32 {
    let bits = value.to_bits();
    if bits & 0x8000_0000 != 0 {
        !bits
    } else {
        bits | 0x8000_0000
    }
}

/// Inverse of [`encode`].
#[inline]
pub fn decode(value: u32) -> f32 {
    let bits = if value & 0x8000_0000 != 0 {
        value & 0x7FFF_FFFF
    } else {
        !value
    };
    f32::from_bits(bits)
}

/// A 3D bounding box accumulated by many threads at once.
#[derive(Debug)]
pub struct AtomicAabb {
    min: [AtomicU32; 3],
    max: [AtomicU32; 3],
}

impl AtomicAabb {
    /// Creates an empty box (min = +∞, max = −∞).
    pub fn new() -> Self {
        let aabb = Self {
            min: [AtomicU32::new(0), AtomicU32::new(0), AtomicU32::new(0)],
            max: [AtomicU32::new(0), AtomicU32::new(0), AtomicU32::new(0)],
        };
        aabb.reset();
        aabb
    }

    /// Resets the accumulators to +∞ / −∞.
    pub fn reset(&self) {
        for axis in 0..3 {
            self.min[axis].store(encode(f32::INFINITY), Ordering::Relaxed);
            self.max[axis].store(encode(f32::NEG_INFINITY), Ordering::Relaxed);
        }
    }

    /// Folds one point into the box.
    #[inline]
    pub fn include(&self, p: Vec3) {
        for (axis, value) in p.to_array().into_iter().enumerate() {
            let encoded = encode(value);
            self.min[axis].fetch_min(encoded, Ordering::Relaxed);
            self.max[axis].fetch_max(encoded, Ordering::Relaxed);
        }
    }

    /// Reads the current box back as floats.
    pub fn load(&self) -> Aabb {
        let read = |cells: &[AtomicU32; 3]| {
            Vec3::new(
                decode(cells[0].load(Ordering::Relaxed)),
                decode(cells[1].load(Ordering::Relaxed)),
                decode(cells[2].load(Ordering::Relaxed)),
            )
        };
        Aabb::new(read(&self.min), read(&self.max))
    }
}

impl Default for AtomicAabb {
    fn default() -> Self {
        Self::new()
    }
}
