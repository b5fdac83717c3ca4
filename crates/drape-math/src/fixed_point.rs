//! Fixed-point atomic accumulation of float vectors.
//!
//! Many work items add small float corrections into the same vertex
//! concurrently. Floats have no atomic add, so each contribution is
//! encoded as a scaled integer and summed with `AtomicI64::fetch_add`.
//!
//! Scale is `2^24`: one unit in the last place is ≈ 6·10⁻⁸ local units,
//! and a single accumulator only overflows past ≈ 5.5·10¹¹ units of
//! summed magnitude. Encoding rounds to nearest, so the per-contribution
//! error is at most half an ulp of the fixed-point grid.

use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};

use glam::Vec3;

/// Integer units per float unit.
pub const FIXED_POINT_SCALE: f32 = (1u32 << 24) as f32;

/// Encode a float into the fixed-point grid.
#[inline]
pub fn encode(value: f32) -> i64 {
    (value as f64 * FIXED_POINT_SCALE as f64).round() as i64
}

/// Decode a fixed-point integer back to a float.
#[inline]
pub fn decode(value: i64) -> f32 {
    (value as f64 / FIXED_POINT_SCALE as f64) as f32
}

/// Lock-free accumulator for a `Vec3` sum plus a contribution counter.
///
/// One accumulator per vertex. Writers call [`add`](Self::add) from any
/// thread; a later phase calls [`take_average`](Self::take_average), which
/// also resets the accumulator for the next iteration.
#[derive(Debug, Default)]
pub struct FixedVec3Accumulator {
    x: AtomicI64,
    y: AtomicI64,
    z: AtomicI64,
    count: AtomicU32,
}

impl FixedVec3Accumulator {
    /// Creates a zeroed accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically add one contribution.
    #[inline]
    pub fn add(&self, delta: Vec3) {
        self.x.fetch_add(encode(delta.x), Ordering::Relaxed);
        self.y.fetch_add(encode(delta.y), Ordering::Relaxed);
        self.z.fetch_add(encode(delta.z), Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of contributions since the last reset.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }

    /// Current decoded sum (not averaged).
    pub fn sum(&self) -> Vec3 {
        Vec3::new(
            decode(self.x.load(Ordering::Relaxed)),
            decode(self.y.load(Ordering::Relaxed)),
            decode(self.z.load(Ordering::Relaxed)),
        )
    }

    /// Returns `sum / count` and resets the accumulator.
    ///
    /// `None` when nothing was accumulated.
    pub fn take_average(&self) -> Option<Vec3> {
        let count = self.count.swap(0, Ordering::Relaxed);
        let sum = Vec3::new(
            decode(self.x.swap(0, Ordering::Relaxed)),
            decode(self.y.swap(0, Ordering::Relaxed)),
            decode(self.z.swap(0, Ordering::Relaxed)),
        );
        if count == 0 {
            None
        } else {
            Some(sum / count as f32)
        }
    }

    /// Clears the sum and counter.
    pub fn reset(&self) {
        self.x.store(0, Ordering::Relaxed);
        self.y.store(0, Ordering::Relaxed);
        self.z.store(0, Ordering::Relaxed);
        self.count.store(0, Ordering::Relaxed);
    }
}
