//! Deferred position reset.
//!
//! Snapping a garment onto its skinned pose needs a skinned vertex stream
//! that reflects the latest blend-shape weights. The host renderer only
//! produces that a few frames after the weights were pushed, so a request
//! arms the reset and the snap happens once the settle time has passed
//! and the stream is available.

use std::time::{Duration, Instant};

use drape_math::{Mat4, Vec3};
use drape_mesh::SkinSource;
use drape_types::constants::RESET_SETTLE_MS;
use drape_types::{DrapeError, DrapeResult};

/// Armed/disarmed state of a pending position reset.
#[derive(Debug, Clone, Default)]
pub struct PositionReset {
    requested_at: Option<Instant>,
}

impl PositionReset {
    pub fn settle_time() -> Duration {
        Duration::from_millis(RESET_SETTLE_MS)
    }

    /// Arms the reset at `now`. A later request restarts the settle window.
    pub fn request(&mut self, now: Instant) {
        self.requested_at = Some(now);
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.requested_at.is_some()
    }

    /// True when armed and the settle time has elapsed at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        self.requested_at
            .is_some_and(|at| now.saturating_duration_since(at) >= Self::settle_time())
    }

    /// Writes the skinned pose into `positions` if the reset is due.
    ///
    /// Each position becomes `world_to_garment · TRS(root, 1) · skinned[i]`.
    /// Returns `Ok(false)` (and stays armed) when not yet due or when the
    /// skin stream is unavailable; disarms after a successful snap.
    pub fn apply_if_due(
        &mut self,
        skin: Option<&dyn SkinSource>,
        world_to_garment: &Mat4,
        now: Instant,
        positions: &mut [Vec3],
    ) -> DrapeResult<bool> {
        if !self.is_due(now) {
            return Ok(false);
        }
        let Some(skin) = skin else {
            tracing::trace!("Position reset pending: no garment skin attached");
            return Ok(false);
        };
        let Some(skinned) = skin.skinned_positions() else {
            tracing::trace!("Position reset pending: skin stream not ready");
            return Ok(false);
        };
        if skinned.len() != positions.len() {
            return Err(DrapeError::InvalidMesh(format!(
                "Skinned garment has {} vertices, expected {}",
                skinned.len(),
                positions.len()
            )));
        }

        let transform = *world_to_garment * skin.root_transform().to_matrix();
        for (p, &s) in positions.iter_mut().zip(skinned) {
            *p = transform.transform_point3(s);
        }

        self.requested_at = None;
        Ok(true)
    }
}
