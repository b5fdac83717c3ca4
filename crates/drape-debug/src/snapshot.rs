//! State snapshot serialization for replay and debugging.
//!
//! Snapshots capture the garment state at a point in time,
//! enabling replay and diff-based debugging.

use std::path::Path;

use serde::{Deserialize, Serialize};

use drape_garment::GarmentState;
use drape_math::Vec3;
use drape_types::{DrapeError, DrapeResult};

/// A garment state snapshot.
///
/// Serialized with `bincode` for compact binary output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Tick index when this snapshot was taken.
    pub tick: u64,
    /// Simulation time in seconds.
    pub sim_time: f64,
    /// Vertex positions, garment-local.
    pub positions: Vec<Vec3>,
    /// Vertex velocities.
    pub velocities: Vec<Vec3>,
}

impl StateSnapshot {
    /// Captures positions and velocities of `state`.
    pub fn capture(tick: u64, sim_time: f64, state: &GarmentState) -> Self {
        Self {
            tick,
            sim_time,
            positions: state.positions.clone(),
            velocities: state.velocities.clone(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Largest per-vertex position difference to `other`.
    ///
    /// `None` when the vertex counts differ.
    pub fn max_position_delta(&self, other: &StateSnapshot) -> Option<f32> {
        if self.positions.len() != other.positions.len() {
            return None;
        }
        Some(
            self.positions
                .iter()
                .zip(&other.positions)
                .map(|(a, b)| a.distance(*b))
                .fold(0.0f32, f32::max),
        )
    }

    /// Serializes to compact binary format.
    pub fn to_bytes(&self) -> DrapeResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| DrapeError::Serialization(e.to_string()))
    }

    /// Deserializes from binary format.
    pub fn from_bytes(data: &[u8]) -> DrapeResult<Self> {
        let snapshot: Self = bincode::deserialize(data)
            .map_err(|e| DrapeError::Serialization(format!("Snapshot deserialization failed: {e}")))?;
        if snapshot.positions.len() != snapshot.velocities.len() {
            return Err(DrapeError::Serialization(format!(
                "Snapshot has {} positions but {} velocities",
                snapshot.positions.len(),
                snapshot.velocities.len()
            )));
        }
        Ok(snapshot)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> DrapeResult<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> DrapeResult<Self> {
        Self::from_bytes(&std::fs::read(path)?)
    }
}
