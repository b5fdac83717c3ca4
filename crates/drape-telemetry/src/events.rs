//! Simulation event types.
//!
//! Structured events emitted by the simulator at fixed points of each
//! tick. Events are small value types carrying just enough data for
//! monitoring and debugging.

use serde::{Deserialize, Serialize};

/// A simulation event emitted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEvent {
    /// Tick number (0-indexed).
    pub tick: u64,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// Tick started.
    TickBegin {
        /// Frame time handed to the tick (seconds).
        dt: f32,
    },

    /// Tick completed.
    TickEnd {
        /// Wall-clock time for the whole tick (seconds).
        wall_time: f64,
        /// Kinetic energy of the garment after the tick.
        kinetic_energy: f32,
    },

    /// One solver sub-step completed.
    Substep {
        /// Sub-step index within the tick.
        index: u32,
        /// Constraint iterations run.
        iterations: u32,
        /// Wall-clock time (seconds).
        wall_time: f64,
    },

    /// Body triangles binned and contacts resolved.
    CollisionBinning {
        active_voxels: usize,
        triangle_refs: usize,
        contacts: usize,
    },

    /// The sorted body-triangle buffer was reallocated.
    BufferGrowth {
        capacity: usize,
    },

    /// Blend-shape weights changed and rest lengths were recomputed.
    RestShapeRecomputed {
        edges: usize,
    },

    /// The garment was snapped onto its skinned pose.
    PositionReset {
        vertices: usize,
    },

    /// Custom event for extensibility.
    Custom {
        /// Arbitrary label.
        label: String,
        /// JSON-encoded payload.
        payload: String,
    },
}

impl SimulationEvent {
    /// Creates a new event for the given tick.
    pub fn new(tick: u64, kind: EventKind) -> Self {
        Self { tick, kind }
    }
}
