//! Pluggable event sinks.

use std::sync::{Arc, Mutex};

use tracing::Level;

use crate::events::{EventKind, SimulationEvent};

/// Trait for event consumers.
///
/// Implement this to create custom telemetry outputs.
pub trait EventSink: Send {
    /// Process a single event.
    fn handle(&mut self, event: &SimulationEvent);

    /// Called when the simulation ends. Flush buffers, close files, etc.
    fn finalize(&mut self) {}

    /// Returns a human-readable name for this sink.
    fn name(&self) -> &str;
}

/// Collects events in memory.
///
/// Clones share the same storage, so a clone kept by the caller can
/// inspect what the boxed sink on the bus received.
#[derive(Debug, Clone, Default)]
pub struct VecSink {
    events: Arc<Mutex<Vec<SimulationEvent>>>,
}

impl VecSink {
    /// Creates an empty vec sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the collected events.
    pub fn events(&self) -> Vec<SimulationEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for VecSink {
    fn handle(&mut self, event: &SimulationEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }

    fn name(&self) -> &str {
        "vec_sink"
    }
}

/// Forwards events to `tracing`.
///
/// Per-sub-step events go out at `DEBUG`; everything else at the
/// sink's configured level.
pub struct TracingSink {
    level: Level,
}

impl TracingSink {
    /// Creates a new tracing sink at the given log level.
    pub fn new(level: Level) -> Self {
        Self { level }
    }
}

impl EventSink for TracingSink {
    fn handle(&mut self, event: &SimulationEvent) {
        let level = match event.kind {
            EventKind::Substep { .. } | EventKind::CollisionBinning { .. } => Level::DEBUG,
            _ => self.level,
        };
        match level {
            Level::ERROR => tracing::error!(tick = event.tick, event = ?event.kind, "simulation_event"),
            Level::WARN => tracing::warn!(tick = event.tick, event = ?event.kind, "simulation_event"),
            Level::INFO => tracing::info!(tick = event.tick, event = ?event.kind, "simulation_event"),
            Level::DEBUG => tracing::debug!(tick = event.tick, event = ?event.kind, "simulation_event"),
            _ => tracing::trace!(tick = event.tick, event = ?event.kind, "simulation_event"),
        }
    }

    fn name(&self) -> &str {
        "tracing_sink"
    }
}
