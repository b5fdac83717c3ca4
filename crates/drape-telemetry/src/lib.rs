//! # drape-telemetry
//!
//! Event bus for simulation telemetry. Emits structured events
//! (tick timing, collision binning, buffer growth, resets) that are
//! consumed by pluggable sinks (in-memory, `tracing`).

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::EventBus;
pub use events::{EventKind, SimulationEvent};
pub use sinks::{EventSink, TracingSink, VecSink};
