//! Event bus: queue events during a tick, deliver them at its end.
//!
//! Events go onto an `mpsc` channel as they are emitted and reach the
//! registered sinks on [`EventBus::flush`], which the simulator calls
//! once per tick. Emitting therefore never runs sink code inside the
//! solver loop.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::events::{EventKind, SimulationEvent};
use crate::sinks::EventSink;

/// Simulation telemetry bus with pluggable sinks.
pub struct EventBus {
    queue: Sender<SimulationEvent>,
    pending: Receiver<SimulationEvent>,
    sinks: Vec<Box<dyn EventSink>>,
    /// A disabled bus drops events on emit.
    enabled: bool,
}

impl EventBus {
    pub fn new() -> Self {
        let (queue, pending) = mpsc::channel();
        Self {
            queue,
            pending,
            sinks: Vec::new(),
            enabled: true,
        }
    }

    /// Builder form of [`EventBus::add_sink`].
    pub fn with_sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.add_sink(sink);
        self
    }

    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        tracing::debug!(sink = sink.name(), "Telemetry sink registered");
        self.sinks.push(sink);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Queues `event` for the next flush.
    pub fn emit(&self, event: SimulationEvent) {
        if !self.enabled {
            return;
        }
        // The receiver lives in `self`, so the send cannot fail.
        let _ = self.queue.send(event);
    }

    /// Shorthand for `emit(SimulationEvent::new(tick, kind))`.
    pub fn emit_kind(&self, tick: u64, kind: EventKind) {
        self.emit(SimulationEvent::new(tick, kind));
    }

    /// Delivers every queued event to every sink, in emission order.
    pub fn flush(&mut self) {
        while let Ok(event) = self.pending.try_recv() {
            for sink in &mut self.sinks {
                sink.handle(&event);
            }
        }
    }

    /// Flushes, then lets each sink finish its output.
    pub fn finalize(&mut self) {
        self.flush();
        for sink in &mut self.sinks {
            sink.finalize();
        }
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
