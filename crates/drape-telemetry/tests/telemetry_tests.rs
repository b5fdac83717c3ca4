//! Integration tests for drape-telemetry.

use drape_telemetry::bus::EventBus;
use drape_telemetry::events::{EventKind, SimulationEvent};
use drape_telemetry::sinks::{TracingSink, VecSink};

#[test]
fn emit_and_flush() {
    let mut bus = EventBus::new();
    let sink = VecSink::new();
    bus.add_sink(Box::new(sink.clone()));

    bus.emit(SimulationEvent::new(0, EventKind::TickBegin { dt: 1.0 / 60.0 }));
    bus.emit(SimulationEvent::new(
        0,
        EventKind::TickEnd {
            wall_time: 0.001,
            kinetic_energy: 0.0,
        },
    ));
    assert!(sink.is_empty());

    bus.flush();
    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0].kind, EventKind::TickBegin { .. }));
}

#[test]
fn disabled_bus_drops_events() {
    let mut bus = EventBus::new();
    let sink = VecSink::new();
    bus.add_sink(Box::new(sink.clone()));
    bus.set_enabled(false);
    bus.emit(SimulationEvent::new(0, EventKind::BufferGrowth { capacity: 8 }));
    bus.flush();
    assert!(sink.is_empty());
}

#[test]
fn multiple_sinks_each_receive() {
    let mut bus = EventBus::new();
    let a = VecSink::new();
    let b = VecSink::new();
    bus.add_sink(Box::new(a.clone()));
    bus.add_sink(Box::new(b.clone()));
    bus.add_sink(Box::new(TracingSink::new(tracing::Level::INFO)));
    assert_eq!(bus.sink_count(), 3);

    bus.emit(SimulationEvent::new(3, EventKind::PositionReset { vertices: 9 }));
    bus.finalize();
    assert_eq!(a.len(), 1);
    assert_eq!(b.events(), a.events());
}

#[test]
fn event_serialization() {
    let event = SimulationEvent::new(
        5,
        EventKind::CollisionBinning {
            active_voxels: 12,
            triangle_refs: 40,
            contacts: 3,
        },
    );
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("triangle_refs"));
    let recovered: SimulationEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered, event);
}
