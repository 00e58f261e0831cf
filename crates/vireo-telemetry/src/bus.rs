//! Event bus — broadcast-style event dispatch with pluggable sinks.
//!
//! The bus uses `std::sync::mpsc` so producers only need a shared
//! reference. Sinks are registered once at initialization and receive
//! events when the bus is flushed.

use std::sync::mpsc;
use std::time::Instant;

use vireo_types::NodeId;

use crate::events::{EventKind, SimulationEvent};
use crate::sinks::EventSink;

/// Broadcast event bus for scheduler telemetry.
///
/// The producer side (`emit`) queues events; `flush` hands them to every
/// registered sink in registration order.
pub struct EventBus {
    sender: mpsc::Sender<SimulationEvent>,
    receiver: mpsc::Receiver<SimulationEvent>,
    sinks: Vec<Box<dyn EventSink>>,
    /// Disabled bus is a no-op.
    enabled: bool,
}

impl EventBus {
    /// Creates a new event bus with no sinks.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            sinks: Vec::new(),
            enabled: true,
        }
    }

    /// Registers a sink to receive events.
    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Enables or disables the bus. Disabled bus drops events silently.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns true if the bus is active.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Emit an event. If the bus is disabled, this is a no-op.
    pub fn emit(&self, event: SimulationEvent) {
        if !self.enabled {
            return;
        }
        // The receiver lives as long as the bus, so this cannot fail.
        let _ = self.sender.send(event);
    }

    /// Starts a timed phase; the matching `PhaseEnd` is emitted when the
    /// returned guard drops.
    pub fn phase(&self, timestep: u64, phase: &'static str, node: NodeId) -> PhaseGuard<'_> {
        self.emit(SimulationEvent::new(
            timestep,
            EventKind::PhaseBegin {
                phase: phase.to_string(),
                node,
            },
        ));
        PhaseGuard {
            bus: self,
            timestep,
            phase,
            node,
            start: Instant::now(),
        }
    }

    /// Flush all pending events to registered sinks.
    ///
    /// Call this at the end of each step or at shutdown.
    pub fn flush(&mut self) {
        while let Ok(event) = self.receiver.try_recv() {
            for sink in &mut self.sinks {
                sink.handle(&event);
            }
        }
    }

    /// Flushes pending events, then lets every sink finalize.
    pub fn finalize(&mut self) {
        self.flush();
        for sink in &mut self.sinks {
            sink.finalize();
        }
    }

    /// Returns the number of registered sinks.
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Open phase on an [`EventBus`]. Emits `PhaseEnd` on drop.
pub struct PhaseGuard<'a> {
    bus: &'a EventBus,
    timestep: u64,
    phase: &'static str,
    node: NodeId,
    start: Instant,
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.bus.emit(SimulationEvent::new(
            self.timestep,
            EventKind::PhaseEnd {
                phase: self.phase.to_string(),
                node: self.node,
                wall_time: self.start.elapsed().as_secs_f64(),
            },
        ));
    }
}
