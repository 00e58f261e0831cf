//! Simulation event types.
//!
//! Structured events emitted by the scheduler at step and phase
//! boundaries. Events are lightweight value types that carry just
//! enough data to be useful for profiling and debugging.

use serde::{Deserialize, Serialize};
use vireo_types::NodeId;

/// A simulation event emitted by the scheduler.
///
/// Events are tagged with a timestep index and carry phase-specific data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEvent {
    /// Timestep number (0-indexed).
    pub timestep: u64,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// Step started.
    StepBegin {
        /// Simulation time of the root before the step (seconds).
        sim_time: f64,
        /// Requested step size (0 means per-node step sizes).
        dt: f64,
    },

    /// Step completed.
    StepEnd {
        /// Wall-clock time for the entire step (seconds).
        wall_time: f64,
    },

    /// A named phase started on a node.
    PhaseBegin {
        /// Phase label ("Collision", "Mechanical", ...).
        phase: String,
        node: NodeId,
    },

    /// A named phase finished on a node.
    PhaseEnd {
        phase: String,
        node: NodeId,
        /// Wall-clock time spent in the phase (seconds).
        wall_time: f64,
    },

    /// A component failed while being invoked. The step carried on.
    ComponentFailure {
        /// Component name.
        component: String,
        node: NodeId,
        message: String,
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
    /// Creates a new event for the given timestep.
    pub fn new(timestep: u64, kind: EventKind) -> Self {
        Self { timestep, kind }
    }
}
