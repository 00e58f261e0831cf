//! # vireo-telemetry
//!
//! Instrumentation sink for the step scheduler. The animate traversal
//! reports step and phase boundaries (collision, mechanical integration,
//! interaction forces) as structured events; pluggable sinks consume
//! them (tracing logs, in-memory capture for tests).
//!
//! Emission is infallible: a missing or disabled bus never changes the
//! outcome of a step.

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::{EventBus, PhaseGuard};
pub use events::{EventKind, SimulationEvent};
pub use sinks::{EventSink, TracingSink, VecSink};
