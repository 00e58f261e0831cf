//! # vireo-components
//!
//! Built-in simulation components and the startup sequence that makes
//! them reachable through the per-role factories.
//!
//! ## Key Types
//!
//! - [`EulerExplicitSolver`] — explicit Euler integrator (`"EulerExplicit"`)
//! - [`SpringForceField`] — Hooke spring between two DOFs (`"SpringForceField"`)
//! - [`GravityBehavior`] — gravity loading (`"Gravity"`)
//! - [`GroundPlanePipeline`] — ground plane collision (`"GroundPlane"`)
//! - [`FixedConstraint`] — holds DOFs in place (`"FixedConstraint"`)
//! - [`EventRecorder`] — records scene events
//! - [`register_builtins`] — registers all of the above, once

pub mod builtins;
pub mod euler;
pub mod fixed;
pub mod gravity;
pub mod ground_plane;
pub mod recorder;
pub mod spring;

pub use builtins::{keys, register_builtins};
pub use euler::EulerExplicitSolver;
pub use fixed::FixedConstraint;
pub use gravity::GravityBehavior;
pub use ground_plane::GroundPlanePipeline;
pub use recorder::EventRecorder;
pub use spring::SpringForceField;
