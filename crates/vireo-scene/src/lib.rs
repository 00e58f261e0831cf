//! # vireo-scene
//!
//! Scene graph and step scheduler. Nodes hold simulation components per
//! role; visitors walk the graph depth-first and invoke those components
//! in a fixed phase order.
//!
//! ## Key Types
//!
//! - [`SceneGraph`] / [`Node`] — arena of nodes with typed component slots
//! - [`Visitor`] — traversal trait with per-role hooks and subtree pruning
//! - [`AnimateVisitor`] / [`animate`] — one simulation step
//! - [`Simulation`] — repeated steps driven by a [`SimulationConfig`]
//! - [`MechanicalState`] — per-DOF positions, velocities, forces, constraint rows
//! - [`factory`] — per-role component registries and [`ComponentArgs`]

pub mod animate;
pub mod collision;
pub mod component;
pub mod config;
pub mod event;
pub mod factory;
pub mod mechanical;
pub mod node;
pub mod params;
pub mod report;
pub mod simulation;
pub mod state;
pub mod visitor;

pub use animate::{animate, validate_dt, AnimateVisitor};
pub use collision::CollisionVisitor;
pub use component::{
    BehaviorModel, CollisionPipeline, Component, ConstraintSet, InteractionForceField, OdeSolver,
};
pub use config::SimulationConfig;
pub use event::{PropagateEventVisitor, SceneEvent};
pub use factory::ComponentArgs;
pub use node::{Components, Node, SceneGraph};
pub use params::{ConstraintOrder, ConstraintParams, ExecParams, MatrixId, MechanicalParams, VecId};
pub use report::{ComponentFailure, StepReport};
pub use simulation::Simulation;
pub use state::{ConstraintRow, MechanicalState};
pub use visitor::{VisitResult, Visitor};
