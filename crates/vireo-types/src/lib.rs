//! # vireo-types
//!
//! Shared types, identifiers, error types, and simulation constants
//! for the Vireo scene-graph scheduling core.
//!
//! This crate has zero domain logic — it defines the vocabulary
//! that all other Vireo crates share.

pub mod constants;
pub mod error;
pub mod ids;
pub mod scalar;

pub use error::{VireoError, VireoResult};
pub use ids::{ConstraintId, NodeId};
pub use scalar::Scalar;
