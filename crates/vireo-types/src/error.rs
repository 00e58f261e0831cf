//! Error types for the Vireo core.
//!
//! All crates return `VireoResult<T>` from fallible operations.
//! Registration conflicts and unknown factory keys are not errors:
//! they surface as `bool` / `Option` results from the registry.

use thiserror::Error;

use crate::ids::NodeId;

/// Unified error type for the Vireo core.
#[derive(Debug, Error)]
pub enum VireoError {
    /// A caller-supplied argument is out of its valid range (e.g. negative `dt`).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A node id does not belong to the scene graph.
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    /// A component required by an operation is absent.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// A simulation component reported a failure while being invoked.
    #[error("Component '{component}' failed: {message}")]
    Component {
        component: String,
        message: String,
    },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl VireoError {
    /// Shorthand for a [`VireoError::Component`] failure.
    pub fn component(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Component {
            component: component.into(),
            message: message.into(),
        }
    }
}

/// Convenience alias for `Result<T, VireoError>`.
pub type VireoResult<T> = Result<T, VireoError>;
