//! Step outcome reporting.

use serde::{Deserialize, Serialize};
use vireo_types::{NodeId, VireoError};

/// A component that failed while being invoked during a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentFailure {
    pub node: NodeId,
    pub component: String,
    pub message: String,
}

impl ComponentFailure {
    pub fn new(node: NodeId, component: &str, error: &VireoError) -> Self {
        Self {
            node,
            component: component.to_string(),
            message: error.to_string(),
        }
    }
}

/// Counters and failures collected over one step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// Nodes that reached the animate top-down hook.
    pub nodes_visited: u32,
    /// Times the one-shot constraint reset fired (0 or 1).
    pub constraint_resets: u32,
    pub collision_passes: u32,
    /// Contacts reported by collision pipelines.
    pub contacts: usize,
    /// Nodes integrated as solver subtrees.
    pub integrated_nodes: u32,
    pub constraint_rows: u32,
    pub solver_invocations: u32,
    pub force_field_invocations: u32,
    pub behavior_model_updates: u32,
    pub failures: Vec<ComponentFailure>,
}

impl StepReport {
    /// Returns true if no component failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
