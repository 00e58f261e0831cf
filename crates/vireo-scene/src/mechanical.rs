//! Mechanical traversals used around a solver invocation.
//!
//! Each visitor touches the mechanical state and constraint sets of every
//! visitable node in the subtree it is executed on.

use vireo_types::{NodeId, Scalar};

use crate::component::ConstraintSet;
use crate::node::SceneGraph;
use crate::params::{ConstraintParams, MatrixId};
use crate::visitor::{VisitResult, Visitor};

/// Discards accumulated constraint rows.
#[derive(Default)]
pub struct ResetConstraintVisitor;

impl ResetConstraintVisitor {
    pub fn new() -> Self {
        Self
    }
}

impl Visitor for ResetConstraintVisitor {
    fn name(&self) -> &str {
        "ResetConstraintVisitor"
    }

    fn process_node_top_down(&mut self, graph: &mut SceneGraph, node: NodeId) -> VisitResult {
        if let Some(n) = graph.node_mut(node) {
            let components = n.components_mut();
            if let Some(state) = components.mechanical_state.as_mut() {
                state.reset_constraints();
            }
            for constraint in &mut components.constraints {
                constraint.reset_constraint();
            }
        }
        tracing::trace!(node = %node, "constraints reset");
        VisitResult::Continue
    }
}

/// Opens the integration step on every mechanical state.
pub struct BeginIntegrationVisitor {
    dt: Scalar,
}

impl BeginIntegrationVisitor {
    pub fn new(dt: Scalar) -> Self {
        Self { dt }
    }
}

impl Visitor for BeginIntegrationVisitor {
    fn name(&self) -> &str {
        "BeginIntegrationVisitor"
    }

    fn process_node_top_down(&mut self, graph: &mut SceneGraph, node: NodeId) -> VisitResult {
        if let Some(state) = graph.node_mut(node).and_then(|n| n.mechanical_state_mut()) {
            state.begin_integration(self.dt);
        }
        VisitResult::Continue
    }
}

/// Closes the integration step on every mechanical state.
pub struct EndIntegrationVisitor {
    dt: Scalar,
}

impl EndIntegrationVisitor {
    pub fn new(dt: Scalar) -> Self {
        Self { dt }
    }
}

impl Visitor for EndIntegrationVisitor {
    fn name(&self) -> &str {
        "EndIntegrationVisitor"
    }

    fn process_node_top_down(&mut self, graph: &mut SceneGraph, node: NodeId) -> VisitResult {
        if let Some(state) = graph.node_mut(node).and_then(|n| n.mechanical_state_mut()) {
            state.end_integration(self.dt);
        }
        VisitResult::Continue
    }
}

/// Collects constraint rows into each node's mechanical state.
///
/// Row ids are drawn from one counter that starts at 0 for the subtree the
/// visitor is executed on.
pub struct AccumulateConstraintVisitor {
    cparams: ConstraintParams,
    matrix: MatrixId,
    next_id: u32,
}

impl AccumulateConstraintVisitor {
    pub fn new(cparams: ConstraintParams, matrix: MatrixId) -> Self {
        Self {
            cparams,
            matrix,
            next_id: 0,
        }
    }

    /// Number of constraint rows emitted so far.
    pub fn constraint_count(&self) -> u32 {
        self.next_id
    }
}

impl Visitor for AccumulateConstraintVisitor {
    fn name(&self) -> &str {
        "AccumulateConstraintVisitor"
    }

    fn process_node_top_down(&mut self, graph: &mut SceneGraph, node: NodeId) -> VisitResult {
        let Some(n) = graph.node_mut(node) else {
            return VisitResult::Prune;
        };
        let components = n.components_mut();
        let Some(state) = components.mechanical_state.as_mut() else {
            return VisitResult::Continue;
        };
        for constraint in &mut components.constraints {
            constraint.build_constraint_matrix(state, &self.cparams, self.matrix, &mut self.next_id);
        }
        VisitResult::Continue
    }
}

/// Stamps positions and velocities, and node time, with the end-of-step time.
pub struct PropagatePositionAndVelocityVisitor {
    time: Scalar,
}

impl PropagatePositionAndVelocityVisitor {
    pub fn new(time: Scalar) -> Self {
        Self { time }
    }
}

impl Visitor for PropagatePositionAndVelocityVisitor {
    fn name(&self) -> &str {
        "PropagatePositionAndVelocityVisitor"
    }

    fn process_node_top_down(&mut self, graph: &mut SceneGraph, node: NodeId) -> VisitResult {
        if let Some(n) = graph.node_mut(node) {
            n.set_time(self.time);
            if let Some(state) = n.mechanical_state_mut() {
                state.propagate(self.time);
            }
        }
        VisitResult::Continue
    }
}

/// Sets the time of every visitable node.
pub struct UpdateTimeVisitor {
    time: Scalar,
}

impl UpdateTimeVisitor {
    pub fn new(time: Scalar) -> Self {
        Self { time }
    }
}

impl Visitor for UpdateTimeVisitor {
    fn name(&self) -> &str {
        "UpdateTimeVisitor"
    }

    fn process_node_top_down(&mut self, graph: &mut SceneGraph, node: NodeId) -> VisitResult {
        if let Some(n) = graph.node_mut(node) {
            n.set_time(self.time);
        }
        VisitResult::Continue
    }
}
