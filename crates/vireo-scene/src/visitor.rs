//! Visitor engine — depth-first traversal with pruning and role dispatch.
//!
//! ```text
//! visit(node):
//!   if !active || sleeping: prune          (no hook sees the node)
//!   result = visitor.process_node_top_down(node)
//!   if result == Continue:
//!     for child in children (insertion order): visit(child)
//!   visitor.process_node_bottom_up(node)
//! ```
//!
//! The default top-down step dispatches the per-role hooks for every
//! component on the node, in a fixed role order, and continues.

use vireo_types::{NodeId, VireoError, VireoResult};

use crate::component::{BehaviorModel, CollisionPipeline, InteractionForceField, OdeSolver};
use crate::node::SceneGraph;

/// Traversal control returned by a top-down hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitResult {
    /// Descend into the node's children.
    Continue,
    /// Skip the node's children.
    Prune,
}

/// A traversal algorithm over the scene graph.
///
/// Per-role hooks default to no-ops; components handed to a hook are
/// detached from their node for the duration of the call.
pub trait Visitor {
    fn name(&self) -> &str;

    /// Called before the node's children are visited.
    ///
    /// Default: dispatch behavior models, the collision pipeline,
    /// interaction force fields, then ODE solvers, and continue.
    fn process_node_top_down(&mut self, graph: &mut SceneGraph, node: NodeId) -> VisitResult {
        dispatch_roles(self, graph, node);
        VisitResult::Continue
    }

    /// Called after the node's children have been visited (or pruned).
    fn process_node_bottom_up(&mut self, graph: &mut SceneGraph, node: NodeId) {
        let _ = (graph, node);
    }

    fn process_behavior_model(
        &mut self,
        graph: &mut SceneGraph,
        node: NodeId,
        model: &mut dyn BehaviorModel,
    ) {
        let _ = (graph, node, model);
    }

    fn fwd_interaction_force_field(
        &mut self,
        graph: &mut SceneGraph,
        node: NodeId,
        ff: &mut dyn InteractionForceField,
    ) {
        let _ = (graph, node, ff);
    }

    fn process_collision_pipeline(
        &mut self,
        graph: &mut SceneGraph,
        node: NodeId,
        pipeline: &mut dyn CollisionPipeline,
    ) {
        let _ = (graph, node, pipeline);
    }

    fn process_ode_solver(&mut self, graph: &mut SceneGraph, node: NodeId, solver: &mut dyn OdeSolver) {
        let _ = (graph, node, solver);
    }

    /// Walks the subtree rooted at `root`.
    fn execute(&mut self, graph: &mut SceneGraph, root: NodeId) -> VireoResult<()> {
        if !graph.contains(root) {
            return Err(VireoError::UnknownNode(root));
        }
        visit(self, graph, root);
        Ok(())
    }
}

/// Recursive walk used by [`Visitor::execute`]. `node` must exist.
pub(crate) fn visit<V: Visitor + ?Sized>(visitor: &mut V, graph: &mut SceneGraph, node: NodeId) {
    let children = match graph.node(node) {
        Some(n) if n.is_visitable() => n.children().to_vec(),
        _ => return,
    };

    tracing::trace!(visitor = visitor.name(), node = %node, "visit");
    if visitor.process_node_top_down(graph, node) == VisitResult::Continue {
        for child in children {
            visit(visitor, graph, child);
        }
    }
    visitor.process_node_bottom_up(graph, node);
}

/// Dispatches every role hook for the components on `node`.
pub fn dispatch_roles<V: Visitor + ?Sized>(visitor: &mut V, graph: &mut SceneGraph, node: NodeId) {
    for_each_behavior_model(visitor, graph, node);
    for_each_collision_pipeline(visitor, graph, node);
    for_each_interaction_force_field(visitor, graph, node);
    for_each_ode_solver(visitor, graph, node);
}

/// Calls [`Visitor::process_behavior_model`] for each behavior model of
/// `node`, in insertion order.
pub fn for_each_behavior_model<V: Visitor + ?Sized>(visitor: &mut V, graph: &mut SceneGraph, node: NodeId) {
    graph.with_detached(node, |c| &mut c.behavior_models, |graph, models| {
        for model in models.iter_mut() {
            visitor.process_behavior_model(graph, node, model.as_mut());
        }
    });
}

pub fn for_each_collision_pipeline<V: Visitor + ?Sized>(
    visitor: &mut V,
    graph: &mut SceneGraph,
    node: NodeId,
) {
    graph.with_detached(node, |c| &mut c.collision_pipeline, |graph, pipeline| {
        if let Some(pipeline) = pipeline.as_mut() {
            visitor.process_collision_pipeline(graph, node, pipeline.as_mut());
        }
    });
}

pub fn for_each_interaction_force_field<V: Visitor + ?Sized>(
    visitor: &mut V,
    graph: &mut SceneGraph,
    node: NodeId,
) {
    graph.with_detached(node, |c| &mut c.interaction_force_fields, |graph, ffs| {
        for ff in ffs.iter_mut() {
            visitor.fwd_interaction_force_field(graph, node, ff.as_mut());
        }
    });
}

pub fn for_each_ode_solver<V: Visitor + ?Sized>(visitor: &mut V, graph: &mut SceneGraph, node: NodeId) {
    graph.with_detached(node, |c| &mut c.solvers, |graph, solvers| {
        for solver in solvers.iter_mut() {
            visitor.process_ode_solver(graph, node, solver.as_mut());
        }
    });
}
