//! Scene events and their broadcast traversal.
//!
//! Events are fire-and-forget: every component of every visited node
//! sees the event, nothing is returned, and inactive or sleeping
//! subtrees are skipped like in any other traversal.

use serde::{Deserialize, Serialize};
use vireo_types::NodeId;

use crate::component::Component;
use crate::node::SceneGraph;
use crate::visitor::{VisitResult, Visitor};

/// Typed notification broadcast down a subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneEvent {
    CollisionBegin,
    CollisionEnd,
    IntegrateBegin,
    IntegrateEnd,
}

impl SceneEvent {
    pub fn name(self) -> &'static str {
        match self {
            Self::CollisionBegin => "CollisionBeginEvent",
            Self::CollisionEnd => "CollisionEndEvent",
            Self::IntegrateBegin => "IntegrateBeginEvent",
            Self::IntegrateEnd => "IntegrateEndEvent",
        }
    }
}

/// Delivers one event to every component in a subtree.
///
/// Within a node, delivery follows a fixed role order: ODE solvers,
/// collision pipeline, interaction force fields, behavior models,
/// constraint sets, then plain listeners.
pub struct PropagateEventVisitor {
    event: SceneEvent,
    delivered: usize,
}

impl PropagateEventVisitor {
    pub fn new(event: SceneEvent) -> Self {
        Self {
            event,
            delivered: 0,
        }
    }

    /// Number of components that received the event.
    pub fn delivered(&self) -> usize {
        self.delivered
    }
}

impl Visitor for PropagateEventVisitor {
    fn name(&self) -> &str {
        "PropagateEventVisitor"
    }

    fn process_node_top_down(&mut self, graph: &mut SceneGraph, node: NodeId) -> VisitResult {
        let event = self.event;
        let Some(n) = graph.node_mut(node) else {
            return VisitResult::Prune;
        };
        let components = n.components_mut();
        let mut delivered = 0;

        for solver in &mut components.solvers {
            solver.handle_event(&event);
            delivered += 1;
        }
        if let Some(pipeline) = components.collision_pipeline.as_mut() {
            pipeline.handle_event(&event);
            delivered += 1;
        }
        for ff in &mut components.interaction_force_fields {
            ff.handle_event(&event);
            delivered += 1;
        }
        for model in &mut components.behavior_models {
            model.handle_event(&event);
            delivered += 1;
        }
        for constraint in &mut components.constraints {
            constraint.handle_event(&event);
            delivered += 1;
        }
        for listener in &mut components.listeners {
            listener.handle_event(&event);
            delivered += 1;
        }

        self.delivered += delivered;
        VisitResult::Continue
    }
}
