//! Scene graph — an arena of nodes with typed component slots.
//!
//! Nodes own their components; the graph owns the nodes. Parent links are
//! plain [`NodeId`]s, children keep insertion order. A node and everything
//! below it is skipped by every traversal while it is inactive or sleeping.

use vireo_types::constants::DEFAULT_DT;
use vireo_types::{NodeId, Scalar, VireoError, VireoResult};

use crate::component::{
    BehaviorModel, CollisionPipeline, Component, ConstraintSet, InteractionForceField, OdeSolver,
};
use crate::state::MechanicalState;

/// Component slots of one node, per role.
#[derive(Default)]
pub struct Components {
    pub mechanical_state: Option<MechanicalState>,
    /// ODE solvers, invoked in insertion order.
    pub solvers: Vec<Box<dyn OdeSolver>>,
    /// At most one collision pipeline.
    pub collision_pipeline: Option<Box<dyn CollisionPipeline>>,
    pub interaction_force_fields: Vec<Box<dyn InteractionForceField>>,
    pub behavior_models: Vec<Box<dyn BehaviorModel>>,
    pub constraints: Vec<Box<dyn ConstraintSet>>,
    /// Components that only listen to scene events.
    pub listeners: Vec<Box<dyn Component>>,
}

/// One element of the scene graph.
pub struct Node {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    active: bool,
    sleeping: bool,
    time: Scalar,
    dt: Scalar,
    components: Components,
}

impl Node {
    fn new(name: String, parent: Option<NodeId>) -> Self {
        Self {
            name,
            parent,
            children: Vec::new(),
            active: true,
            sleeping: false,
            time: 0.0,
            dt: DEFAULT_DT,
            components: Components::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    pub fn set_sleeping(&mut self, sleeping: bool) {
        self.sleeping = sleeping;
    }

    /// Returns true if traversals may enter this node.
    pub fn is_visitable(&self) -> bool {
        self.active && !self.sleeping
    }

    pub fn time(&self) -> Scalar {
        self.time
    }

    pub fn set_time(&mut self, time: Scalar) {
        self.time = time;
    }

    /// Local step size.
    pub fn dt(&self) -> Scalar {
        self.dt
    }

    pub fn set_dt(&mut self, dt: Scalar) {
        self.dt = dt;
    }

    // ─── Component slots ───

    pub fn components(&self) -> &Components {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut Components {
        &mut self.components
    }

    pub fn mechanical_state(&self) -> Option<&MechanicalState> {
        self.components.mechanical_state.as_ref()
    }

    pub fn mechanical_state_mut(&mut self) -> Option<&mut MechanicalState> {
        self.components.mechanical_state.as_mut()
    }

    pub fn set_mechanical_state(&mut self, state: MechanicalState) {
        self.components.mechanical_state = Some(state);
    }

    pub fn solvers(&self) -> &[Box<dyn OdeSolver>] {
        &self.components.solvers
    }

    pub fn has_solver(&self) -> bool {
        !self.components.solvers.is_empty()
    }

    pub fn add_solver(&mut self, solver: Box<dyn OdeSolver>) {
        self.components.solvers.push(solver);
    }

    pub fn collision_pipeline(&self) -> Option<&dyn CollisionPipeline> {
        self.components.collision_pipeline.as_deref()
    }

    /// Installs the node's collision pipeline, replacing any previous one.
    pub fn set_collision_pipeline(&mut self, pipeline: Box<dyn CollisionPipeline>) {
        if let Some(old) = self.components.collision_pipeline.as_ref() {
            tracing::warn!(
                node = %self.name,
                old = old.name(),
                new = pipeline.name(),
                "replacing collision pipeline"
            );
        }
        self.components.collision_pipeline = Some(pipeline);
    }

    pub fn interaction_force_fields(&self) -> &[Box<dyn InteractionForceField>] {
        &self.components.interaction_force_fields
    }

    pub fn add_interaction_force_field(&mut self, ff: Box<dyn InteractionForceField>) {
        self.components.interaction_force_fields.push(ff);
    }

    pub fn behavior_models(&self) -> &[Box<dyn BehaviorModel>] {
        &self.components.behavior_models
    }

    pub fn add_behavior_model(&mut self, model: Box<dyn BehaviorModel>) {
        self.components.behavior_models.push(model);
    }

    pub fn constraints(&self) -> &[Box<dyn ConstraintSet>] {
        &self.components.constraints
    }

    pub fn add_constraint(&mut self, constraint: Box<dyn ConstraintSet>) {
        self.components.constraints.push(constraint);
    }

    pub fn listeners(&self) -> &[Box<dyn Component>] {
        &self.components.listeners
    }

    pub fn add_listener(&mut self, listener: Box<dyn Component>) {
        self.components.listeners.push(listener);
    }
}

/// Arena-backed scene graph. Node 0 is the root.
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl SceneGraph {
    /// Creates a graph holding a single root node.
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node::new(root_name.into(), None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Appends a new child to `parent`.
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>) -> VireoResult<NodeId> {
        if !self.contains(parent) {
            return Err(VireoError::UnknownNode(parent));
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(name.into(), Some(parent)));
        self.nodes[parent.index()].children.push(id);
        Ok(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Like [`node_mut`](Self::node_mut), but unknown ids are an error.
    pub fn try_node_mut(&mut self, id: NodeId) -> VireoResult<&mut Node> {
        self.nodes.get_mut(id.index()).ok_or(VireoError::UnknownNode(id))
    }

    /// Finds the first node with `name`, in creation order.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name == name)
            .map(|i| NodeId(i as u32))
    }

    /// Number of nodes, the root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Visitable nodes of the subtree rooted at `root`, depth-first
    /// pre-order, skipping inactive and sleeping branches.
    pub fn subtree(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else { continue };
            if !node.is_visitable() {
                continue;
            }
            out.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Calls `f` on every mechanical state of the visitable subtree.
    pub fn for_each_state_mut(
        &mut self,
        root: NodeId,
        mut f: impl FnMut(NodeId, &mut MechanicalState),
    ) {
        for id in self.subtree(root) {
            if let Some(state) = self.nodes[id.index()].components.mechanical_state.as_mut() {
                f(id, state);
            }
        }
    }

    /// Runs `f` with one component slot of `id` detached from the node.
    ///
    /// The slot is re-attached when `f` returns, whatever `f` did. Adding
    /// components to the same slot from inside `f` is not supported.
    /// Unknown ids see an empty slot.
    pub(crate) fn with_detached<T: Default, R>(
        &mut self,
        id: NodeId,
        slot: fn(&mut Components) -> &mut T,
        f: impl FnOnce(&mut SceneGraph, &mut T) -> R,
    ) -> R {
        let Some(node) = self.nodes.get_mut(id.index()) else {
            return f(self, &mut T::default());
        };
        let mut detached = std::mem::take(slot(&mut node.components));
        let out = f(self, &mut detached);
        if let Some(node) = self.nodes.get_mut(id.index()) {
            *slot(&mut node.components) = detached;
        }
        out
    }
}
