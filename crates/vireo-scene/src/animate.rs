//! Animate traversal — one simulation step over a scene graph.
//!
//! Phase order on every visited node:
//!
//! ```text
//! [first node only] reset constraints of the whole subtree
//! collision          (node owns a pipeline)
//! dt resolution      (visitor dt == 0 ? adopt node dt : push dt onto node)
//! if node owns solvers:
//!     IntegrateBegin event → begin integration → accumulate constraints
//!     → each solver, in order → propagate position/velocity to t + dt
//!     → end integration → IntegrateEnd event → prune
//! else:
//!     interaction force fields → behavior models → continue
//! ```
//!
//! A solver subtree is integrated as a unit: its children are not visited
//! separately, so their force fields are left to the solver.

use std::time::Instant;

use vireo_telemetry::{EventBus, EventKind, PhaseGuard, SimulationEvent};
use vireo_types::{NodeId, Scalar, VireoError, VireoResult};

use crate::collision::CollisionVisitor;
use crate::component::{BehaviorModel, Component, InteractionForceField, OdeSolver};
use crate::event::{PropagateEventVisitor, SceneEvent};
use crate::mechanical::{
    AccumulateConstraintVisitor, BeginIntegrationVisitor, EndIntegrationVisitor,
    PropagatePositionAndVelocityVisitor, ResetConstraintVisitor,
};
use crate::node::{Node, SceneGraph};
use crate::params::{ConstraintParams, ExecParams, MatrixId, MechanicalParams, VecId};
use crate::report::{ComponentFailure, StepReport};
use crate::visitor::{
    for_each_behavior_model, for_each_interaction_force_field, for_each_ode_solver, visit,
    VisitResult, Visitor,
};

/// Rejects negative and non-finite step sizes.
pub fn validate_dt(dt: Scalar) -> VireoResult<()> {
    if !dt.is_finite() || dt < 0.0 {
        return Err(VireoError::InvalidArgument(format!(
            "time step must be finite and >= 0, got {dt}"
        )));
    }
    Ok(())
}

/// Advances a scene graph by one step.
///
/// `dt == 0` means every subtree uses the step size stored on its nodes.
/// Component failures do not fail the step; they are listed in the
/// returned report.
pub fn animate(
    graph: &mut SceneGraph,
    root: NodeId,
    exec: &ExecParams,
    dt: Scalar,
    bus: Option<&EventBus>,
) -> VireoResult<StepReport> {
    validate_dt(dt)?;
    let sim_time = graph.node(root).map(Node::time).ok_or(VireoError::UnknownNode(root))?;

    let start = Instant::now();
    if let Some(bus) = bus {
        bus.emit(SimulationEvent::new(exec.timestep, EventKind::StepBegin { sim_time, dt }));
    }

    let mut visitor = AnimateVisitor::new(*exec, dt)?;
    if let Some(bus) = bus {
        visitor = visitor.with_bus(bus);
    }
    let report = visitor.run(graph, root)?;

    if let Some(bus) = bus {
        bus.emit(SimulationEvent::new(
            exec.timestep,
            EventKind::StepEnd {
                wall_time: start.elapsed().as_secs_f64(),
            },
        ));
    }
    tracing::debug!(
        timestep = exec.timestep,
        nodes = report.nodes_visited,
        solvers = report.solver_invocations,
        failures = report.failures.len(),
        "step complete"
    );
    Ok(report)
}

/// The step traversal. Consumed by [`run`](Self::run), so its transient
/// state (first-node flag, counters) never outlives one step.
pub struct AnimateVisitor<'a> {
    exec: ExecParams,
    dt: Scalar,
    first_node_visited: bool,
    bus: Option<&'a EventBus>,
    report: StepReport,
}

impl<'a> AnimateVisitor<'a> {
    /// Visitor applying `dt` to every node it reaches.
    pub fn new(exec: ExecParams, dt: Scalar) -> VireoResult<Self> {
        validate_dt(dt)?;
        Ok(Self {
            exec,
            dt,
            first_node_visited: false,
            bus: None,
            report: StepReport::default(),
        })
    }

    /// Visitor adopting the step size stored on the first node it reaches.
    ///
    /// Once adopted, that value is written to every node visited after it,
    /// so deeper nodes inherit it instead of using their own stored dt.
    pub fn with_node_dt(exec: ExecParams) -> Self {
        Self {
            exec,
            dt: 0.0,
            first_node_visited: false,
            bus: None,
            report: StepReport::default(),
        }
    }

    /// Reports phase timings to `bus`.
    pub fn with_bus(mut self, bus: &'a EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Current step size (changes once a node's dt has been adopted).
    pub fn dt(&self) -> Scalar {
        self.dt
    }

    /// Runs the step from `root` and returns what happened.
    pub fn run(mut self, graph: &mut SceneGraph, root: NodeId) -> VireoResult<StepReport> {
        self.execute(graph, root)?;
        Ok(self.report)
    }

    fn phase(&self, phase: &'static str, node: NodeId) -> Option<PhaseGuard<'a>> {
        self.bus.map(|bus| bus.phase(self.exec.timestep, phase, node))
    }

    fn record_failure(&mut self, failure: ComponentFailure) {
        tracing::warn!(
            node = %failure.node,
            component = %failure.component,
            "component failed: {}",
            failure.message
        );
        if let Some(bus) = self.bus {
            bus.emit(SimulationEvent::new(
                self.exec.timestep,
                EventKind::ComponentFailure {
                    component: failure.component.clone(),
                    node: failure.node,
                    message: failure.message.clone(),
                },
            ));
        }
        self.report.failures.push(failure);
    }

    fn broadcast(&self, graph: &mut SceneGraph, node: NodeId, event: SceneEvent, label: &'static str) {
        let _timer = self.phase(label, node);
        visit(&mut PropagateEventVisitor::new(event), graph, node);
    }

    fn reset_constraints(&mut self, graph: &mut SceneGraph, node: NodeId) {
        visit(&mut ResetConstraintVisitor::new(), graph, node);
        self.report.constraint_resets += 1;
    }

    fn collision_phase(&mut self, graph: &mut SceneGraph, node: NodeId) {
        let _timer = self.phase("Collision", node);
        self.broadcast(graph, node, SceneEvent::CollisionBegin, "begin collision");

        let mut collision = CollisionVisitor::new();
        visit(&mut collision, graph, node);
        self.report.collision_passes += collision.passes();
        self.report.contacts += collision.contacts();
        for failure in collision.into_failures() {
            self.record_failure(failure);
        }

        self.broadcast(graph, node, SceneEvent::CollisionEnd, "end collision");
    }

    fn resolve_dt(&mut self, graph: &mut SceneGraph, node: NodeId) {
        let Some(n) = graph.node_mut(node) else { return };
        if self.dt != 0.0 {
            n.set_dt(self.dt);
            return;
        }
        let local = n.dt();
        if let Err(e) = validate_dt(local) {
            self.record_failure(ComponentFailure::new(node, "node", &e));
            return;
        }
        self.dt = local;
    }

    fn integrate(&mut self, graph: &mut SceneGraph, node: NodeId) {
        let _timer = self.phase("Mechanical", node);
        let dt = self.dt;
        let next_time = graph.node(node).map_or(0.0, Node::time) + dt;

        self.broadcast(graph, node, SceneEvent::IntegrateBegin, "begin integration");
        visit(&mut BeginIntegrationVisitor::new(dt), graph, node);

        let mut accumulate = AccumulateConstraintVisitor::new(
            ConstraintParams::from_exec(&self.exec),
            MatrixId::HolonomicC,
        );
        visit(&mut accumulate, graph, node);
        self.report.constraint_rows += accumulate.constraint_count();

        for_each_ode_solver(self, graph, node);

        visit(&mut PropagatePositionAndVelocityVisitor::new(next_time), graph, node);
        visit(&mut EndIntegrationVisitor::new(dt), graph, node);
        self.broadcast(graph, node, SceneEvent::IntegrateEnd, "end integration");
        self.report.integrated_nodes += 1;
    }
}

impl Visitor for AnimateVisitor<'_> {
    fn name(&self) -> &str {
        "AnimateVisitor"
    }

    fn process_node_top_down(&mut self, graph: &mut SceneGraph, node: NodeId) -> VisitResult {
        let Some((has_pipeline, has_solver, has_state)) = graph.node(node).map(|n| {
            (
                n.collision_pipeline().is_some(),
                n.has_solver(),
                n.mechanical_state().is_some(),
            )
        }) else {
            return VisitResult::Prune;
        };
        self.report.nodes_visited += 1;

        if !self.first_node_visited {
            self.first_node_visited = true;
            self.reset_constraints(graph, node);
        }

        if has_pipeline {
            self.collision_phase(graph, node);
        }

        self.resolve_dt(graph, node);

        if has_solver {
            self.integrate(graph, node);
            return VisitResult::Prune;
        }

        if has_state {
            tracing::debug!(node = %node, "mechanical state without solver, applying forces only");
        }
        for_each_interaction_force_field(self, graph, node);
        for_each_behavior_model(self, graph, node);
        VisitResult::Continue
    }

    fn process_ode_solver(&mut self, graph: &mut SceneGraph, node: NodeId, solver: &mut dyn OdeSolver) {
        let _timer = self.phase("OdeSolver", node);
        self.report.solver_invocations += 1;
        if let Err(e) = solver.solve(graph, node, &self.exec, self.dt) {
            self.record_failure(ComponentFailure::new(node, solver.name(), &e));
        }
    }

    fn fwd_interaction_force_field(
        &mut self,
        graph: &mut SceneGraph,
        node: NodeId,
        ff: &mut dyn InteractionForceField,
    ) {
        let _timer = self.phase("InteractionFF", node);
        self.report.force_field_invocations += 1;
        let mparams = MechanicalParams::from_exec(&self.exec, self.dt);
        if let Err(e) = ff.add_force(graph, node, &mparams, VecId::ExternalForce) {
            self.record_failure(ComponentFailure::new(node, ff.name(), &e));
        }
    }

    fn process_behavior_model(
        &mut self,
        graph: &mut SceneGraph,
        node: NodeId,
        model: &mut dyn BehaviorModel,
    ) {
        let _timer = self.phase("BehaviorModel", node);
        self.report.behavior_model_updates += 1;
        if let Err(e) = model.update_position(graph, node, self.dt) {
            self.record_failure(ComponentFailure::new(node, model.name(), &e));
        }
    }
}
