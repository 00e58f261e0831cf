//! Integration tests for vireo-scene.

use std::sync::Arc;

use glam::DVec3;
use parking_lot::Mutex;
use vireo_factory::FnCreator;
use vireo_scene::factory::SolverRegistry;
use vireo_scene::{
    animate, AnimateVisitor, BehaviorModel, CollisionPipeline, Component, ComponentArgs,
    ConstraintParams, ConstraintRow, ConstraintSet, ExecParams, InteractionForceField, MatrixId,
    MechanicalParams, MechanicalState, OdeSolver, PropagateEventVisitor, SceneEvent, SceneGraph,
    Simulation, SimulationConfig, VecId, VisitResult, Visitor,
};
use vireo_telemetry::{EventBus, EventKind, VecSink};
use vireo_types::{ConstraintId, NodeId, Scalar, VireoError, VireoResult};

type Log = Arc<Mutex<Vec<String>>>;

fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().clone()
}

// ─── Recording components ─────────────────────────────────────

struct RecSolver {
    name: String,
    log: Log,
    fail: bool,
}

impl RecSolver {
    fn boxed(name: &str, log: &Log) -> Box<Self> {
        Box::new(Self {
            name: name.into(),
            log: log.clone(),
            fail: false,
        })
    }

    fn failing(name: &str, log: &Log) -> Box<Self> {
        Box::new(Self {
            name: name.into(),
            log: log.clone(),
            fail: true,
        })
    }
}

impl Component for RecSolver {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle_event(&mut self, event: &SceneEvent) {
        self.log.lock().push(format!("{}:{}", self.name, event.name()));
    }
}

impl OdeSolver for RecSolver {
    fn solve(&mut self, graph: &mut SceneGraph, node: NodeId, _: &ExecParams, dt: Scalar) -> VireoResult<()> {
        let integrating = graph
            .node(node)
            .and_then(|n| n.mechanical_state())
            .is_some_and(MechanicalState::is_integrating);
        self.log
            .lock()
            .push(format!("solve:{} dt={dt} integrating={integrating}", self.name));
        if self.fail {
            return Err(VireoError::component(&self.name, "diverged"));
        }
        Ok(())
    }
}

struct RecForceField {
    name: String,
    log: Log,
}

impl RecForceField {
    fn boxed(name: &str, log: &Log) -> Box<Self> {
        Box::new(Self {
            name: name.into(),
            log: log.clone(),
        })
    }
}

impl Component for RecForceField {
    fn name(&self) -> &str {
        &self.name
    }
}

impl InteractionForceField for RecForceField {
    fn add_force(
        &mut self,
        graph: &mut SceneGraph,
        node: NodeId,
        _: &MechanicalParams,
        force: VecId,
    ) -> VireoResult<()> {
        self.log.lock().push(format!("ff:{}", self.name));
        if let Some(state) = graph.node_mut(node).and_then(|n| n.mechanical_state_mut()) {
            if let Some(f) = state.vec_mut(force).first_mut() {
                *f += DVec3::X;
            }
        }
        Ok(())
    }
}

struct RecBehavior {
    name: String,
    log: Log,
}

impl Component for RecBehavior {
    fn name(&self) -> &str {
        &self.name
    }
}

impl BehaviorModel for RecBehavior {
    fn update_position(&mut self, _: &mut SceneGraph, _: NodeId, dt: Scalar) -> VireoResult<()> {
        self.log.lock().push(format!("behavior:{} dt={dt}", self.name));
        Ok(())
    }
}

struct RecPipeline {
    name: String,
    log: Log,
}

impl Component for RecPipeline {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle_event(&mut self, event: &SceneEvent) {
        self.log.lock().push(format!("{}:{}", self.name, event.name()));
    }
}

impl CollisionPipeline for RecPipeline {
    fn reset(&mut self, _: &mut SceneGraph, _: NodeId) -> VireoResult<()> {
        self.log.lock().push(format!("reset:{}", self.name));
        Ok(())
    }

    fn detect(&mut self, _: &mut SceneGraph, _: NodeId) -> VireoResult<usize> {
        self.log.lock().push(format!("detect:{}", self.name));
        Ok(2)
    }

    fn respond(&mut self, _: &mut SceneGraph, _: NodeId) -> VireoResult<()> {
        self.log.lock().push(format!("respond:{}", self.name));
        Ok(())
    }
}

struct RecConstraint {
    name: String,
    log: Log,
    rows: u32,
}

impl RecConstraint {
    fn boxed(name: &str, rows: u32, log: &Log) -> Box<Self> {
        Box::new(Self {
            name: name.into(),
            log: log.clone(),
            rows,
        })
    }
}

impl Component for RecConstraint {
    fn name(&self) -> &str {
        &self.name
    }
}

impl ConstraintSet for RecConstraint {
    fn reset_constraint(&mut self) {
        self.log.lock().push(format!("reset:{}", self.name));
    }

    fn build_constraint_matrix(
        &mut self,
        state: &mut MechanicalState,
        _: &ConstraintParams,
        matrix: MatrixId,
        next_id: &mut u32,
    ) {
        self.log.lock().push(format!("build:{}", self.name));
        for _ in 0..self.rows {
            state.push_constraint(ConstraintRow {
                id: ConstraintId(*next_id),
                matrix,
                dof: 0,
                direction: DVec3::Y,
            });
            *next_id += 1;
        }
    }
}

fn one_dof() -> MechanicalState {
    MechanicalState::from_positions(vec![DVec3::ZERO], 1.0).unwrap()
}

/// root → A (solver S, force field F, constraint C, state) → A1 (force field F1)
///      → B (force field F2)
fn scenario(log: &Log) -> (SceneGraph, NodeId, NodeId, NodeId) {
    let mut graph = SceneGraph::new("root");
    let a = graph.add_child(graph.root(), "A").unwrap();
    let a1 = graph.add_child(a, "A1").unwrap();
    let b = graph.add_child(graph.root(), "B").unwrap();

    let node = graph.node_mut(a).unwrap();
    node.set_mechanical_state(one_dof());
    node.add_solver(RecSolver::boxed("S", log));
    node.add_interaction_force_field(RecForceField::boxed("F", log));
    node.add_constraint(RecConstraint::boxed("C", 1, log));
    graph
        .node_mut(a1)
        .unwrap()
        .add_interaction_force_field(RecForceField::boxed("F1", log));
    graph
        .node_mut(b)
        .unwrap()
        .add_interaction_force_field(RecForceField::boxed("F2", log));
    (graph, a, a1, b)
}

// ─── Visitor engine ───────────────────────────────────────────

struct OrderVisitor {
    trace: Vec<String>,
    prune: Option<NodeId>,
}

impl Visitor for OrderVisitor {
    fn name(&self) -> &str {
        "OrderVisitor"
    }

    fn process_node_top_down(&mut self, graph: &mut SceneGraph, node: NodeId) -> VisitResult {
        self.trace.push(format!("down:{}", graph.node(node).unwrap().name()));
        if self.prune == Some(node) {
            VisitResult::Prune
        } else {
            VisitResult::Continue
        }
    }

    fn process_node_bottom_up(&mut self, graph: &mut SceneGraph, node: NodeId) {
        self.trace.push(format!("up:{}", graph.node(node).unwrap().name()));
    }
}

#[test]
fn traversal_is_depth_first_in_insertion_order() {
    let mut graph = SceneGraph::new("root");
    let a = graph.add_child(graph.root(), "a").unwrap();
    graph.add_child(a, "a1").unwrap();
    graph.add_child(graph.root(), "b").unwrap();

    let mut visitor = OrderVisitor {
        trace: Vec::new(),
        prune: None,
    };
    visitor.execute(&mut graph, NodeId(0)).unwrap();
    assert_eq!(
        visitor.trace,
        ["down:root", "down:a", "down:a1", "up:a1", "up:a", "down:b", "up:b", "up:root"]
    );
}

#[test]
fn prune_skips_children_but_not_bottom_up() {
    let mut graph = SceneGraph::new("root");
    let a = graph.add_child(graph.root(), "a").unwrap();
    graph.add_child(a, "a1").unwrap();

    let mut visitor = OrderVisitor {
        trace: Vec::new(),
        prune: Some(a),
    };
    visitor.execute(&mut graph, NodeId(0)).unwrap();
    assert_eq!(visitor.trace, ["down:root", "down:a", "up:a", "up:root"]);
}

#[test]
fn execute_on_unknown_root_fails() {
    let mut graph = SceneGraph::new("root");
    let mut visitor = OrderVisitor {
        trace: Vec::new(),
        prune: None,
    };
    assert!(matches!(
        visitor.execute(&mut graph, NodeId(7)),
        Err(VireoError::UnknownNode(NodeId(7)))
    ));
}

#[derive(Default)]
struct CountForceFields {
    seen: Vec<String>,
}

impl Visitor for CountForceFields {
    fn name(&self) -> &str {
        "CountForceFields"
    }

    fn fwd_interaction_force_field(
        &mut self,
        _: &mut SceneGraph,
        _: NodeId,
        ff: &mut dyn InteractionForceField,
    ) {
        self.seen.push(ff.name().to_string());
    }
}

#[test]
fn default_top_down_dispatches_roles_and_reattaches_components() {
    let log = new_log();
    let (mut graph, a, _, b) = scenario(&log);

    let mut visitor = CountForceFields::default();
    visitor.execute(&mut graph, NodeId(0)).unwrap();
    assert_eq!(visitor.seen, ["F", "F1", "F2"]);

    assert_eq!(graph.node(a).unwrap().interaction_force_fields().len(), 1);
    assert_eq!(graph.node(b).unwrap().interaction_force_fields()[0].name(), "F2");
}

#[test]
fn inactive_and_sleeping_subtrees_are_never_visited() {
    let log = new_log();
    let (mut graph, a, _, b) = scenario(&log);
    let c = graph.add_child(b, "C").unwrap();
    graph
        .node_mut(c)
        .unwrap()
        .add_interaction_force_field(RecForceField::boxed("F3", &log));

    graph.node_mut(a).unwrap().set_sleeping(true);
    graph.node_mut(b).unwrap().set_active(false);
    graph.node_mut(c).unwrap().set_active(true);

    let mut visitor = CountForceFields::default();
    visitor.execute(&mut graph, NodeId(0)).unwrap();
    assert!(visitor.seen.is_empty());

    let report = animate(&mut graph, NodeId(0), &ExecParams::new(0), 0.01, None).unwrap();
    assert_eq!(report.nodes_visited, 1);
    assert!(entries(&log).is_empty());
    assert_eq!(graph.node(a).unwrap().time(), 0.0);
}

#[test]
fn sleeping_root_runs_no_phase() {
    let log = new_log();
    let (mut graph, ..) = scenario(&log);
    graph.node_mut(NodeId(0)).unwrap().set_sleeping(true);

    let report = animate(&mut graph, NodeId(0), &ExecParams::new(0), 0.01, None).unwrap();
    assert_eq!(report.constraint_resets, 0);
    assert_eq!(report.nodes_visited, 0);
    assert!(entries(&log).is_empty());
}

#[test]
fn event_broadcast_reaches_every_visitable_component() {
    let log = new_log();
    let (mut graph, _, _, b) = scenario(&log);
    let pipeline = Box::new(RecPipeline {
        name: "P".into(),
        log: log.clone(),
    });
    graph.node_mut(b).unwrap().set_collision_pipeline(pipeline);

    let mut visitor = PropagateEventVisitor::new(SceneEvent::CollisionBegin);
    visitor.execute(&mut graph, NodeId(0)).unwrap();
    // S, F, C on A; F1 on A1; F2 and P on B.
    assert_eq!(visitor.delivered(), 6);
    assert_eq!(entries(&log), ["S:CollisionBeginEvent", "P:CollisionBeginEvent"]);

    graph.node_mut(b).unwrap().set_sleeping(true);
    let mut visitor = PropagateEventVisitor::new(SceneEvent::CollisionEnd);
    visitor.execute(&mut graph, NodeId(0)).unwrap();
    assert_eq!(visitor.delivered(), 4);
}

// ─── Animate ──────────────────────────────────────────────────

#[test]
fn end_to_end_step_call_sequence() {
    let log = new_log();
    let (mut graph, a, a1, b) = scenario(&log);

    let report = animate(&mut graph, NodeId(0), &ExecParams::new(0), 0.01, None).unwrap();

    assert_eq!(
        entries(&log),
        [
            "reset:C",
            "S:IntegrateBeginEvent",
            "build:C",
            "solve:S dt=0.01 integrating=true",
            "S:IntegrateEndEvent",
            "ff:F2",
        ]
    );

    let node_a = graph.node(a).unwrap();
    assert!((node_a.time() - 0.01).abs() < 1e-12);
    let state = node_a.mechanical_state().unwrap();
    assert!(!state.is_integrating());
    assert!((state.time() - 0.01).abs() < 1e-12);
    assert_eq!(state.constraints().len(), 1);
    assert_eq!(state.constraints()[0].id, ConstraintId(0));
    assert!((graph.node(a1).unwrap().time() - 0.01).abs() < 1e-12);
    assert_eq!(graph.node(b).unwrap().time(), 0.0);

    assert_eq!(report.nodes_visited, 3);
    assert_eq!(report.constraint_resets, 1);
    assert_eq!(report.integrated_nodes, 1);
    assert_eq!(report.solver_invocations, 1);
    assert_eq!(report.force_field_invocations, 1);
    assert_eq!(report.constraint_rows, 1);
    assert_eq!(report.collision_passes, 0);
    assert!(report.is_clean());
}

#[test]
fn solvers_run_once_each_in_registration_order() {
    let log = new_log();
    let mut graph = SceneGraph::new("root");
    let a = graph.add_child(graph.root(), "A").unwrap();
    let node = graph.node_mut(a).unwrap();
    node.add_solver(RecSolver::boxed("S1", &log));
    node.add_solver(RecSolver::boxed("S2", &log));
    node.add_interaction_force_field(RecForceField::boxed("F", &log));

    let report = animate(&mut graph, NodeId(0), &ExecParams::new(0), 0.02, None).unwrap();

    let solves: Vec<String> = entries(&log).into_iter().filter(|e| e.starts_with("solve:")).collect();
    assert_eq!(
        solves,
        ["solve:S1 dt=0.02 integrating=false", "solve:S2 dt=0.02 integrating=false"]
    );
    assert!(!entries(&log).contains(&"ff:F".to_string()));
    assert_eq!(report.solver_invocations, 2);
    assert!((graph.node(a).unwrap().time() - 0.02).abs() < 1e-12);
}

#[test]
fn constraint_reset_fires_once_per_step() {
    let log = new_log();
    let mut graph = SceneGraph::new("root");
    for name in ["A", "B", "C"] {
        let id = graph.add_child(graph.root(), name).unwrap();
        let mut state = one_dof();
        state.push_constraint(ConstraintRow {
            id: ConstraintId(9),
            matrix: MatrixId::HolonomicC,
            dof: 0,
            direction: DVec3::X,
        });
        let node = graph.node_mut(id).unwrap();
        node.set_mechanical_state(state);
        node.add_constraint(RecConstraint::boxed(name, 0, &log));
    }

    let report = animate(&mut graph, NodeId(0), &ExecParams::new(0), 0.01, None).unwrap();

    assert_eq!(report.constraint_resets, 1);
    assert_eq!(entries(&log), ["reset:A", "reset:B", "reset:C"]);
    for id in graph.subtree(NodeId(0)) {
        if let Some(state) = graph.node(id).unwrap().mechanical_state() {
            assert!(state.constraints().is_empty());
        }
    }
}

#[test]
fn constraint_ids_restart_for_each_solver_subtree() {
    let log = new_log();
    let mut graph = SceneGraph::new("root");
    for name in ["A", "B"] {
        let id = graph.add_child(graph.root(), name).unwrap();
        let node = graph.node_mut(id).unwrap();
        node.set_mechanical_state(one_dof());
        node.add_solver(RecSolver::boxed(name, &log));
        node.add_constraint(RecConstraint::boxed(name, 2, &log));
    }

    let report = animate(&mut graph, NodeId(0), &ExecParams::new(0), 0.01, None).unwrap();

    assert_eq!(report.constraint_rows, 4);
    for name in ["A", "B"] {
        let id = graph.find(name).unwrap();
        let ids: Vec<ConstraintId> = graph
            .node(id)
            .unwrap()
            .mechanical_state()
            .unwrap()
            .constraints()
            .iter()
            .map(|row| row.id)
            .collect();
        assert_eq!(ids, [ConstraintId(0), ConstraintId(1)]);
    }
}

#[test]
fn zero_dt_adopts_the_node_step_size() {
    let log = new_log();
    let mut graph = SceneGraph::new("root");
    let child = graph.add_child(graph.root(), "child").unwrap();
    let root = graph.node_mut(NodeId(0)).unwrap();
    root.set_dt(0.02);
    root.add_solver(RecSolver::boxed("S", &log));
    graph.node_mut(child).unwrap().set_dt(0.05);

    let visitor = AnimateVisitor::with_node_dt(ExecParams::new(0));
    assert_eq!(visitor.dt(), 0.0);
    visitor.run(&mut graph, NodeId(0)).unwrap();

    assert_eq!(entries(&log), ["S:IntegrateBeginEvent", "solve:S dt=0.02 integrating=false", "S:IntegrateEndEvent"]);
    assert!((graph.node(NodeId(0)).unwrap().time() - 0.02).abs() < 1e-12);
    assert!((graph.node(child).unwrap().time() - 0.02).abs() < 1e-12);
}

#[test]
fn adopted_step_size_is_pushed_down() {
    let mut graph = SceneGraph::new("root");
    let child = graph.add_child(graph.root(), "child").unwrap();
    graph.node_mut(NodeId(0)).unwrap().set_dt(0.02);
    graph.node_mut(child).unwrap().set_dt(0.05);

    animate(&mut graph, NodeId(0), &ExecParams::new(0), 0.0, None).unwrap();
    assert_eq!(graph.node(child).unwrap().dt(), 0.02);

    animate(&mut graph, NodeId(0), &ExecParams::new(1), 0.03, None).unwrap();
    assert_eq!(graph.node(NodeId(0)).unwrap().dt(), 0.03);
    assert_eq!(graph.node(child).unwrap().dt(), 0.03);
}

#[test]
fn invalid_dt_is_rejected_before_touching_the_graph() {
    let log = new_log();
    let (mut graph, ..) = scenario(&log);

    for dt in [-0.01, Scalar::NAN, Scalar::INFINITY] {
        let result = animate(&mut graph, NodeId(0), &ExecParams::new(0), dt, None);
        assert!(matches!(result, Err(VireoError::InvalidArgument(_))));
    }
    assert!(AnimateVisitor::new(ExecParams::new(0), -1.0).is_err());
    assert!(entries(&log).is_empty());

    assert!(matches!(
        animate(&mut graph, NodeId(42), &ExecParams::new(0), 0.01, None),
        Err(VireoError::UnknownNode(NodeId(42)))
    ));
}

#[test]
fn failing_solver_does_not_stop_the_step() {
    let log = new_log();
    let mut graph = SceneGraph::new("root");
    let a = graph.add_child(graph.root(), "A").unwrap();
    let b = graph.add_child(graph.root(), "B").unwrap();
    let node = graph.node_mut(a).unwrap();
    node.add_solver(RecSolver::failing("S1", &log));
    node.add_solver(RecSolver::boxed("S2", &log));
    graph
        .node_mut(b)
        .unwrap()
        .add_interaction_force_field(RecForceField::boxed("F2", &log));

    let mut bus = EventBus::new();
    let sink = VecSink::new();
    let events = sink.events();
    bus.add_sink(Box::new(sink));

    let report = animate(&mut graph, NodeId(0), &ExecParams::new(4), 0.01, Some(&bus)).unwrap();
    bus.flush();

    assert_eq!(report.solver_invocations, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].node, a);
    assert_eq!(report.failures[0].component, "S1");
    assert!(report.failures[0].message.contains("diverged"));
    assert!(entries(&log).contains(&"ff:F2".to_string()));
    assert!((graph.node(a).unwrap().time() - 0.01).abs() < 1e-12);

    let failures = events
        .lock()
        .iter()
        .filter(|e| matches!(&e.kind, EventKind::ComponentFailure { component, .. } if component == "S1"))
        .count();
    assert_eq!(failures, 1);
}

#[test]
fn collision_phase_runs_before_integration() {
    let log = new_log();
    let mut graph = SceneGraph::new("root");
    let a = graph.add_child(graph.root(), "A").unwrap();
    graph.node_mut(NodeId(0)).unwrap().set_collision_pipeline(Box::new(RecPipeline {
        name: "P".into(),
        log: log.clone(),
    }));
    graph.node_mut(a).unwrap().add_solver(RecSolver::boxed("S", &log));

    let report = animate(&mut graph, NodeId(0), &ExecParams::new(0), 0.01, None).unwrap();

    assert_eq!(
        entries(&log),
        [
            "P:CollisionBeginEvent",
            "S:CollisionBeginEvent",
            "reset:P",
            "detect:P",
            "respond:P",
            "P:CollisionEndEvent",
            "S:CollisionEndEvent",
            "S:IntegrateBeginEvent",
            "solve:S dt=0.01 integrating=false",
            "S:IntegrateEndEvent",
        ]
    );
    assert_eq!(report.collision_passes, 1);
    assert_eq!(report.contacts, 2);
}

#[test]
fn behavior_models_follow_force_fields() {
    let log = new_log();
    let mut graph = SceneGraph::new("root");
    let root = graph.node_mut(NodeId(0)).unwrap();
    root.add_behavior_model(Box::new(RecBehavior {
        name: "G".into(),
        log: log.clone(),
    }));
    root.add_interaction_force_field(RecForceField::boxed("F", &log));

    let report = animate(&mut graph, NodeId(0), &ExecParams::new(0), 0.01, None).unwrap();
    assert_eq!(entries(&log), ["ff:F", "behavior:G dt=0.01"]);
    assert_eq!(report.behavior_model_updates, 1);
}

#[test]
fn solverless_state_accumulates_external_force() {
    let log = new_log();
    let mut graph = SceneGraph::new("root");
    let root = graph.node_mut(NodeId(0)).unwrap();
    root.set_mechanical_state(one_dof());
    root.add_interaction_force_field(RecForceField::boxed("F", &log));

    animate(&mut graph, NodeId(0), &ExecParams::new(0), 0.01, None).unwrap();
    let state = graph.node(NodeId(0)).unwrap().mechanical_state().unwrap();
    assert_eq!(state.external_forces[0], DVec3::X);
    assert_eq!(state.positions[0], DVec3::ZERO);
}

#[test]
fn bus_receives_step_and_phase_events() {
    let log = new_log();
    let (mut graph, a, _, b) = scenario(&log);
    let mut bus = EventBus::new();
    let sink = VecSink::new();
    let events = sink.events();
    bus.add_sink(Box::new(sink));

    animate(&mut graph, NodeId(0), &ExecParams::new(7), 0.01, Some(&bus)).unwrap();
    bus.flush();

    let events = events.lock();
    assert!(events.iter().all(|e| e.timestep == 7));
    assert!(matches!(events.first().map(|e| &e.kind), Some(EventKind::StepBegin { .. })));
    assert!(matches!(events.last().map(|e| &e.kind), Some(EventKind::StepEnd { .. })));

    let begun: Vec<(String, NodeId)> = events
        .iter()
        .filter_map(|e| match &e.kind {
            EventKind::PhaseBegin { phase, node } => Some((phase.clone(), *node)),
            _ => None,
        })
        .collect();
    let ended = events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::PhaseEnd { .. }))
        .count();
    assert_eq!(begun.len(), ended);
    assert!(begun.contains(&("Mechanical".to_string(), a)));
    assert!(begun.contains(&("OdeSolver".to_string(), a)));
    assert!(begun.contains(&("InteractionFF".to_string(), b)));
    assert!(!begun.iter().any(|(phase, _)| phase == "Collision"));
}

// ─── Factory-built components ─────────────────────────────────

#[test]
fn nodes_can_be_populated_from_a_registry() {
    let log = new_log();
    let registry = SolverRegistry::new();
    let shared = log.clone();
    assert!(FnCreator::<RecSolver, _>::register(
        &registry,
        "Recording".to_string(),
        move |args: &ComponentArgs| {
            Some(RecSolver::boxed(&args.name_or("S"), &shared) as Box<dyn OdeSolver>)
        },
        false,
    ));

    let mut graph = SceneGraph::new("root");
    let solver = registry
        .create(&"Recording".to_string(), &ComponentArgs::named("built"))
        .unwrap();
    graph.node_mut(NodeId(0)).unwrap().add_solver(solver);
    assert!(registry.create(&"Missing".to_string(), &ComponentArgs::new()).is_none());

    animate(&mut graph, NodeId(0), &ExecParams::new(0), 0.01, None).unwrap();
    assert!(entries(&log).contains(&"solve:built dt=0.01 integrating=false".to_string()));
}

// ─── Simulation / config ──────────────────────────────────────

#[test]
fn simulation_advances_every_node_time() {
    let log = new_log();
    let (graph, a, a1, b) = scenario(&log);
    let config = SimulationConfig {
        dt: 0.01,
        ..Default::default()
    };
    let mut sim = Simulation::new(graph, config).unwrap();

    let mut bus = EventBus::new();
    let reports = sim.run(3, Some(&mut bus)).unwrap();

    assert_eq!(reports.len(), 3);
    assert_eq!(sim.timestep(), 3);
    assert!((sim.time() - 0.03).abs() < 1e-9);
    for id in [a, a1, b] {
        assert!((sim.graph().node(id).unwrap().time() - 0.03).abs() < 1e-9);
    }
    let solves = entries(&log).iter().filter(|e| e.starts_with("solve:")).count();
    assert_eq!(solves, 3);
}

#[test]
fn simulation_keeps_time_when_node_dt_is_negative() {
    let mut graph = SceneGraph::new("root");
    let child = graph.add_child(graph.root(), "child").unwrap();
    graph.node_mut(graph.root()).unwrap().set_dt(-0.5);
    let config = SimulationConfig {
        dt: 0.0,
        ..Default::default()
    };
    let mut sim = Simulation::new(graph, config).unwrap();

    let report = sim.step(None).unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].component, "node");
    assert_eq!(sim.time(), 0.0);
    assert_eq!(sim.graph().node(child).unwrap().time(), 0.0);
    assert_eq!(sim.timestep(), 1);
}

#[test]
fn simulation_rejects_invalid_config() {
    let config = SimulationConfig {
        steps: 0,
        ..Default::default()
    };
    assert!(matches!(
        Simulation::new(SceneGraph::new("root"), config),
        Err(VireoError::InvalidConfig(_))
    ));
}

#[test]
fn config_from_toml() {
    let config = SimulationConfig::from_toml_str("dt = 0.005\nsteps = 10\n").unwrap();
    assert_eq!(config.dt, 0.005);
    assert_eq!(config.steps, 10);
    assert_eq!(config.gravity, SimulationConfig::default().gravity);

    let text = config.to_toml_string().unwrap();
    assert_eq!(SimulationConfig::from_toml_str(&text).unwrap(), config);

    assert!(matches!(
        SimulationConfig::from_toml_str("dt = -1.0"),
        Err(VireoError::InvalidConfig(_))
    ));
    assert!(matches!(
        SimulationConfig::from_toml_str("dt = \"fast\""),
        Err(VireoError::Serialization(_))
    ));
}
