//! CLI command implementations.

use std::io;

use vireo_components::{keys, register_builtins};
use vireo_factory::{print_registration_log, Registry};
use vireo_scene::factory::{
    BehaviorRegistry, ConstraintRegistry, ForceFieldRegistry, PipelineRegistry, SolverRegistry,
};
use vireo_scene::{ComponentArgs, MechanicalState, SceneGraph, Simulation, SimulationConfig};
use vireo_telemetry::{EventBus, TracingSink};
use vireo_types::{VireoError, VireoResult};

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn create<O: 'static>(
    registry: &Registry<String, O, ComponentArgs>,
    key: &str,
    args: ComponentArgs,
) -> VireoResult<O> {
    registry
        .create(&key.to_string(), &args)
        .ok_or_else(|| VireoError::MissingComponent(format!("no factory accepted key '{key}'")))
}

/// Builds the demo pendulum from factory keys.
///
/// ```text
/// root      gravity, ground plane, spring(anchor, bob)
/// └─ pendulum   explicit Euler
///    ├─ anchor  1 DOF, fixed
///    └─ bob     1 DOF
/// ```
pub fn pendulum_scene(config: &SimulationConfig) -> VireoResult<SceneGraph> {
    register_builtins();

    let mut graph = SceneGraph::new("root");
    let root = graph.root();
    let pendulum = graph.add_child(root, "pendulum")?;
    let anchor = graph.add_child(pendulum, "anchor")?;
    let bob = graph.add_child(pendulum, "bob")?;

    let [gx, gy, gz] = config.gravity;
    let gravity = create(
        BehaviorRegistry::global(),
        keys::GRAVITY,
        ComponentArgs::named("gravity").with("gravity", format!("{gx} {gy} {gz}")),
    )?;
    let ground = create(
        PipelineRegistry::global(),
        keys::GROUND_PLANE,
        ComponentArgs::named("ground").with("height", config.ground_height),
    )?;
    let spring = create(
        ForceFieldRegistry::global(),
        keys::SPRING_FORCE_FIELD,
        ComponentArgs::named("rod")
            .with("node_a", anchor)
            .with("node_b", bob)
            .with("stiffness", 500.0)
            .with("rest_length", 1.0),
    )?;
    let node = graph.try_node_mut(root)?;
    node.add_behavior_model(gravity);
    node.set_collision_pipeline(ground);
    node.add_interaction_force_field(spring);

    let solver = create(SolverRegistry::global(), keys::EULER_EXPLICIT, ComponentArgs::named("euler"))?;
    graph.try_node_mut(pendulum)?.add_solver(solver);

    let fixed = create(
        ConstraintRegistry::global(),
        keys::FIXED_CONSTRAINT,
        ComponentArgs::named("anchor-fixed").with("dofs", 0),
    )?;
    let node = graph.try_node_mut(anchor)?;
    node.set_mechanical_state(MechanicalState::from_positions(vec![[0.0, 2.0, 0.0].into()], 1.0)?);
    node.add_constraint(fixed);

    graph
        .try_node_mut(bob)?
        .set_mechanical_state(MechanicalState::from_positions(vec![[1.0, 2.0, 0.0].into()], 1.0)?);

    Ok(graph)
}

/// Run the demo scene.
pub fn simulate(config_path: Option<&str>, steps: Option<u32>, json: bool) -> CliResult {
    let config = match config_path {
        Some(path) => SimulationConfig::from_path(path)?,
        None => SimulationConfig::default(),
    };
    let steps = steps.unwrap_or(config.steps);

    let mut bus = EventBus::new();
    if config.telemetry {
        bus.add_sink(Box::new(TracingSink::new()));
    }

    let graph = pendulum_scene(&config)?;
    tracing::info!(nodes = graph.len(), steps, "demo scene built");
    let mut sim = Simulation::new(graph, config)?;

    if !json {
        println!("Vireo Simulation");
        println!("────────────────");
        println!("dt: {}  steps: {steps}", sim.config().dt);
        println!();
    }

    for _ in 0..steps {
        let report = sim.step(Some(&bus))?;
        bus.flush();
        if json {
            println!("{}", serde_json::to_string(&report)?);
            continue;
        }
        println!(
            "step {:>5}  t={:>8.4}  solvers={}  forces={}  contacts={}  failures={}",
            sim.timestep(),
            sim.time(),
            report.solver_invocations,
            report.force_field_invocations,
            report.contacts,
            report.failures.len(),
        );
        for failure in &report.failures {
            println!("    ✗ {} at {}: {}", failure.component, failure.node, failure.message);
        }
    }
    bus.finalize();

    if !json {
        println!();
        println!("Final kinetic energy: {:.6} J", sim.kinetic_energy());
    }
    Ok(())
}

/// Print every factory registration made at startup.
pub fn factory_log() -> CliResult {
    register_builtins();
    print_registration_log(&mut io::stdout().lock())?;
    Ok(())
}

/// Validate a config file.
pub fn validate(path: &str) -> CliResult {
    println!("Vireo Validator");
    println!("───────────────");
    println!();

    if !path.ends_with(".toml") {
        println!("Unsupported file format. Use .toml (config).");
        return Ok(());
    }

    println!("Validating config: {path}");
    match SimulationConfig::from_path(path) {
        Ok(config) => {
            println!("✅ Config is valid (dt = {}, steps = {}).", config.dt, config.steps);
            Ok(())
        }
        Err(e) => {
            println!("❌ Config validation failed: {e}");
            Err(e.into())
        }
    }
}
