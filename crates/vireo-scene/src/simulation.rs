//! Simulation driver — repeated animate steps over one scene graph.

use vireo_telemetry::EventBus;
use vireo_types::{Scalar, VireoResult};

use crate::animate::{animate, validate_dt};
use crate::config::SimulationConfig;
use crate::mechanical::UpdateTimeVisitor;
use crate::node::{Node, SceneGraph};
use crate::params::ExecParams;
use crate::report::StepReport;
use crate::visitor::Visitor;

/// Owns a scene graph and advances it step by step.
pub struct Simulation {
    graph: SceneGraph,
    config: SimulationConfig,
    timestep: u64,
}

impl Simulation {
    /// Wraps `graph`. Fails if `config` does not validate.
    pub fn new(graph: SceneGraph, config: SimulationConfig) -> VireoResult<Self> {
        config.validate()?;
        Ok(Self {
            graph,
            config,
            timestep: 0,
        })
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Mutable access to the graph. Not to be used while a step runs.
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Number of completed steps.
    pub fn timestep(&self) -> u64 {
        self.timestep
    }

    /// Simulation time of the root node.
    pub fn time(&self) -> Scalar {
        self.graph.node(self.graph.root()).map_or(0.0, Node::time)
    }

    /// Total kinetic energy of every visitable mechanical state.
    pub fn kinetic_energy(&self) -> Scalar {
        self.graph
            .subtree(self.graph.root())
            .into_iter()
            .filter_map(|id| self.graph.node(id).and_then(Node::mechanical_state))
            .map(|state| state.kinetic_energy())
            .sum()
    }

    /// Runs one step, then stamps every visitable node with the new time.
    ///
    /// An invalid adopted step size leaves the time where it was.
    pub fn step(&mut self, bus: Option<&EventBus>) -> VireoResult<StepReport> {
        let root = self.graph.root();
        let exec = ExecParams::new(self.timestep);
        let start_time = self.time();

        let report = animate(&mut self.graph, root, &exec, self.config.dt, bus)?;

        // With dt == 0 the root's own step size was used.
        let dt = if self.config.dt > 0.0 {
            self.config.dt
        } else {
            self.graph.node(root).map_or(0.0, Node::dt)
        };
        match validate_dt(dt) {
            Ok(()) => {
                UpdateTimeVisitor::new(start_time + dt).execute(&mut self.graph, root)?;
            }
            Err(e) => tracing::warn!(error = %e, "time not advanced"),
        }

        self.timestep += 1;
        Ok(report)
    }

    /// Runs `steps` steps, flushing `bus` after each one.
    pub fn run(&mut self, steps: u32, mut bus: Option<&mut EventBus>) -> VireoResult<Vec<StepReport>> {
        let mut reports = Vec::with_capacity(steps as usize);
        for _ in 0..steps {
            reports.push(self.step(bus.as_deref())?);
            if let Some(bus) = bus.as_deref_mut() {
                bus.flush();
            }
        }
        Ok(reports)
    }
}
