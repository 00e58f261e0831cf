//! Explicit Euler integrator.
//!
//! `v += dt * f_ext * inv_mass`, then velocity components along the
//! accumulated constraint directions are removed, then `x += dt * v`.
//! Pinned DOFs (`inv_mass == 0`) keep zero velocity.

use glam::DVec3;
use vireo_factory::Creatable;
use vireo_scene::{Component, ComponentArgs, ExecParams, MatrixId, MechanicalState, OdeSolver, SceneGraph};
use vireo_types::{NodeId, Scalar, VireoError, VireoResult};

pub struct EulerExplicitSolver {
    name: String,
    /// Velocity damping per step (0.0 = none, 1.0 = full).
    damping: Scalar,
}

impl EulerExplicitSolver {
    pub fn new(name: impl Into<String>, damping: Scalar) -> VireoResult<Self> {
        if !(0.0..=1.0).contains(&damping) {
            return Err(VireoError::InvalidArgument(format!(
                "damping must be in [0, 1], got {damping}"
            )));
        }
        Ok(Self {
            name: name.into(),
            damping,
        })
    }

    pub fn damping(&self) -> Scalar {
        self.damping
    }

    fn integrate(&self, state: &mut MechanicalState, dt: Scalar) {
        let keep = 1.0 - self.damping;
        for i in 0..state.len() {
            let inv_mass = state.inv_masses[i];
            if inv_mass == 0.0 {
                state.velocities[i] = DVec3::ZERO;
                continue;
            }
            state.velocities[i] += state.external_forces[i] * (inv_mass * dt);
            state.velocities[i] *= keep;
        }

        let rows: Vec<_> = state
            .constraints()
            .iter()
            .filter(|row| row.matrix == MatrixId::HolonomicC)
            .map(|row| (row.dof, row.direction))
            .collect();
        for (dof, direction) in rows {
            if let Some(v) = state.velocities.get_mut(dof) {
                *v -= direction * v.dot(direction);
            }
        }

        for i in 0..state.len() {
            let v = state.velocities[i];
            state.positions[i] += v * dt;
        }
    }
}

impl Creatable<Box<dyn OdeSolver>, ComponentArgs> for EulerExplicitSolver {
    fn create(args: &ComponentArgs) -> Option<Box<dyn OdeSolver>> {
        let built = args
            .get_f64("damping")
            .and_then(|damping| Self::new(args.name_or("euler"), damping.unwrap_or(0.0)));
        match built {
            Ok(solver) => Some(Box::new(solver)),
            Err(e) => {
                tracing::warn!(error = %e, "EulerExplicit: rejected arguments");
                None
            }
        }
    }
}

impl Component for EulerExplicitSolver {
    fn name(&self) -> &str {
        &self.name
    }
}

impl OdeSolver for EulerExplicitSolver {
    fn solve(&mut self, graph: &mut SceneGraph, node: NodeId, _: &ExecParams, dt: Scalar) -> VireoResult<()> {
        let mut failure = None;
        graph.for_each_state_mut(node, |id, state| {
            if failure.is_some() {
                return;
            }
            if let Err(e) = state.check_lengths() {
                failure = Some(format!("node {id}: {e}"));
                return;
            }
            self.integrate(state, dt);
            if state.positions.iter().any(|p| !p.is_finite()) {
                failure = Some(format!("non-finite position in state of node {id}"));
            }
        });
        match failure {
            Some(message) => Err(VireoError::component(&self.name, message)),
            None => Ok(()),
        }
    }
}
