//! Mechanical state — per-DOF buffers owned by a node.
//!
//! This is the primary mutable data structure during a step. Solvers
//! integrate it, interaction force fields accumulate external forces into
//! it, constraint sets append rows to it.

use glam::DVec3;
use vireo_types::{ConstraintId, Scalar, VireoError, VireoResult};

use crate::params::{MatrixId, VecId};

/// One accumulated constraint row: a unit direction acting on one DOF.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintRow {
    pub id: ConstraintId,
    pub matrix: MatrixId,
    pub dof: usize,
    pub direction: DVec3,
}

/// Per-DOF mechanical buffers.
///
/// All vectors have the same length; code that resizes the public buffers
/// must keep them in step, and solvers call [`MechanicalState::check_lengths`]
/// before indexing across them. Pinned DOFs carry `inv_mass == 0`.
#[derive(Debug, Clone)]
pub struct MechanicalState {
    pub positions: Vec<DVec3>,
    pub velocities: Vec<DVec3>,
    /// Forces applied by interaction force fields during the current step.
    pub external_forces: Vec<DVec3>,
    pub inv_masses: Vec<Scalar>,
    constraints: Vec<ConstraintRow>,
    time: Scalar,
    integrating: bool,
}

impl MechanicalState {
    /// State with `positions`, zero velocity, and uniform `mass` per DOF.
    pub fn from_positions(positions: Vec<DVec3>, mass: Scalar) -> VireoResult<Self> {
        if !(mass > 0.0 && mass.is_finite()) {
            return Err(VireoError::InvalidArgument(format!(
                "DOF mass must be positive and finite, got {mass}"
            )));
        }
        let n = positions.len();
        Ok(Self {
            positions,
            velocities: vec![DVec3::ZERO; n],
            external_forces: vec![DVec3::ZERO; n],
            inv_masses: vec![1.0 / mass; n],
            constraints: Vec::new(),
            time: 0.0,
            integrating: false,
        })
    }

    /// Number of DOFs.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Fails if the per-DOF buffers do not all hold `len()` entries.
    pub fn check_lengths(&self) -> VireoResult<()> {
        let n = self.positions.len();
        if self.velocities.len() != n || self.external_forces.len() != n || self.inv_masses.len() != n {
            return Err(VireoError::InvalidArgument(format!(
                "mechanical state buffers disagree: {n} positions, {} velocities, {} forces, {} inverse masses",
                self.velocities.len(),
                self.external_forces.len(),
                self.inv_masses.len()
            )));
        }
        Ok(())
    }

    /// Pins a DOF (infinite mass). Out-of-range indices are ignored.
    pub fn pin(&mut self, dof: usize) {
        if let Some(inv_mass) = self.inv_masses.get_mut(dof) {
            *inv_mass = 0.0;
        }
    }

    pub fn is_pinned(&self, dof: usize) -> bool {
        self.inv_masses.get(dof).is_some_and(|&m| m == 0.0)
    }

    pub fn vec(&self, id: VecId) -> &[DVec3] {
        match id {
            VecId::Position => &self.positions,
            VecId::Velocity => &self.velocities,
            VecId::ExternalForce => &self.external_forces,
        }
    }

    pub fn vec_mut(&mut self, id: VecId) -> &mut [DVec3] {
        match id {
            VecId::Position => &mut self.positions,
            VecId::Velocity => &mut self.velocities,
            VecId::ExternalForce => &mut self.external_forces,
        }
    }

    /// Adds `force` to one DOF of the external force vector.
    pub fn add_external_force(&mut self, dof: usize, force: DVec3) {
        if let Some(f) = self.external_forces.get_mut(dof) {
            *f += force;
        }
    }

    pub fn reset_external_forces(&mut self) {
        self.external_forces.fill(DVec3::ZERO);
    }

    // ─── Constraints ───

    /// Drops every accumulated constraint row.
    pub fn reset_constraints(&mut self) {
        self.constraints.clear();
    }

    pub fn push_constraint(&mut self, row: ConstraintRow) {
        self.constraints.push(row);
    }

    pub fn constraints(&self) -> &[ConstraintRow] {
        &self.constraints
    }

    // ─── Integration bookkeeping ───

    /// Marks the start of an integration step.
    pub fn begin_integration(&mut self, _dt: Scalar) {
        self.integrating = true;
    }

    /// Marks the end of an integration step and clears the external
    /// forces consumed by it.
    pub fn end_integration(&mut self, _dt: Scalar) {
        self.integrating = false;
        self.reset_external_forces();
    }

    pub fn is_integrating(&self) -> bool {
        self.integrating
    }

    /// Stamps the state with the time its positions and velocities hold.
    pub fn propagate(&mut self, time: Scalar) {
        self.time = time;
    }

    pub fn time(&self) -> Scalar {
        self.time
    }

    /// Total kinetic energy: 0.5 * Σ m_i * ||v_i||². Pinned DOFs excluded.
    pub fn kinetic_energy(&self) -> Scalar {
        self.velocities
            .iter()
            .zip(&self.inv_masses)
            .filter(|(_, inv_mass)| **inv_mass > 0.0)
            .map(|(v, &inv_mass)| 0.5 * v.length_squared() / inv_mass)
            .sum()
    }
}
