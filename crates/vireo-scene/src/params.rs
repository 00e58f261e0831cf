//! Execution parameters threaded through every traversal.

use serde::{Deserialize, Serialize};
use vireo_types::Scalar;

/// Parameters identifying one step execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecParams {
    /// Step number (0-indexed).
    pub timestep: u64,
}

impl ExecParams {
    pub fn new(timestep: u64) -> Self {
        Self { timestep }
    }
}

/// Parameters of mechanical operations (force accumulation, integration).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MechanicalParams {
    pub exec: ExecParams,
    /// Step size used by the operation.
    pub dt: Scalar,
    /// Mass matrix factor.
    pub m_factor: Scalar,
    /// Damping matrix factor.
    pub b_factor: Scalar,
    /// Stiffness matrix factor.
    pub k_factor: Scalar,
}

impl MechanicalParams {
    /// Mechanical parameters for `exec` with the given step size.
    pub fn from_exec(exec: &ExecParams, dt: Scalar) -> Self {
        Self {
            exec: *exec,
            dt,
            m_factor: 1.0,
            b_factor: 0.0,
            k_factor: 0.0,
        }
    }
}

/// Which derivative order constraints are expressed at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintOrder {
    #[default]
    Position,
    Velocity,
    Acceleration,
}

/// Parameters of constraint accumulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintParams {
    pub exec: ExecParams,
    pub order: ConstraintOrder,
}

impl ConstraintParams {
    pub fn from_exec(exec: &ExecParams) -> Self {
        Self {
            exec: *exec,
            order: ConstraintOrder::Position,
        }
    }
}

/// Per-DOF vectors held by a mechanical state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VecId {
    Position,
    Velocity,
    /// Forces applied from outside the solver (interaction force fields).
    ExternalForce,
}

/// Constraint matrices held by a mechanical state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatrixId {
    /// Jacobian rows of holonomic (position-level) constraints.
    HolonomicC,
}
