//! Fixed-point constraint.

use glam::DVec3;
use vireo_factory::Creatable;
use vireo_scene::{
    Component, ComponentArgs, ConstraintParams, ConstraintRow, ConstraintSet, MatrixId,
    MechanicalState,
};
use vireo_types::ConstraintId;

/// Holds DOFs in place by emitting one holonomic row per axis for each
/// fixed DOF of its node's mechanical state.
pub struct FixedConstraint {
    name: String,
    dofs: Vec<usize>,
}

impl FixedConstraint {
    pub fn new(name: impl Into<String>, dofs: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            dofs,
        }
    }

    pub fn dofs(&self) -> &[usize] {
        &self.dofs
    }
}

impl Creatable<Box<dyn ConstraintSet>, ComponentArgs> for FixedConstraint {
    fn create(args: &ComponentArgs) -> Option<Box<dyn ConstraintSet>> {
        match args.get_indices("dofs") {
            Ok(dofs) => Some(Box::new(Self::new(
                args.name_or("fixed"),
                dofs.unwrap_or_else(|| vec![0]),
            ))),
            Err(e) => {
                tracing::warn!(error = %e, "FixedConstraint: rejected arguments");
                None
            }
        }
    }
}

impl Component for FixedConstraint {
    fn name(&self) -> &str {
        &self.name
    }
}

impl ConstraintSet for FixedConstraint {
    fn build_constraint_matrix(
        &mut self,
        state: &mut MechanicalState,
        _: &ConstraintParams,
        matrix: MatrixId,
        next_id: &mut u32,
    ) {
        for &dof in &self.dofs {
            if dof >= state.len() {
                tracing::warn!(constraint = %self.name, dof, "fixed DOF out of range");
                continue;
            }
            for direction in [DVec3::X, DVec3::Y, DVec3::Z] {
                state.push_constraint(ConstraintRow {
                    id: ConstraintId(*next_id),
                    matrix,
                    dof,
                    direction,
                });
                *next_id += 1;
            }
        }
    }
}
