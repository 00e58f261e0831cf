//! Hooke spring between one DOF of two mechanical states.

use glam::DVec3;
use vireo_scene::{Component, ComponentArgs, InteractionForceField, MechanicalParams, SceneGraph, VecId};
use vireo_types::{NodeId, Scalar, VireoError, VireoResult};

/// One end of a spring: a DOF of the mechanical state held by a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpringEnd {
    pub node: NodeId,
    pub dof: usize,
}

pub struct SpringForceField {
    name: String,
    a: SpringEnd,
    b: SpringEnd,
    stiffness: Scalar,
    rest_length: Scalar,
}

impl SpringForceField {
    pub fn new(
        name: impl Into<String>,
        a: SpringEnd,
        b: SpringEnd,
        stiffness: Scalar,
        rest_length: Scalar,
    ) -> VireoResult<Self> {
        if !(stiffness >= 0.0 && stiffness.is_finite()) {
            return Err(VireoError::InvalidArgument(format!(
                "spring stiffness must be finite and >= 0, got {stiffness}"
            )));
        }
        if !(rest_length >= 0.0 && rest_length.is_finite()) {
            return Err(VireoError::InvalidArgument(format!(
                "spring rest length must be finite and >= 0, got {rest_length}"
            )));
        }
        Ok(Self {
            name: name.into(),
            a,
            b,
            stiffness,
            rest_length,
        })
    }

    /// Builds a spring from `node_a`, `node_b`, and the optional
    /// `dof_a`, `dof_b`, `stiffness`, `rest_length` attributes.
    pub fn from_args(args: &ComponentArgs) -> VireoResult<Self> {
        let node = |key: &str| -> VireoResult<NodeId> {
            args.get_node(key)?
                .ok_or_else(|| VireoError::InvalidArgument(format!("missing attribute '{key}'")))
        };
        let a = SpringEnd {
            node: node("node_a")?,
            dof: args.parse("dof_a")?.unwrap_or(0),
        };
        let b = SpringEnd {
            node: node("node_b")?,
            dof: args.parse("dof_b")?.unwrap_or(0),
        };
        Self::new(
            args.name_or("spring"),
            a,
            b,
            args.get_f64("stiffness")?.unwrap_or(100.0),
            args.get_f64("rest_length")?.unwrap_or(1.0),
        )
    }

    /// Construction function bound in the force field factory.
    pub fn create(args: &ComponentArgs) -> Option<Box<dyn InteractionForceField>> {
        match Self::from_args(args) {
            Ok(spring) => Some(Box::new(spring)),
            Err(e) => {
                tracing::warn!(error = %e, "SpringForceField: rejected arguments");
                None
            }
        }
    }

    fn position(&self, graph: &SceneGraph, end: SpringEnd) -> VireoResult<DVec3> {
        graph
            .node(end.node)
            .and_then(|n| n.mechanical_state())
            .and_then(|state| state.positions.get(end.dof).copied())
            .ok_or_else(|| {
                VireoError::MissingComponent(format!(
                    "{}: no DOF {} in a mechanical state at node {}",
                    self.name, end.dof, end.node
                ))
            })
    }

    fn apply(graph: &mut SceneGraph, end: SpringEnd, force_id: VecId, force: DVec3) {
        if let Some(f) = graph
            .node_mut(end.node)
            .and_then(|n| n.mechanical_state_mut())
            .and_then(|state| state.vec_mut(force_id).get_mut(end.dof))
        {
            *f += force;
        }
    }
}

impl Component for SpringForceField {
    fn name(&self) -> &str {
        &self.name
    }
}

impl InteractionForceField for SpringForceField {
    fn add_force(
        &mut self,
        graph: &mut SceneGraph,
        _: NodeId,
        _: &MechanicalParams,
        force: VecId,
    ) -> VireoResult<()> {
        let pa = self.position(graph, self.a)?;
        let pb = self.position(graph, self.b)?;
        let delta = pb - pa;
        let length = delta.length();
        if length <= vireo_types::constants::EPSILON {
            return Ok(());
        }
        let f = delta / length * (self.stiffness * (length - self.rest_length));
        Self::apply(graph, self.a, force, f);
        Self::apply(graph, self.b, force, -f);
        Ok(())
    }
}
