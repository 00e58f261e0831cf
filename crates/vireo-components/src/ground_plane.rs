//! Ground plane collision.
//!
//! Keeps DOFs above a horizontal plane at `y = height`. Detection collects
//! every free DOF of the subtree that sits below the plane; response
//! projects it back onto the plane, stops downward motion, and applies
//! kinetic friction to the tangential velocity.

use vireo_factory::Creatable;
use vireo_scene::{CollisionPipeline, Component, ComponentArgs, SceneGraph};
use vireo_types::{NodeId, Scalar, VireoError, VireoResult};

/// Tangential velocity kept by a DOF in contact with the plane.
const FRICTION_KEEP: Scalar = 0.5;

pub struct GroundPlanePipeline {
    name: String,
    height: Scalar,
    /// Contacts found by the last detection: (node, dof).
    contacts: Vec<(NodeId, usize)>,
}

impl GroundPlanePipeline {
    pub fn new(name: impl Into<String>, height: Scalar) -> Self {
        Self {
            name: name.into(),
            height,
            contacts: Vec::new(),
        }
    }

    pub fn height(&self) -> Scalar {
        self.height
    }

    pub fn contacts(&self) -> &[(NodeId, usize)] {
        &self.contacts
    }
}

impl Creatable<Box<dyn CollisionPipeline>, ComponentArgs> for GroundPlanePipeline {
    fn create(args: &ComponentArgs) -> Option<Box<dyn CollisionPipeline>> {
        match args.get_f64("height") {
            Ok(height) => Some(Box::new(Self::new(args.name_or("ground"), height.unwrap_or(0.0)))),
            Err(e) => {
                tracing::warn!(error = %e, "GroundPlane: rejected arguments");
                None
            }
        }
    }
}

impl Component for GroundPlanePipeline {
    fn name(&self) -> &str {
        &self.name
    }
}

impl CollisionPipeline for GroundPlanePipeline {
    fn reset(&mut self, _: &mut SceneGraph, _: NodeId) -> VireoResult<()> {
        self.contacts.clear();
        Ok(())
    }

    fn detect(&mut self, graph: &mut SceneGraph, node: NodeId) -> VireoResult<usize> {
        let height = self.height;
        let contacts = &mut self.contacts;
        let mut inconsistent = None;
        graph.for_each_state_mut(node, |id, state| {
            if let Err(e) = state.check_lengths() {
                inconsistent.get_or_insert(format!("node {id}: {e}"));
                return;
            }
            for (dof, p) in state.positions.iter().enumerate() {
                if state.inv_masses[dof] > 0.0 && p.y < height {
                    contacts.push((id, dof));
                }
            }
        });
        match inconsistent {
            Some(message) => Err(VireoError::component(&self.name, message)),
            None => Ok(self.contacts.len()),
        }
    }

    fn respond(&mut self, graph: &mut SceneGraph, _: NodeId) -> VireoResult<()> {
        for &(id, dof) in &self.contacts {
            let Some(state) = graph.node_mut(id).and_then(|n| n.mechanical_state_mut()) else {
                continue;
            };
            let (Some(p), Some(v)) = (state.positions.get_mut(dof), state.velocities.get_mut(dof)) else {
                continue;
            };
            p.y = self.height;
            v.x *= FRICTION_KEEP;
            v.z *= FRICTION_KEEP;
            if v.y < 0.0 {
                v.y = 0.0;
            }
        }
        if !self.contacts.is_empty() {
            tracing::trace!(pipeline = %self.name, contacts = self.contacts.len(), "ground contacts resolved");
        }
        Ok(())
    }
}
