//! Gravity loading.

use glam::DVec3;
use vireo_factory::Creatable;
use vireo_scene::{BehaviorModel, Component, ComponentArgs, SceneGraph};
use vireo_types::constants::GRAVITY;
use vireo_types::{NodeId, Scalar, VireoResult};

/// Adds `m * g` to the external force of every free DOF in the subtree of
/// its node. Placed above a solver node, it runs before that subtree is
/// integrated.
pub struct GravityBehavior {
    name: String,
    gravity: DVec3,
}

impl GravityBehavior {
    pub fn new(name: impl Into<String>, gravity: DVec3) -> Self {
        Self {
            name: name.into(),
            gravity,
        }
    }

    pub fn gravity(&self) -> DVec3 {
        self.gravity
    }
}

impl Creatable<Box<dyn BehaviorModel>, ComponentArgs> for GravityBehavior {
    fn create(args: &ComponentArgs) -> Option<Box<dyn BehaviorModel>> {
        match args.get_vec3("gravity") {
            Ok(gravity) => Some(Box::new(Self::new(
                args.name_or("gravity"),
                gravity.unwrap_or(DVec3::new(0.0, -GRAVITY, 0.0)),
            ))),
            Err(e) => {
                tracing::warn!(error = %e, "Gravity: rejected arguments");
                None
            }
        }
    }
}

impl Component for GravityBehavior {
    fn name(&self) -> &str {
        &self.name
    }
}

impl BehaviorModel for GravityBehavior {
    fn update_position(&mut self, graph: &mut SceneGraph, node: NodeId, _: Scalar) -> VireoResult<()> {
        let g = self.gravity;
        graph.for_each_state_mut(node, |_, state| {
            for (f, &inv_mass) in state.external_forces.iter_mut().zip(&state.inv_masses) {
                if inv_mass > 0.0 {
                    *f += g / inv_mass;
                }
            }
        });
        Ok(())
    }
}
