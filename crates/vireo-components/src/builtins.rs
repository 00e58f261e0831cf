//! Startup registration of the built-in components.

use std::sync::Once;

use vireo_factory::{FnCreator, TypeCreator};
use vireo_scene::factory::{
    BehaviorRegistry, ConstraintRegistry, ForceFieldRegistry, PipelineRegistry, SolverRegistry,
};

use crate::euler::EulerExplicitSolver;
use crate::fixed::FixedConstraint;
use crate::gravity::GravityBehavior;
use crate::ground_plane::GroundPlanePipeline;
use crate::spring::SpringForceField;

/// Factory keys of the built-in components.
pub mod keys {
    pub const EULER_EXPLICIT: &str = "EulerExplicit";
    pub const SPRING_FORCE_FIELD: &str = "SpringForceField";
    pub const GRAVITY: &str = "Gravity";
    pub const GROUND_PLANE: &str = "GroundPlane";
    pub const FIXED_CONSTRAINT: &str = "FixedConstraint";
}

static REGISTER: Once = Once::new();

/// Registers every built-in component in the process-wide registries.
///
/// Runs once per process; later calls return immediately. Call it before
/// building scenes from factory keys.
pub fn register_builtins() {
    REGISTER.call_once(|| {
        let registered = [
            TypeCreator::<EulerExplicitSolver>::register(
                SolverRegistry::global(),
                keys::EULER_EXPLICIT.to_string(),
                false,
            ),
            FnCreator::<SpringForceField, _>::register(
                ForceFieldRegistry::global(),
                keys::SPRING_FORCE_FIELD.to_string(),
                SpringForceField::create,
                false,
            ),
            TypeCreator::<GravityBehavior>::register(
                BehaviorRegistry::global(),
                keys::GRAVITY.to_string(),
                false,
            ),
            TypeCreator::<GroundPlanePipeline>::register(
                PipelineRegistry::global(),
                keys::GROUND_PLANE.to_string(),
                false,
            ),
            TypeCreator::<FixedConstraint>::register(
                ConstraintRegistry::global(),
                keys::FIXED_CONSTRAINT.to_string(),
                false,
            ),
        ];
        let accepted = registered.iter().filter(|&&ok| ok).count();
        tracing::debug!(accepted, total = registered.len(), "built-in components registered");
    });
}
