//! Component role traits — the contracts the traversals invoke.
//!
//! A node holds components per role. The scheduler never names a concrete
//! implementation: solvers, force fields, collision pipelines, behavior
//! models, and constraint sets are reached only through these traits, and
//! are usually built through the factories in [`crate::factory`].
//!
//! Every role extends [`Component`], which carries the component's name and
//! its scene-event hook.

use vireo_types::{NodeId, Scalar, VireoResult};

use crate::event::SceneEvent;
use crate::node::SceneGraph;
use crate::params::{ConstraintParams, ExecParams, MatrixId, MechanicalParams, VecId};
use crate::state::MechanicalState;

/// Base contract shared by every component role.
pub trait Component: Send {
    /// Instance name, used in logs and failure reports.
    fn name(&self) -> &str;

    /// Receives a broadcast scene event. Default: ignore.
    fn handle_event(&mut self, event: &SceneEvent) {
        let _ = event;
    }
}

/// Time integrator for the subtree of the node that owns it.
///
/// The animate traversal calls `solve` exactly once per step, after
/// begin-integration and constraint accumulation, and before positions and
/// velocities are propagated. The solver is detached from its node while it
/// runs, so it may freely borrow the graph.
pub trait OdeSolver: Component {
    fn solve(
        &mut self,
        graph: &mut SceneGraph,
        node: NodeId,
        params: &ExecParams,
        dt: Scalar,
    ) -> VireoResult<()>;
}

/// Force field coupling mechanical states, possibly across nodes.
///
/// Contributions are accumulated into the `force` vector (normally
/// [`VecId::ExternalForce`]) of the states it couples.
pub trait InteractionForceField: Component {
    fn add_force(
        &mut self,
        graph: &mut SceneGraph,
        node: NodeId,
        mparams: &MechanicalParams,
        force: VecId,
    ) -> VireoResult<()>;
}

/// Free-form model that updates its own state once per step.
pub trait BehaviorModel: Component {
    fn update_position(&mut self, graph: &mut SceneGraph, node: NodeId, dt: Scalar) -> VireoResult<()>;
}

/// Collision detection and response over a subtree.
///
/// Invoked in order: `reset`, `detect`, `respond`.
pub trait CollisionPipeline: Component {
    fn reset(&mut self, graph: &mut SceneGraph, node: NodeId) -> VireoResult<()> {
        let _ = (graph, node);
        Ok(())
    }

    /// Returns the number of contacts found.
    fn detect(&mut self, graph: &mut SceneGraph, node: NodeId) -> VireoResult<usize>;

    fn respond(&mut self, graph: &mut SceneGraph, node: NodeId) -> VireoResult<()>;
}

/// Source of constraint rows for the mechanical state of its node.
pub trait ConstraintSet: Component {
    /// Called when accumulated constraints are discarded at the start of a step.
    fn reset_constraint(&mut self) {}

    /// Appends rows to `state`, numbering them from `*next_id` and
    /// advancing the counter past the rows it used.
    fn build_constraint_matrix(
        &mut self,
        state: &mut MechanicalState,
        cparams: &ConstraintParams,
        matrix: MatrixId,
        next_id: &mut u32,
    );
}
