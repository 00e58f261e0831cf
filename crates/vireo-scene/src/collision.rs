//! Collision traversal.
//!
//! Runs every collision pipeline found in a subtree: reset, detection,
//! then response. A failing pipeline is recorded and the walk carries on.

use vireo_types::{NodeId, VireoResult};

use crate::component::{CollisionPipeline, Component};
use crate::node::SceneGraph;
use crate::report::ComponentFailure;
use crate::visitor::Visitor;

#[derive(Default)]
pub struct CollisionVisitor {
    passes: u32,
    contacts: usize,
    failures: Vec<ComponentFailure>,
}

impl CollisionVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipelines run so far.
    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Contacts reported so far.
    pub fn contacts(&self) -> usize {
        self.contacts
    }

    pub fn into_failures(self) -> Vec<ComponentFailure> {
        self.failures
    }

    fn run(
        graph: &mut SceneGraph,
        node: NodeId,
        pipeline: &mut dyn CollisionPipeline,
    ) -> VireoResult<usize> {
        pipeline.reset(graph, node)?;
        let contacts = pipeline.detect(graph, node)?;
        pipeline.respond(graph, node)?;
        Ok(contacts)
    }
}

impl Visitor for CollisionVisitor {
    fn name(&self) -> &str {
        "CollisionVisitor"
    }

    fn process_collision_pipeline(
        &mut self,
        graph: &mut SceneGraph,
        node: NodeId,
        pipeline: &mut dyn CollisionPipeline,
    ) {
        self.passes += 1;
        match Self::run(graph, node, pipeline) {
            Ok(contacts) => self.contacts += contacts,
            Err(e) => {
                tracing::warn!(node = %node, pipeline = pipeline.name(), error = %e, "collision pipeline failed");
                self.failures.push(ComponentFailure::new(node, pipeline.name(), &e));
            }
        }
    }
}
