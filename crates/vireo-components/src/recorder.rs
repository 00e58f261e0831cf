//! Scene event recorder.

use std::sync::Arc;

use parking_lot::Mutex;
use vireo_scene::{Component, SceneEvent};

/// Listener that keeps every scene event it receives.
///
/// The recorded list is shared, so it stays readable after the recorder
/// has been attached to a node.
pub struct EventRecorder {
    name: String,
    events: Arc<Mutex<Vec<SceneEvent>>>,
}

impl EventRecorder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the recorded events.
    pub fn events(&self) -> Arc<Mutex<Vec<SceneEvent>>> {
        Arc::clone(&self.events)
    }
}

impl Component for EventRecorder {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle_event(&mut self, event: &SceneEvent) {
        self.events.lock().push(*event);
    }
}
