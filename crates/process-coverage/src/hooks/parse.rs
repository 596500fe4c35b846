//! Parse-time hook: fills the model registry on deployment

use crate::model::{ModelRegistry, ProcessDefinition, ProcessModelSnapshot};
use std::sync::Arc;
use tracing::{debug, trace};

/// Called once per deployed process definition
pub trait ParseHook: Send + Sync {
    /// A definition was parsed and is about to be deployed
    fn on_definition_parsed(&self, definition: &ProcessDefinition);
}

/// Registers every flow node and sequence flow of a parsed definition
#[derive(Debug, Clone)]
pub struct ElementCoverageParseListener {
    models: Arc<ModelRegistry>,
}

impl ElementCoverageParseListener {
    /// Create a listener writing into `models`
    #[must_use]
    pub fn new(models: Arc<ModelRegistry>) -> Self {
        Self { models }
    }
}

impl ParseHook for ElementCoverageParseListener {
    fn on_definition_parsed(&self, definition: &ProcessDefinition) {
        let snapshot = ProcessModelSnapshot::from_definition(definition);
        let elements = snapshot.len();
        if self.models.register(snapshot) {
            debug!(
                definition_id = %definition.id,
                key = %definition.key,
                version = definition.version,
                elements,
                "registered process model"
            );
        } else {
            trace!(definition_id = %definition.id, "process model already registered");
        }
    }
}
