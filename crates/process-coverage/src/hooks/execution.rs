//! Runtime execution hook

use crate::collector::CoverageCollector;
use std::sync::Arc;

/// Engine view of the execution that just moved
pub trait ExecutionContext {
    /// Version-specific id of the executing definition
    fn process_definition_id(&self) -> &str;

    /// Flow node or sequence flow being completed/taken, if any
    fn current_element_id(&self) -> Option<&str>;
}

/// Called on every flow-node completion and sequence-flow traversal
pub trait ExecutionHook: Send + Sync {
    /// An element of `definition_id` was traversed
    fn on_element_traversed(&self, definition_id: &str, element_id: &str);

    /// Resolve the ids from an execution and report the traversal
    fn on_execution(&self, execution: &dyn ExecutionContext) {
        if let Some(element_id) = execution.current_element_id() {
            self.on_element_traversed(execution.process_definition_id(), element_id);
        }
    }
}

/// Forwards traversals to a collector
#[derive(Debug, Clone)]
pub struct ElementCoverageExecutionListener {
    collector: Arc<CoverageCollector>,
}

impl ElementCoverageExecutionListener {
    /// Create a listener recording into `collector`
    #[must_use]
    pub fn new(collector: Arc<CoverageCollector>) -> Self {
        Self { collector }
    }
}

impl ExecutionHook for ElementCoverageExecutionListener {
    fn on_element_traversed(&self, definition_id: &str, element_id: &str) {
        self.collector
            .record_element_covered(definition_id, element_id);
    }
}
