//! Compensation-event hook
//!
//! A compensation trigger dispatched to a boundary event does not pass through
//! the execution listeners, so the boundary event has to be recorded here.

use crate::collector::CoverageCollector;
use std::sync::Arc;

/// A compensation dispatched to a boundary event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompensationTrigger {
    /// Version-specific id of the executing definition
    pub definition_id: String,
    /// Compensation boundary event
    pub boundary_event_id: String,
    /// Activity attached as compensation handler, if known
    pub handler_activity_id: Option<String>,
}

impl CompensationTrigger {
    /// Trigger for a boundary event without handler information
    #[must_use]
    pub fn new(definition_id: impl Into<String>, boundary_event_id: impl Into<String>) -> Self {
        Self {
            definition_id: definition_id.into(),
            boundary_event_id: boundary_event_id.into(),
            handler_activity_id: None,
        }
    }

    /// Attach the compensation handler activity
    #[must_use]
    pub fn with_handler(mut self, activity_id: impl Into<String>) -> Self {
        self.handler_activity_id = Some(activity_id.into());
        self
    }
}

/// Called when the engine dispatches compensation to a boundary event
pub trait CompensationHook: Send + Sync {
    /// The boundary event of `definition_id` was triggered
    fn on_compensation_triggered(&self, definition_id: &str, boundary_element_id: &str);

    /// Handle a full trigger; records the boundary event only by default
    fn on_trigger(&self, trigger: &CompensationTrigger) {
        self.on_compensation_triggered(&trigger.definition_id, &trigger.boundary_event_id);
    }
}

/// Records compensation boundary events (and their handlers) into a collector
#[derive(Debug, Clone)]
pub struct CompensationEventCoverageHandler {
    collector: Arc<CoverageCollector>,
}

impl CompensationEventCoverageHandler {
    /// Create a handler recording into `collector`
    #[must_use]
    pub fn new(collector: Arc<CoverageCollector>) -> Self {
        Self { collector }
    }
}

impl CompensationHook for CompensationEventCoverageHandler {
    fn on_compensation_triggered(&self, definition_id: &str, boundary_element_id: &str) {
        self.collector
            .record_element_covered(definition_id, boundary_element_id);
    }

    fn on_trigger(&self, trigger: &CompensationTrigger) {
        self.on_compensation_triggered(&trigger.definition_id, &trigger.boundary_event_id);
        if let Some(handler) = &trigger.handler_activity_id {
            self.collector
                .record_element_covered(&trigger.definition_id, handler);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Run, Suite};

    fn active_collector() -> Arc<CoverageCollector> {
        let collector = Arc::new(CoverageCollector::default());
        collector.create_suite(Suite::new("s", "S")).unwrap();
        collector.activate_suite("s").unwrap();
        collector.create_run(Run::new("r", "m"), "s").unwrap();
        collector.activate_run("r").unwrap();
        collector
    }

    #[test]
    fn test_boundary_event_recorded_once() {
        let collector = active_collector();
        let handler = CompensationEventCoverageHandler::new(Arc::clone(&collector));
        let trigger = CompensationTrigger::new("p:1:x", "CompensateTask");

        handler.on_trigger(&trigger);
        handler.on_trigger(&trigger);

        let run = collector.get_run("r").unwrap();
        assert!(run.is_covered("p:1:x", "CompensateTask"));
        assert_eq!(run.covered_count(), 1);
    }

    #[test]
    fn test_handler_activity_recorded() {
        let collector = active_collector();
        let handler = CompensationEventCoverageHandler::new(Arc::clone(&collector));
        handler.on_trigger(&CompensationTrigger::new("p:1:x", "CompensateTask").with_handler("UndoBooking"));

        let run = collector.get_run("r").unwrap();
        assert!(run.is_covered("p:1:x", "UndoBooking"));
        assert_eq!(run.covered_count(), 2);
    }
}
