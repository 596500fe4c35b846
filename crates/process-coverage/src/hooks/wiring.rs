//! Explicit hook wiring for an engine configuration
//!
//! The engine is handed direct references to the recorders at setup time.
//! Nothing is discovered by scanning listener lists; a recorder that is not
//! wired is reported by [`EngineHooks::verify`].

use super::{
    CompensationEventCoverageHandler, CompensationHook, CompensationTrigger,
    ElementCoverageExecutionListener, ElementCoverageParseListener, ExecutionHook, ParseHook,
};
use crate::collector::CoverageCollector;
use crate::model::ProcessDefinition;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// A hook the engine configuration does not carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WiringWarning {
    /// Definitions will not be registered; every ratio stays undefined
    MissingParseHook,
    /// Normal traversals will not be recorded
    MissingExecutionHook,
    /// Compensation boundary events will not be recorded
    MissingCompensationHook,
}

impl WiringWarning {
    /// Human-readable description
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::MissingParseHook => {
                "ElementCoverageParseListener not registered with process engine configuration! \
                 Process models will not be registered."
            }
            Self::MissingExecutionHook => {
                "ElementCoverageExecutionListener not registered with process engine configuration! \
                 Element traversals will not be recorded."
            }
            Self::MissingCompensationHook => {
                "CompensationEventCoverageHandler not registered with process engine configuration! \
                 Compensation boundary events coverage will not be registered."
            }
        }
    }
}

impl fmt::Display for WiringWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Recorders handed to the engine configuration
#[derive(Clone, Default)]
pub struct EngineHooks {
    parse: Option<Arc<dyn ParseHook>>,
    execution: Option<Arc<dyn ExecutionHook>>,
    compensation: Option<Arc<dyn CompensationHook>>,
}

impl fmt::Debug for EngineHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineHooks")
            .field("parse", &self.parse.is_some())
            .field("execution", &self.execution.is_some())
            .field("compensation", &self.compensation.is_some())
            .finish()
    }
}

impl EngineHooks {
    /// No hooks wired
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All three coverage recorders on top of one collector
    #[must_use]
    pub fn wire(collector: &Arc<CoverageCollector>) -> Self {
        Self::new()
            .with_parse_hook(Arc::new(ElementCoverageParseListener::new(
                collector.shared_models(),
            )))
            .with_execution_hook(Arc::new(ElementCoverageExecutionListener::new(
                Arc::clone(collector),
            )))
            .with_compensation_hook(Arc::new(CompensationEventCoverageHandler::new(
                Arc::clone(collector),
            )))
    }

    /// Set the parse-time hook
    #[must_use]
    pub fn with_parse_hook(mut self, hook: Arc<dyn ParseHook>) -> Self {
        self.parse = Some(hook);
        self
    }

    /// Set the execution hook
    #[must_use]
    pub fn with_execution_hook(mut self, hook: Arc<dyn ExecutionHook>) -> Self {
        self.execution = Some(hook);
        self
    }

    /// Set the compensation hook
    #[must_use]
    pub fn with_compensation_hook(mut self, hook: Arc<dyn CompensationHook>) -> Self {
        self.compensation = Some(hook);
        self
    }

    /// Remove the compensation hook
    #[must_use]
    pub fn without_compensation_hook(mut self) -> Self {
        self.compensation = None;
        self
    }

    /// Parse-time hook, if wired
    #[must_use]
    pub fn parse_hook(&self) -> Option<&Arc<dyn ParseHook>> {
        self.parse.as_ref()
    }

    /// Execution hook, if wired
    #[must_use]
    pub fn execution_hook(&self) -> Option<&Arc<dyn ExecutionHook>> {
        self.execution.as_ref()
    }

    /// Compensation hook, if wired
    #[must_use]
    pub fn compensation_hook(&self) -> Option<&Arc<dyn CompensationHook>> {
        self.compensation.as_ref()
    }

    /// Report every missing hook, logging each as a warning
    pub fn verify(&self) -> Vec<WiringWarning> {
        let mut warnings = Vec::new();
        if self.parse.is_none() {
            warnings.push(WiringWarning::MissingParseHook);
        }
        if self.execution.is_none() {
            warnings.push(WiringWarning::MissingExecutionHook);
        }
        if self.compensation.is_none() {
            warnings.push(WiringWarning::MissingCompensationHook);
        }
        for warning in &warnings {
            warn!("{warning}");
        }
        warnings
    }

    /// Engine-side dispatch: a definition was deployed
    pub fn definition_deployed(&self, definition: &ProcessDefinition) {
        if let Some(hook) = &self.parse {
            hook.on_definition_parsed(definition);
        }
    }

    /// Engine-side dispatch: an element was traversed
    pub fn element_traversed(&self, definition_id: &str, element_id: &str) {
        if let Some(hook) = &self.execution {
            hook.on_element_traversed(definition_id, element_id);
        }
    }

    /// Engine-side dispatch: compensation reached a boundary event
    pub fn compensation_triggered(&self, trigger: &CompensationTrigger) {
        if let Some(hook) = &self.compensation {
            hook.on_trigger(trigger);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementKind, FlowNode, Run, Suite};

    #[test]
    fn test_wired_hooks_verify_clean() {
        let collector = Arc::new(CoverageCollector::default());
        let hooks = EngineHooks::wire(&collector);
        assert!(hooks.verify().is_empty());
    }

    #[test]
    fn test_missing_compensation_is_warning() {
        let collector = Arc::new(CoverageCollector::default());
        let hooks = EngineHooks::wire(&collector).without_compensation_hook();
        assert_eq!(hooks.verify(), vec![WiringWarning::MissingCompensationHook]);
        assert!(WiringWarning::MissingCompensationHook
            .to_string()
            .contains("Compensation boundary events coverage will not be registered"));
    }

    #[test]
    fn test_empty_hooks_report_all_missing() {
        assert_eq!(EngineHooks::new().verify().len(), 3);
    }

    #[test]
    fn test_unwired_compensation_is_silently_unrecorded() {
        let collector = Arc::new(CoverageCollector::default());
        let hooks = EngineHooks::wire(&collector).without_compensation_hook();
        collector.create_suite(Suite::new("s", "S")).unwrap();
        collector.activate_suite("s").unwrap();
        collector.create_run(Run::new("r", "m"), "s").unwrap();
        collector.activate_run("r").unwrap();

        hooks.compensation_triggered(&CompensationTrigger::new("p:1:x", "CompensateTask"));
        assert_eq!(collector.get_run("r").unwrap().covered_count(), 0);
    }

    #[test]
    fn test_dispatch_reaches_collector() {
        let collector = Arc::new(CoverageCollector::default());
        let hooks = EngineHooks::wire(&collector);
        hooks.definition_deployed(
            &ProcessDefinition::new("p:1:x", "p", 1)
                .with_node(FlowNode::new("A", ElementKind::Task)),
        );
        assert!(collector.get_models().contains("p:1:x"));

        collector.create_suite(Suite::new("s", "S")).unwrap();
        collector.activate_suite("s").unwrap();
        collector.create_run(Run::new("r", "m"), "s").unwrap();
        collector.activate_run("r").unwrap();
        hooks.element_traversed("p:1:x", "A");
        assert_eq!(collector.run_coverage("r").unwrap().ratio, Some(1.0));
    }
}
