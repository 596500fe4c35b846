//! Coverage Collector
//!
//! Central state holder for one test worker. Tracks the active suite and run
//! and routes element-covered events into the active run.
//!
//! ```text
//!   Idle ──activate_suite──► SuiteActive ──activate_run──► RunActive
//!    ▲                        │    ▲                          │
//!    └──────finish_suite──────┘    └────────finish_run────────┘
//! ```
//!
//! Lifecycle transitions happen on the test-driver thread. Recording happens
//! on any engine thread; the active run pointer is behind its own lock so a
//! worker spawned after `activate_run` observes the new run.

// Allow expect for RwLock - lock poisoning is truly exceptional
#![allow(clippy::expect_used)]

use crate::calculator::Coverage;
use crate::model::{DefinitionId, ElementId, ModelRegistry, Run, Suite};
use crate::report::{RunReport, SuiteReport};
use crate::result::{CoverageError, CoverageResult, EntityKind};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, trace};
use uuid::Uuid;

/// Lifecycle state of a collector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorState {
    /// No suite active
    Idle,
    /// A suite is active, no run
    SuiteActive,
    /// A run of the active suite is active
    RunActive,
}

#[derive(Debug, Default)]
struct Lifecycle {
    suites: HashMap<String, Suite>,
    active_suite: Option<String>,
    /// Run ids are unique for the collector's lifetime, across suites
    run_ids: HashSet<String>,
    excluded_keys: BTreeSet<String>,
}

impl Lifecycle {
    fn active_suite(&self) -> Option<&Suite> {
        self.active_suite
            .as_deref()
            .and_then(|id| self.suites.get(id))
    }

    fn find_run(&self, run_id: &str) -> Option<&Arc<Run>> {
        self.suites.values().find_map(|suite| suite.get_run(run_id))
    }
}

/// Coverage collector for one test worker
#[derive(Debug)]
pub struct CoverageCollector {
    instance_id: Uuid,
    models: Arc<ModelRegistry>,
    lifecycle: RwLock<Lifecycle>,
    active_run: RwLock<Option<Arc<Run>>>,
}

impl Default for CoverageCollector {
    fn default() -> Self {
        Self::new(Arc::new(ModelRegistry::new()))
    }
}

impl CoverageCollector {
    /// Create a collector over a (possibly shared) model registry
    #[must_use]
    pub fn new(models: Arc<ModelRegistry>) -> Self {
        Self {
            instance_id: Uuid::new_v4(),
            models,
            lifecycle: RwLock::new(Lifecycle::default()),
            active_run: RwLock::new(None),
        }
    }

    /// Unique id of this collector, attached to its log events
    #[must_use]
    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    /// Read-only view of the model registry
    #[must_use]
    pub fn get_models(&self) -> &ModelRegistry {
        &self.models
    }

    /// Shared handle to the registry, for the parse-time hook
    #[must_use]
    pub fn shared_models(&self) -> Arc<ModelRegistry> {
        Arc::clone(&self.models)
    }

    /// Register a new suite
    pub fn create_suite(&self, mut suite: Suite) -> CoverageResult<()> {
        let mut lifecycle = self.lifecycle.write().expect("lock poisoned");
        if lifecycle.suites.contains_key(suite.id()) {
            return Err(CoverageError::duplicate(EntityKind::Suite, suite.id()));
        }
        suite.set_excluded_keys(lifecycle.excluded_keys.clone());
        info!(
            collector = %self.instance_id,
            suite_id = suite.id(),
            suite = suite.name(),
            "created suite"
        );
        let _ = lifecycle.suites.insert(suite.id().to_string(), suite);
        Ok(())
    }

    /// Make a created suite the active one.
    ///
    /// Switching to a different suite leaves any active run.
    pub fn activate_suite(&self, id: &str) -> CoverageResult<()> {
        let mut lifecycle = self.lifecycle.write().expect("lock poisoned");
        if !lifecycle.suites.contains_key(id) {
            return Err(CoverageError::not_found(EntityKind::Suite, id));
        }
        if lifecycle.active_suite.as_deref() != Some(id) {
            *self.active_run.write().expect("lock poisoned") = None;
        }
        lifecycle.active_suite = Some(id.to_string());
        debug!(collector = %self.instance_id, suite_id = id, "activated suite");
        Ok(())
    }

    /// Replace the excluded logical keys.
    ///
    /// Applies to every later calculation, including over data already
    /// recorded.
    pub fn set_excluded_process_definition_keys<I, S>(&self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: BTreeSet<String> = keys.into_iter().map(Into::into).collect();
        let mut lifecycle = self.lifecycle.write().expect("lock poisoned");
        for suite in lifecycle.suites.values_mut() {
            suite.set_excluded_keys(keys.clone());
        }
        debug!(collector = %self.instance_id, excluded = ?keys, "set excluded keys");
        lifecycle.excluded_keys = keys;
    }

    /// Currently excluded logical keys
    #[must_use]
    pub fn excluded_keys(&self) -> BTreeSet<String> {
        self.lifecycle
            .read()
            .expect("lock poisoned")
            .excluded_keys
            .clone()
    }

    /// Attach a run to a created suite
    pub fn create_run(&self, run: Run, suite_id: &str) -> CoverageResult<()> {
        let mut lifecycle = self.lifecycle.write().expect("lock poisoned");
        if lifecycle.run_ids.contains(run.id()) {
            return Err(CoverageError::duplicate(EntityKind::Run, run.id()));
        }
        let Some(suite) = lifecycle.suites.get_mut(suite_id) else {
            return Err(CoverageError::not_found(EntityKind::Suite, suite_id));
        };
        let run = suite.add_run(run)?;
        info!(
            collector = %self.instance_id,
            suite_id,
            run_id = run.id(),
            run = run.name(),
            "created run"
        );
        let _ = lifecycle.run_ids.insert(run.id().to_string());
        Ok(())
    }

    /// Make a run of the active suite the active run
    pub fn activate_run(&self, id: &str) -> CoverageResult<()> {
        let lifecycle = self.lifecycle.read().expect("lock poisoned");
        let run = lifecycle
            .active_suite()
            .and_then(|suite| suite.get_run(id))
            .ok_or_else(|| CoverageError::not_found(EntityKind::Run, id))?;
        *self.active_run.write().expect("lock poisoned") = Some(Arc::clone(run));
        debug!(collector = %self.instance_id, run_id = id, "activated run");
        Ok(())
    }

    /// Leave the active run, returning to the suite. Returns the run's id.
    pub fn finish_run(&self) -> CoverageResult<String> {
        let _lifecycle = self.lifecycle.write().expect("lock poisoned");
        let run = self
            .active_run
            .write()
            .expect("lock poisoned")
            .take()
            .ok_or_else(|| CoverageError::not_found(EntityKind::Run, "<active>"))?;
        debug!(collector = %self.instance_id, run_id = run.id(), "finished run");
        Ok(run.id().to_string())
    }

    /// Leave the active suite and hand it over for reporting
    pub fn finish_suite(&self) -> CoverageResult<Suite> {
        let mut lifecycle = self.lifecycle.write().expect("lock poisoned");
        let id = lifecycle
            .active_suite
            .take()
            .ok_or(CoverageError::NoActiveSuite)?;
        *self.active_run.write().expect("lock poisoned") = None;
        let suite = lifecycle
            .suites
            .remove(&id)
            .ok_or_else(|| CoverageError::not_found(EntityKind::Suite, id.as_str()))?;
        for run in suite.runs() {
            let _ = lifecycle.run_ids.remove(run.id());
        }
        debug!(collector = %self.instance_id, suite_id = %id, "finished suite");
        Ok(suite)
    }

    /// Drop all suites and runs and return to idle. Exclusions are kept.
    pub fn clear(&self) {
        let mut lifecycle = self.lifecycle.write().expect("lock poisoned");
        *self.active_run.write().expect("lock poisoned") = None;
        lifecycle.suites.clear();
        lifecycle.run_ids.clear();
        lifecycle.active_suite = None;
        debug!(collector = %self.instance_id, "cleared");
    }

    /// Record a traversed element into the active run.
    ///
    /// Without an active run the event is dropped: engine activity outside a
    /// tracked test (e.g. deployment validation) is expected.
    pub fn record_element_covered(&self, definition_id: &str, element_id: &str) {
        let active = self.active_run.read().expect("lock poisoned").clone();
        match active {
            Some(run) => {
                let _ = run.record(
                    &DefinitionId::new(definition_id),
                    &ElementId::new(element_id),
                );
            }
            None => trace!(
                collector = %self.instance_id,
                definition_id,
                element_id,
                "dropped coverage event outside an active run"
            ),
        }
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> CollectorState {
        let lifecycle = self.lifecycle.read().expect("lock poisoned");
        if lifecycle.active_suite.is_none() {
            CollectorState::Idle
        } else if self.active_run.read().expect("lock poisoned").is_some() {
            CollectorState::RunActive
        } else {
            CollectorState::SuiteActive
        }
    }

    /// Id of the active suite
    #[must_use]
    pub fn active_suite_id(&self) -> Option<String> {
        self.lifecycle
            .read()
            .expect("lock poisoned")
            .active_suite
            .clone()
    }

    /// Id of the active run
    #[must_use]
    pub fn active_run_id(&self) -> Option<String> {
        self.active_run()
            .map(|run| run.id().to_string())
    }

    /// The active run
    #[must_use]
    pub fn active_run(&self) -> Option<Arc<Run>> {
        self.active_run.read().expect("lock poisoned").clone()
    }

    /// Look up a run of any registered suite
    #[must_use]
    pub fn get_run(&self, run_id: &str) -> Option<Arc<Run>> {
        self.lifecycle
            .read()
            .expect("lock poisoned")
            .find_run(run_id)
            .cloned()
    }

    /// Borrow the active suite
    pub fn with_active_suite<R>(&self, f: impl FnOnce(&Suite) -> R) -> CoverageResult<R> {
        let lifecycle = self.lifecycle.read().expect("lock poisoned");
        lifecycle
            .active_suite()
            .map(f)
            .ok_or(CoverageError::NoActiveSuite)
    }

    /// Coverage of one run with the collector's exclusions
    pub fn run_coverage(&self, run_id: &str) -> CoverageResult<Coverage> {
        let lifecycle = self.lifecycle.read().expect("lock poisoned");
        let run = lifecycle
            .find_run(run_id)
            .ok_or_else(|| CoverageError::not_found(EntityKind::Run, run_id))?;
        Ok(run.calculate_coverage(&self.models, &lifecycle.excluded_keys))
    }

    /// Coverage of the active suite
    pub fn suite_coverage(&self) -> CoverageResult<Coverage> {
        self.with_active_suite(|suite| suite.calculate_coverage(&self.models))
    }

    /// Report for one run
    pub fn run_report(&self, run_id: &str) -> CoverageResult<RunReport> {
        let lifecycle = self.lifecycle.read().expect("lock poisoned");
        let run = lifecycle
            .find_run(run_id)
            .ok_or_else(|| CoverageError::not_found(EntityKind::Run, run_id))?;
        Ok(RunReport::build(run, &self.models, &lifecycle.excluded_keys))
    }

    /// Fully computed report tree of the active suite
    pub fn suite_report(&self) -> CoverageResult<SuiteReport> {
        self.with_active_suite(|suite| SuiteReport::build(suite, &self.models))
    }
}
