//! Suite: coverage of one test class

use super::{ModelRegistry, Run};
use crate::calculator::{calculate_coverage, Coverage, CoveredElements};
use crate::result::{CoverageError, CoverageResult, EntityKind};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Aggregate of the runs of one test class.
///
/// Suite coverage is never stored; it is always the union of the runs.
#[derive(Debug)]
pub struct Suite {
    id: String,
    name: String,
    /// Insertion order is test execution order
    runs: Vec<Arc<Run>>,
    excluded_keys: BTreeSet<String>,
}

impl Suite {
    /// Create an empty suite
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            runs: Vec::new(),
            excluded_keys: BTreeSet::new(),
        }
    }

    /// Suite id
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name (usually the test class name)
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attach a run, taking ownership of it
    pub fn add_run(&mut self, run: Run) -> CoverageResult<Arc<Run>> {
        if self.get_run(run.id()).is_some() {
            return Err(CoverageError::duplicate(EntityKind::Run, run.id()));
        }
        let run = Arc::new(run);
        self.runs.push(Arc::clone(&run));
        Ok(run)
    }

    /// Look up a child run
    #[must_use]
    pub fn get_run(&self, id: &str) -> Option<&Arc<Run>> {
        self.runs.iter().find(|run| run.id() == id)
    }

    /// Child runs in execution order
    #[must_use]
    pub fn runs(&self) -> &[Arc<Run>] {
        &self.runs
    }

    /// Logical keys excluded from this suite's coverage
    #[must_use]
    pub fn excluded_keys(&self) -> &BTreeSet<String> {
        &self.excluded_keys
    }

    /// Replace the excluded keys
    pub fn set_excluded_keys(&mut self, keys: BTreeSet<String>) {
        self.excluded_keys = keys;
    }

    /// Union of all runs' covered elements
    #[must_use]
    pub fn covered_elements(&self) -> CoveredElements {
        let mut union = CoveredElements::new();
        for run in &self.runs {
            for (definition_id, elements) in run.covered_elements() {
                union.entry(definition_id).or_default().extend(elements);
            }
        }
        union
    }

    /// Coverage of the union against the registry
    #[must_use]
    pub fn calculate_coverage(&self, registry: &ModelRegistry) -> Coverage {
        calculate_coverage(&self.covered_elements(), &self.excluded_keys, registry)
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Suite {} ({}), {} run(s)", self.name, self.id, self.runs.len())?;
        for run in &self.runs {
            write!(f, "\n{run}")?;
        }
        Ok(())
    }
}
