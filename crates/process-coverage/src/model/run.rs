//! Run: coverage of one test method
//!
//! Engine worker threads record into the active run concurrently, so the
//! covered-set map sits behind a mutex and every insert is a set-add.

// Allow expect for Mutex - lock poisoning is truly exceptional
#![allow(clippy::expect_used)]

use super::{DefinitionId, ElementId, ModelRegistry};
use crate::calculator::{calculate_coverage, Coverage, CoveredElements};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::Mutex;

/// Leaf coverage aggregate for one test method execution
#[derive(Debug)]
pub struct Run {
    id: String,
    name: String,
    covered: Mutex<HashMap<DefinitionId, HashSet<ElementId>>>,
}

impl Run {
    /// Create a run with no recorded coverage
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            covered: Mutex::new(HashMap::new()),
        }
    }

    /// Run id
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name (usually the test method name)
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mark an element covered.
    ///
    /// Returns `true` if the element was not covered before.
    pub fn record(&self, definition_id: &DefinitionId, element_id: &ElementId) -> bool {
        let mut covered = self.covered.lock().expect("lock poisoned");
        if let Some(elements) = covered.get_mut(definition_id) {
            return elements.insert(element_id.clone());
        }
        let _ = covered.insert(
            definition_id.clone(),
            HashSet::from([element_id.clone()]),
        );
        true
    }

    /// Whether an element has been covered in this run
    #[must_use]
    pub fn is_covered(&self, definition_id: &str, element_id: &str) -> bool {
        self.covered
            .lock()
            .expect("lock poisoned")
            .get(definition_id)
            .is_some_and(|elements| elements.contains(element_id))
    }

    /// Copy of the covered elements, ordered for reporting
    #[must_use]
    pub fn covered_elements(&self) -> CoveredElements {
        self.covered
            .lock()
            .expect("lock poisoned")
            .iter()
            .map(|(definition_id, elements)| {
                (
                    definition_id.clone(),
                    elements.iter().cloned().collect::<BTreeSet<_>>(),
                )
            })
            .collect()
    }

    /// Total number of distinct covered elements across definitions
    #[must_use]
    pub fn covered_count(&self) -> usize {
        self.covered
            .lock()
            .expect("lock poisoned")
            .values()
            .map(HashSet::len)
            .sum()
    }

    /// Coverage of this run against the registry
    #[must_use]
    pub fn calculate_coverage(
        &self,
        registry: &ModelRegistry,
        excluded_keys: &BTreeSet<String>,
    ) -> Coverage {
        calculate_coverage(&self.covered_elements(), excluded_keys, registry)
    }
}

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Run {} ({})", self.name, self.id)?;
        for (definition_id, elements) in &self.covered_elements() {
            write!(f, "\n  {definition_id}:")?;
            for element in elements {
                write!(f, " {element}")?;
            }
        }
        Ok(())
    }
}
