//! Model Registry
//!
//! Read-mostly store of every deployed definition's coverable elements, keyed
//! by version-specific definition id. Entries are append-only: registering an
//! id twice keeps the first snapshot, so a run's denominator never moves
//! underneath it.

// Allow expect for RwLock - lock poisoning is truly exceptional
#![allow(clippy::expect_used)]

use super::{CoverableElement, DefinitionId, ElementId, ElementKind, ProcessDefinition};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, RwLock};

/// Immutable element universe of one deployed definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessModelSnapshot {
    definition_id: DefinitionId,
    key: String,
    version: u32,
    /// Document order, first occurrence wins
    elements: Vec<CoverableElement>,
    element_ids: HashSet<ElementId>,
}

impl ProcessModelSnapshot {
    /// Build a snapshot, dropping repeated element ids
    #[must_use]
    pub fn new(
        definition_id: impl Into<DefinitionId>,
        key: impl Into<String>,
        version: u32,
        elements: impl IntoIterator<Item = CoverableElement>,
    ) -> Self {
        let mut element_ids = HashSet::new();
        let elements = elements
            .into_iter()
            .filter(|element| element_ids.insert(element.id.clone()))
            .collect();
        Self {
            definition_id: definition_id.into(),
            key: key.into(),
            version,
            elements,
            element_ids,
        }
    }

    /// Snapshot of a parsed definition
    #[must_use]
    pub fn from_definition(definition: &ProcessDefinition) -> Self {
        Self::new(
            definition.id.clone(),
            definition.key.clone(),
            definition.version,
            definition.coverable_elements(),
        )
    }

    /// Version-specific id
    #[must_use]
    pub fn definition_id(&self) -> &DefinitionId {
        &self.definition_id
    }

    /// Logical key
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Deployment version
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Coverable elements in document order
    #[must_use]
    pub fn elements(&self) -> &[CoverableElement] {
        &self.elements
    }

    /// Set of coverable element ids
    #[must_use]
    pub fn element_ids(&self) -> &HashSet<ElementId> {
        &self.element_ids
    }

    /// Whether the element belongs to this model
    #[must_use]
    pub fn contains(&self, element_id: &str) -> bool {
        self.element_ids.contains(element_id)
    }

    /// Number of coverable elements
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the model has no coverable elements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of elements of one kind
    #[must_use]
    pub fn count_of(&self, kind: ElementKind) -> usize {
        self.elements.iter().filter(|e| e.kind == kind).count()
    }
}

/// Process-wide cache of model snapshots
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: RwLock<BTreeMap<DefinitionId, Arc<ProcessModelSnapshot>>>,
}

impl ModelRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a snapshot.
    ///
    /// Returns `false` when the id was already registered; the existing
    /// snapshot is kept.
    pub fn register(&self, snapshot: ProcessModelSnapshot) -> bool {
        let mut models = self.models.write().expect("lock poisoned");
        if models.contains_key(snapshot.definition_id()) {
            return false;
        }
        let _ = models.insert(snapshot.definition_id().clone(), Arc::new(snapshot));
        true
    }

    /// Register a definition id with its ordered elements
    pub fn register_elements(
        &self,
        definition_id: impl Into<DefinitionId>,
        key: impl Into<String>,
        version: u32,
        elements: impl IntoIterator<Item = CoverableElement>,
    ) -> bool {
        self.register(ProcessModelSnapshot::new(definition_id, key, version, elements))
    }

    /// Look up a snapshot by definition id
    #[must_use]
    pub fn snapshot(&self, definition_id: &str) -> Option<Arc<ProcessModelSnapshot>> {
        self.models
            .read()
            .expect("lock poisoned")
            .get(definition_id)
            .cloned()
    }

    /// All snapshots, ordered by definition id
    #[must_use]
    pub fn snapshots(&self) -> Vec<Arc<ProcessModelSnapshot>> {
        self.models
            .read()
            .expect("lock poisoned")
            .values()
            .cloned()
            .collect()
    }

    /// Whether a definition id is registered
    #[must_use]
    pub fn contains(&self, definition_id: &str) -> bool {
        self.models
            .read()
            .expect("lock poisoned")
            .contains_key(definition_id)
    }

    /// Number of registered definitions
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.read().expect("lock poisoned").len()
    }

    /// Whether nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_v1() -> ProcessModelSnapshot {
        ProcessModelSnapshot::new(
            "order-process:1:a",
            "order-process",
            1,
            ["A", "B", "C"]
                .into_iter()
                .map(|id| CoverableElement::new(id, ElementKind::Task)),
        )
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = ModelRegistry::new();
        assert!(registry.register(order_v1()));

        let snapshot = registry.snapshot("order-process:1:a").unwrap();
        assert_eq!(snapshot.key(), "order-process");
        assert_eq!(snapshot.len(), 3);
        assert!(snapshot.contains("B"));
        assert!(registry.snapshot("order-process:2:b").is_none());
    }

    #[test]
    fn test_reregistration_is_noop() {
        let registry = ModelRegistry::new();
        assert!(registry.register(order_v1()));

        let replacement = ProcessModelSnapshot::new(
            "order-process:1:a",
            "order-process",
            1,
            [CoverableElement::new("Z", ElementKind::Task)],
        );
        assert!(!registry.register(replacement));

        let snapshot = registry.snapshot("order-process:1:a").unwrap();
        assert_eq!(snapshot.len(), 3);
        assert!(!snapshot.contains("Z"));
    }

    #[test]
    fn test_new_version_is_separate_entry() {
        let registry = ModelRegistry::new();
        registry.register(order_v1());
        registry.register_elements(
            "order-process:2:b",
            "order-process",
            2,
            [CoverableElement::new("A", ElementKind::Task)],
        );

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.snapshot("order-process:1:a").unwrap().len(), 3);
        assert_eq!(registry.snapshot("order-process:2:b").unwrap().len(), 1);
    }

    #[test]
    fn test_snapshot_dedups_elements_keeping_order() {
        let snapshot = ProcessModelSnapshot::new(
            "p:1:x",
            "p",
            1,
            [
                CoverableElement::new("A", ElementKind::Event),
                CoverableElement::new("F", ElementKind::SequenceFlow),
                CoverableElement::new("A", ElementKind::Task),
            ],
        );
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.elements()[0].kind, ElementKind::Event);
        assert_eq!(snapshot.count_of(ElementKind::SequenceFlow), 1);
    }

    #[test]
    fn test_snapshots_ordered_by_id() {
        let registry = ModelRegistry::new();
        registry.register_elements("b:1:x", "b", 1, []);
        registry.register_elements("a:1:x", "a", 1, []);
        let ids: Vec<_> = registry
            .snapshots()
            .iter()
            .map(|s| s.definition_id().to_string())
            .collect();
        assert_eq!(ids, vec!["a:1:x", "b:1:x"]);
    }
}
