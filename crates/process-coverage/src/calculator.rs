//! Coverage Calculator
//!
//! Pure function from covered elements, excluded keys and the registry to a
//! ratio plus a per-definition breakdown. Exclusions are applied here and
//! nowhere else, so changing them re-scores data that is already recorded.
//!
//! A definition with no coverable elements contributes 0/0. When every
//! counted definition is empty (or none is counted) the ratio is undefined
//! and reported as `None`.

use crate::model::{DefinitionId, ElementId, ModelRegistry};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Covered element ids grouped by definition id
pub type CoveredElements = BTreeMap<DefinitionId, BTreeSet<ElementId>>;

/// Coverage of a single definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionCoverage {
    /// Version-specific id
    pub definition_id: DefinitionId,
    /// Logical key
    pub key: String,
    /// Deployment version
    pub version: u32,
    /// Coverable elements that were covered
    pub covered: usize,
    /// Coverable elements in the model
    pub total: usize,
    /// `covered / total`, `None` for an empty model
    pub ratio: Option<f64>,
    /// Covered element ids, in model order
    pub covered_element_ids: Vec<ElementId>,
    /// Uncovered element ids, in model order
    pub uncovered_element_ids: Vec<ElementId>,
}

/// Aggregate coverage over all counted definitions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    /// Covered coverable elements
    pub covered: usize,
    /// Coverable elements
    pub total: usize,
    /// `covered / total`, `None` when `total == 0`
    pub ratio: Option<f64>,
    /// Per-definition breakdown, ordered by definition id
    pub definitions: Vec<DefinitionCoverage>,
}

impl Coverage {
    /// Whether the ratio is defined and at least `minimum`.
    ///
    /// An undefined ratio satisfies no threshold.
    #[must_use]
    pub fn is_at_least(&self, minimum: f64) -> bool {
        self.ratio.is_some_and(|ratio| ratio >= minimum)
    }

    /// Breakdown entry for one definition
    #[must_use]
    pub fn definition(&self, definition_id: &str) -> Option<&DefinitionCoverage> {
        self.definitions
            .iter()
            .find(|d| d.definition_id.as_str() == definition_id)
    }
}

fn ratio(covered: usize, total: usize) -> Option<f64> {
    (total > 0).then(|| covered as f64 / total as f64)
}

/// Calculate coverage of `covered` against every registered, non-excluded model
#[must_use]
pub fn calculate_coverage(
    covered: &CoveredElements,
    excluded_keys: &BTreeSet<String>,
    registry: &ModelRegistry,
) -> Coverage {
    let empty = BTreeSet::new();
    let mut result = Coverage::default();

    for snapshot in registry.snapshots() {
        if excluded_keys.contains(snapshot.key()) {
            continue;
        }
        let hits = covered.get(snapshot.definition_id()).unwrap_or(&empty);
        let (covered_ids, uncovered_ids): (Vec<_>, Vec<_>) = snapshot
            .elements()
            .iter()
            .map(|element| element.id.clone())
            .partition(|id| hits.contains(id));

        let definition = DefinitionCoverage {
            definition_id: snapshot.definition_id().clone(),
            key: snapshot.key().to_string(),
            version: snapshot.version(),
            covered: covered_ids.len(),
            total: snapshot.len(),
            ratio: ratio(covered_ids.len(), snapshot.len()),
            covered_element_ids: covered_ids,
            uncovered_element_ids: uncovered_ids,
        };
        result.covered += definition.covered;
        result.total += definition.total;
        result.definitions.push(definition);
    }

    result.ratio = ratio(result.covered, result.total);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CoverableElement, ElementKind};

    fn registry_with(models: &[(&str, &str, &[&str])]) -> ModelRegistry {
        let registry = ModelRegistry::new();
        for (id, key, elements) in models {
            registry.register_elements(
                *id,
                *key,
                1,
                elements
                    .iter()
                    .map(|e| CoverableElement::new(*e, ElementKind::Task)),
            );
        }
        registry
    }

    fn covered(entries: &[(&str, &[&str])]) -> CoveredElements {
        entries
            .iter()
            .map(|(def, ids)| {
                (
                    DefinitionId::new(*def),
                    ids.iter().map(|id| ElementId::new(*id)).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_basic_ratio() {
        let registry = registry_with(&[("p:1", "p", &["A", "B", "C", "D", "E"])]);
        let result = calculate_coverage(
            &covered(&[("p:1", &["A", "B", "C"])]),
            &BTreeSet::new(),
            &registry,
        );
        assert_eq!(result.covered, 3);
        assert_eq!(result.total, 5);
        assert_eq!(result.ratio, Some(0.6));
    }

    #[test]
    fn test_unknown_elements_are_ignored() {
        let registry = registry_with(&[("p:1", "p", &["A", "B"])]);
        let result = calculate_coverage(
            &covered(&[("p:1", &["A", "Ghost"]), ("unregistered:1", &["X"])]),
            &BTreeSet::new(),
            &registry,
        );
        assert_eq!(result.covered, 1);
        assert_eq!(result.total, 2);
        assert_eq!(result.definitions.len(), 1);
    }

    #[test]
    fn test_breakdown_keeps_model_order() {
        let registry = registry_with(&[("p:1", "p", &["C", "A", "B"])]);
        let result = calculate_coverage(
            &covered(&[("p:1", &["A", "C"])]),
            &BTreeSet::new(),
            &registry,
        );
        let def = result.definition("p:1").unwrap();
        assert_eq!(
            def.covered_element_ids,
            vec![ElementId::new("C"), ElementId::new("A")]
        );
        assert_eq!(def.uncovered_element_ids, vec![ElementId::new("B")]);
    }

    #[test]
    fn test_exclusion_removes_numerator_and_denominator() {
        let registry = registry_with(&[
            ("p:1", "p", &["A", "B"]),
            ("q:1", "q", &["X", "Y", "Z", "W"]),
        ]);
        let data = covered(&[("p:1", &["A", "B"]), ("q:1", &["X"])]);

        let all = calculate_coverage(&data, &BTreeSet::new(), &registry);
        assert_eq!(all.ratio, Some(0.5));

        let excluded = BTreeSet::from(["q".to_string()]);
        let filtered = calculate_coverage(&data, &excluded, &registry);
        assert_eq!(filtered.ratio, Some(1.0));
        assert!(filtered.definition("q:1").is_none());
    }

    #[test]
    fn test_exclusion_applies_to_all_versions() {
        let registry = registry_with(&[("p:1", "p", &["A"]), ("p:2", "p", &["A", "B"])]);
        let excluded = BTreeSet::from(["p".to_string()]);
        let result = calculate_coverage(&covered(&[("p:1", &["A"])]), &excluded, &registry);
        assert_eq!(result.total, 0);
        assert_eq!(result.ratio, None);
    }

    #[test]
    fn test_zero_element_definition_does_not_change_ratio() {
        let registry = registry_with(&[("p:1", "p", &["A", "B"]), ("empty:1", "empty", &[])]);
        let result = calculate_coverage(
            &covered(&[("p:1", &["A"])]),
            &BTreeSet::new(),
            &registry,
        );
        assert_eq!(result.ratio, Some(0.5));
        let empty = result.definition("empty:1").unwrap();
        assert_eq!(empty.total, 0);
        assert_eq!(empty.ratio, None);
    }

    #[test]
    fn test_empty_registry_is_undefined() {
        let result = calculate_coverage(
            &CoveredElements::new(),
            &BTreeSet::new(),
            &ModelRegistry::new(),
        );
        assert_eq!(result.ratio, None);
        assert!(!result.is_at_least(0.0));
    }

    #[test]
    fn test_is_at_least() {
        let coverage = Coverage {
            covered: 4,
            total: 5,
            ratio: Some(0.8),
            definitions: Vec::new(),
        };
        assert!(coverage.is_at_least(0.8));
        assert!(!coverage.is_at_least(0.81));
    }
}
