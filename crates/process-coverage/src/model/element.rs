//! Type-Safe Element Identifiers
//!
//! A process definition id and an element id are both strings on the wire, but
//! they are not interchangeable: mixing them up silently records coverage
//! against the wrong model.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Version-specific process definition identity (e.g. `order-process:3:8f1c`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefinitionId(String);

impl DefinitionId {
    /// Create a new definition id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner value
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DefinitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DefinitionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DefinitionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for DefinitionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Id of a flow node or sequence flow inside one process definition
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Create a new element id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner value
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ElementId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Kind of a coverable element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// User, service, script or any other activity
    Task,
    /// Exclusive, parallel, inclusive or event-based gateway
    Gateway,
    /// Start, end, intermediate or boundary event
    Event,
    /// Embedded sub-process container
    SubProcess,
    /// Directed connection between two flow nodes
    SequenceFlow,
}

impl ElementKind {
    /// Whether this kind is a flow node (everything but sequence flows)
    #[must_use]
    pub const fn is_flow_node(self) -> bool {
        !matches!(self, Self::SequenceFlow)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task => write!(f, "task"),
            Self::Gateway => write!(f, "gateway"),
            Self::Event => write!(f, "event"),
            Self::SubProcess => write!(f, "sub_process"),
            Self::SequenceFlow => write!(f, "sequence_flow"),
        }
    }
}

/// A coverable element: id plus kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoverableElement {
    /// Element id
    pub id: ElementId,
    /// Element kind
    pub kind: ElementKind,
}

impl CoverableElement {
    /// Create a new coverable element
    #[must_use]
    pub fn new(id: impl Into<ElementId>, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_definition_id_borrow_lookup() {
        let mut set = HashSet::new();
        set.insert(DefinitionId::new("order-process:1:abc"));
        assert!(set.contains("order-process:1:abc"));
    }

    #[test]
    fn test_element_id_display() {
        assert_eq!(ElementId::from("Task_Approve").to_string(), "Task_Approve");
    }

    #[test]
    fn test_kind_is_flow_node() {
        assert!(ElementKind::Task.is_flow_node());
        assert!(ElementKind::SubProcess.is_flow_node());
        assert!(!ElementKind::SequenceFlow.is_flow_node());
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let json = serde_json::to_string(&ElementId::new("A")).unwrap();
        assert_eq!(json, "\"A\"");
        let kind = serde_json::to_string(&ElementKind::SequenceFlow).unwrap();
        assert_eq!(kind, "\"sequence_flow\"");
    }
}
