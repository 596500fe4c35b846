//! Parsed process definition graph
//!
//! The shape the engine hands to the parse-time hook: flow nodes (possibly
//! nesting embedded sub-processes) and the sequence flows connecting them.

use super::{CoverableElement, DefinitionId, ElementId, ElementKind};
use serde::{Deserialize, Serialize};

/// A flow node; `children` is non-empty only for embedded sub-processes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowNode {
    /// Node id
    pub id: ElementId,
    /// Node kind
    pub kind: ElementKind,
    /// Nested flow nodes of a sub-process
    #[serde(default)]
    pub children: Vec<FlowNode>,
    /// Sequence flows inside a sub-process
    #[serde(default)]
    pub sequence_flows: Vec<SequenceFlow>,
}

impl FlowNode {
    /// Create a leaf flow node
    #[must_use]
    pub fn new(id: impl Into<ElementId>, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            kind,
            children: Vec::new(),
            sequence_flows: Vec::new(),
        }
    }

    /// Create an embedded sub-process with its own nodes and flows
    #[must_use]
    pub fn sub_process(
        id: impl Into<ElementId>,
        children: Vec<FlowNode>,
        sequence_flows: Vec<SequenceFlow>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: ElementKind::SubProcess,
            children,
            sequence_flows,
        }
    }
}

/// A directed sequence flow between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceFlow {
    /// Flow id
    pub id: ElementId,
    /// Source node id
    pub source: ElementId,
    /// Target node id
    pub target: ElementId,
}

impl SequenceFlow {
    /// Create a new sequence flow
    #[must_use]
    pub fn new(
        id: impl Into<ElementId>,
        source: impl Into<ElementId>,
        target: impl Into<ElementId>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

/// A deployed process definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDefinition {
    /// Version-specific id
    pub id: DefinitionId,
    /// Logical key shared by all versions
    pub key: String,
    /// Deployment version
    pub version: u32,
    /// Top-level flow nodes
    pub flow_nodes: Vec<FlowNode>,
    /// Top-level sequence flows
    pub sequence_flows: Vec<SequenceFlow>,
}

impl ProcessDefinition {
    /// Create an empty definition
    #[must_use]
    pub fn new(id: impl Into<DefinitionId>, key: impl Into<String>, version: u32) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            version,
            flow_nodes: Vec::new(),
            sequence_flows: Vec::new(),
        }
    }

    /// Add a top-level flow node
    #[must_use]
    pub fn with_node(mut self, node: FlowNode) -> Self {
        self.flow_nodes.push(node);
        self
    }

    /// Add a top-level sequence flow
    #[must_use]
    pub fn with_flow(mut self, flow: SequenceFlow) -> Self {
        self.sequence_flows.push(flow);
        self
    }

    /// All coverable elements in document order.
    ///
    /// Nodes come first at each nesting level, then that level's flows; a
    /// sub-process is listed before its children.
    #[must_use]
    pub fn coverable_elements(&self) -> Vec<CoverableElement> {
        let mut out = Vec::new();
        collect_level(&self.flow_nodes, &self.sequence_flows, &mut out);
        out
    }
}

fn collect_level(nodes: &[FlowNode], flows: &[SequenceFlow], out: &mut Vec<CoverableElement>) {
    for node in nodes {
        out.push(CoverableElement::new(node.id.clone(), node.kind));
        if !node.children.is_empty() || !node.sequence_flows.is_empty() {
            collect_level(&node.children, &node.sequence_flows, out);
        }
    }
    out.extend(
        flows
            .iter()
            .map(|flow| CoverableElement::new(flow.id.clone(), ElementKind::SequenceFlow)),
    );
}
