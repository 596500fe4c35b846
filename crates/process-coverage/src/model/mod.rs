//! Coverage Data Model
//!
//! ```text
//! ModelRegistry ──(definition id)──► ProcessModelSnapshot { elements }
//!
//! Suite (test class)
//!  ├─ Run (test method) ── definition id ──► { covered element ids }
//!  └─ Run ...
//! ```
//!
//! Suite coverage is derived from its runs on demand; it is never a separate
//! mutable set.

mod definition;
mod element;
mod registry;
mod run;
mod suite;

pub use definition::{FlowNode, ProcessDefinition, SequenceFlow};
pub use element::{CoverableElement, DefinitionId, ElementId, ElementKind};
pub use registry::{ModelRegistry, ProcessModelSnapshot};
pub use run::Run;
pub use suite::Suite;
