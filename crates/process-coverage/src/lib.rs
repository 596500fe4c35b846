//! Process Coverage: structural test coverage for BPMN process definitions
//!
//! Tracks which flow nodes and sequence flows were traversed while automated
//! tests ran, per test method (a [`Run`]) and per test class (a [`Suite`]),
//! and expresses it as a ratio with an element-level breakdown.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  PROCESS COVERAGE Architecture                   │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  deploy ──► ParseHook ──────────► ModelRegistry                  │
//! │                                        │                         │
//! │  engine ──► ExecutionHook ──┐          ▼                         │
//! │         ──► CompensationHook┴─► CoverageCollector ─► Calculator  │
//! │                                 Suite ─► Run*          │         │
//! │                                                        ▼         │
//! │  CoverageHarness (lifecycle) ◄──────────────── SuiteReport tree  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use process_coverage::{CoverageConfig, CoverageHarness};
//! use process_coverage::model::{ElementKind, FlowNode, ProcessDefinition, SequenceFlow};
//!
//! let harness = CoverageHarness::new(CoverageConfig::default());
//! harness.hooks().definition_deployed(
//!     &ProcessDefinition::new("order:1:a", "order", 1)
//!         .with_node(FlowNode::new("Start", ElementKind::Event))
//!         .with_node(FlowNode::new("End", ElementKind::Event))
//!         .with_flow(SequenceFlow::new("Flow_1", "Start", "End")),
//! );
//!
//! harness.before_all("suite-1", "OrderTest").unwrap();
//! harness.before_test("run-1", "startsOrder", "OrderTest", &["order"]).unwrap();
//! harness.hooks().element_traversed("order:1:a", "Start");
//! let run = harness.after_test("run-1", &["order"]).unwrap().unwrap();
//! assert_eq!(run.coverage.covered, 1);
//!
//! let suite = harness.after_all(None).unwrap();
//! assert_eq!(suite.coverage.total, 3);
//! ```

#![warn(missing_docs)]

pub mod calculator;
pub mod collector;
pub mod config;
pub mod formatters;
pub mod harness;
pub mod hooks;
pub mod model;
pub mod report;
mod result;

pub use calculator::{calculate_coverage, Coverage, CoveredElements, DefinitionCoverage};
pub use collector::{CollectorState, CoverageCollector};
pub use config::{CoverageConfig, CoverageConfigBuilder, DEFAULT_ASSERT_AT_LEAST_VAR};
pub use harness::CoverageHarness;
pub use model::{ModelRegistry, ProcessModelSnapshot, Run, Suite};
pub use report::{RunReport, SuiteReport};
pub use result::{CoverageError, CoverageResult, EntityKind, ThresholdScope};
