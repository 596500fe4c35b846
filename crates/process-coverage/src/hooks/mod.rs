//! Engine Instrumentation Hooks
//!
//! Contracts the process engine calls into, plus the recorders implementing
//! them on top of a [`CoverageCollector`](crate::CoverageCollector):
//!
//! | Hook | Called when | Recorder |
//! |------|-------------|----------|
//! | [`ParseHook`] | a definition is deployed | [`ElementCoverageParseListener`] |
//! | [`ExecutionHook`] | a flow node completes or a sequence flow is taken | [`ElementCoverageExecutionListener`] |
//! | [`CompensationHook`] | compensation is dispatched to a boundary event | [`CompensationEventCoverageHandler`] |
//!
//! The engine configuration receives the recorders explicitly through
//! [`EngineHooks`]; a missing recorder is reported as a warning when the
//! wiring is verified.

mod compensation;
mod execution;
mod parse;
mod wiring;

pub use compensation::{CompensationEventCoverageHandler, CompensationHook, CompensationTrigger};
pub use execution::{ElementCoverageExecutionListener, ExecutionContext, ExecutionHook};
pub use parse::{ElementCoverageParseListener, ParseHook};
pub use wiring::{EngineHooks, WiringWarning};
