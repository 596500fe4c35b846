//! Order process coverage walkthrough
//!
//! Run with: `RUST_LOG=debug cargo run --example order_process`

use process_coverage::hooks::CompensationTrigger;
use process_coverage::model::{ElementKind, FlowNode, ProcessDefinition, SequenceFlow};
use process_coverage::{CoverageConfig, CoverageHarness, CoverageResult};

const DEPLOYED: &[&str] = &["order-process"];

fn order_process() -> ProcessDefinition {
    ProcessDefinition::new("order-process:1:demo", "order-process", 1)
        .with_node(FlowNode::new("OrderReceived", ElementKind::Event))
        .with_node(FlowNode::new("CheckOrder", ElementKind::Task))
        .with_node(FlowNode::new("Approved", ElementKind::Gateway))
        .with_node(FlowNode::new("ShipOrder", ElementKind::Task))
        .with_node(FlowNode::new("RejectOrder", ElementKind::Task))
        .with_node(FlowNode::new("UndoShipping", ElementKind::Event))
        .with_node(FlowNode::new("OrderDone", ElementKind::Event))
        .with_flow(SequenceFlow::new("Flow_1", "OrderReceived", "CheckOrder"))
        .with_flow(SequenceFlow::new("Flow_2", "CheckOrder", "Approved"))
        .with_flow(SequenceFlow::new("Flow_Yes", "Approved", "ShipOrder"))
        .with_flow(SequenceFlow::new("Flow_No", "Approved", "RejectOrder"))
        .with_flow(SequenceFlow::new("Flow_3", "ShipOrder", "OrderDone"))
        .with_flow(SequenceFlow::new("Flow_4", "RejectOrder", "OrderDone"))
}

fn main() -> CoverageResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = CoverageConfig::builder()
        .detailed_logging(true)
        .assert_class_coverage_at_least(0.5)
        .build()?;
    let harness = CoverageHarness::new(config);
    let hooks = harness.hooks();
    hooks.definition_deployed(&order_process());

    harness.before_all("demo-suite", "OrderProcessTest")?;

    harness.before_test(
        "demo-run-1",
        "shouldApprove",
        "OrderProcessTest",
        DEPLOYED,
    )?;
    for id in [
        "OrderReceived",
        "Flow_1",
        "CheckOrder",
        "Flow_2",
        "Approved",
        "Flow_Yes",
        "ShipOrder",
    ] {
        hooks.element_traversed("order-process:1:demo", id);
    }
    hooks.compensation_triggered(&CompensationTrigger::new(
        "order-process:1:demo",
        "UndoShipping",
    ));
    harness.after_test("demo-run-1", DEPLOYED)?;

    harness.before_test("demo-run-2", "shouldReject", "OrderProcessTest", DEPLOYED)?;
    for id in [
        "OrderReceived",
        "Flow_1",
        "CheckOrder",
        "Flow_2",
        "Approved",
        "Flow_No",
        "RejectOrder",
        "Flow_4",
        "OrderDone",
    ] {
        hooks.element_traversed("order-process:1:demo", id);
    }
    harness.after_test("demo-run-2", DEPLOYED)?;

    let output = std::env::temp_dir().join("process-coverage-demo");
    let report = harness.after_all(Some(&output))?;
    println!("{report}");
    println!("JSON report written under {}", output.display());
    Ok(())
}
