//! Class threshold taken from the default environment variable
//!
//! Kept in its own test binary: the variable is process-wide and would leak
//! into every other harness built in the same process.

use process_coverage::model::{ElementKind, FlowNode, ProcessDefinition};
use process_coverage::{
    CoverageConfig, CoverageError, CoverageHarness, ThresholdScope, DEFAULT_ASSERT_AT_LEAST_VAR,
};

#[test]
fn default_env_var_sets_class_threshold() {
    std::env::set_var(DEFAULT_ASSERT_AT_LEAST_VAR, "1.0");

    let config = CoverageConfig::builder().build().unwrap();
    assert_eq!(config.assert_class_coverage_at_least, Some(1.0));

    let stricter = CoverageConfig::builder()
        .assert_class_coverage_at_least(0.5)
        .build()
        .unwrap();
    assert_eq!(stricter.assert_class_coverage_at_least, Some(1.0));

    let harness = CoverageHarness::new(config);
    harness.hooks().definition_deployed(
        &ProcessDefinition::new("order-process:1:a", "order-process", 1)
            .with_node(FlowNode::new("A", ElementKind::Task))
            .with_node(FlowNode::new("B", ElementKind::Task)),
    );
    harness.before_all("suite-1", "OrderProcessTest").unwrap();
    assert!(harness
        .before_test("run-1", "shouldApprove", "OrderProcessTest", &["order-process"])
        .unwrap());
    harness.hooks().element_traversed("order-process:1:a", "A");
    harness.after_test("run-1", &["order-process"]).unwrap();

    let err = harness.after_all(None).unwrap_err();
    assert!(matches!(
        err,
        CoverageError::CoverageBelowThreshold {
            scope: ThresholdScope::Class,
            ..
        }
    ));
}
