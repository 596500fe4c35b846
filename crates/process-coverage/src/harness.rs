//! Coverage Harness
//!
//! Drives one collector through a test class's lifecycle and asserts the
//! configured thresholds. Each parallel test worker owns its own harness;
//! nothing here is global.
//!
//! ```text
//! before_all ─► (before_test ─► engine runs ─► after_test)* ─► after_all
//!   suite          run created                  run coverage     suite report
//! ```

use crate::calculator::Coverage;
use crate::collector::CoverageCollector;
use crate::config::{check_ratio, CoverageConfig};
use crate::formatters::JsonReportFormatter;
use crate::hooks::{EngineHooks, WiringWarning};
use crate::model::{Run, Suite};
use crate::report::{format_ratio, RunReport, SuiteReport};
use crate::result::{CoverageError, CoverageResult, ThresholdScope};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Lifecycle driver for one test class
#[derive(Debug)]
pub struct CoverageHarness {
    config: CoverageConfig,
    collector: Arc<CoverageCollector>,
    hooks: EngineHooks,
    wiring_warnings: Vec<WiringWarning>,
}

impl CoverageHarness {
    /// Harness with a fresh collector and fully wired hooks
    #[must_use]
    pub fn new(config: CoverageConfig) -> Self {
        let collector = Arc::new(CoverageCollector::default());
        let hooks = EngineHooks::wire(&collector);
        Self::with_hooks(config, collector, hooks)
    }

    /// Harness over an existing collector and engine wiring.
    ///
    /// Missing hooks are logged as warnings here, at setup.
    #[must_use]
    pub fn with_hooks(
        config: CoverageConfig,
        collector: Arc<CoverageCollector>,
        hooks: EngineHooks,
    ) -> Self {
        let wiring_warnings = hooks.verify();
        Self {
            config,
            collector,
            hooks,
            wiring_warnings,
        }
    }

    /// The configuration
    #[must_use]
    pub fn config(&self) -> &CoverageConfig {
        &self.config
    }

    /// The collector
    #[must_use]
    pub fn collector(&self) -> &Arc<CoverageCollector> {
        &self.collector
    }

    /// Hooks to hand to the engine configuration
    #[must_use]
    pub fn hooks(&self) -> &EngineHooks {
        &self.hooks
    }

    /// Hooks found missing when the harness was set up
    #[must_use]
    pub fn wiring_warnings(&self) -> &[WiringWarning] {
        &self.wiring_warnings
    }

    /// Add a minimal coverage ratio for a test method
    pub fn add_method_coverage_condition(
        &mut self,
        method: impl Into<String>,
        ratio: f64,
    ) -> CoverageResult<()> {
        let method = method.into();
        let ratio = check_ratio(&format!("coverage of method '{method}'"), ratio)?;
        let _ = self.config.method_coverage_at_least.insert(method, ratio);
        Ok(())
    }

    /// A test is tracked only if it deployed a non-excluded definition key
    #[must_use]
    pub fn is_relevant_test(&self, deployed_keys: &[&str]) -> bool {
        deployed_keys.iter().any(|key| !self.config.is_excluded(key))
    }

    /// Create, configure and activate the suite of a test class
    pub fn before_all(&self, suite_id: &str, class_name: &str) -> CoverageResult<()> {
        self.collector.create_suite(Suite::new(suite_id, class_name))?;
        self.collector.set_excluded_process_definition_keys(
            self.config.excluded_process_definition_keys.iter().cloned(),
        );
        self.collector.activate_suite(suite_id)
    }

    /// Create and activate the run of a test method.
    ///
    /// Tests whose `deployed_keys` are all excluded are not tracked and
    /// `false` is returned. Without a prior `before_all` the suite is
    /// initialized here, using the class name as its id.
    pub fn before_test(
        &self,
        run_id: &str,
        method_name: &str,
        class_name: &str,
        deployed_keys: &[&str],
    ) -> CoverageResult<bool> {
        if !self.is_relevant_test(deployed_keys) {
            debug!(
                collector = %self.collector.instance_id(),
                run_id,
                method = method_name,
                "test deployed no tracked process, skipping"
            );
            return Ok(false);
        }
        let suite_id = match self.collector.active_suite_id() {
            Some(id) => id,
            None => {
                self.before_all(class_name, class_name)?;
                class_name.to_string()
            }
        };
        self.collector
            .create_run(Run::new(run_id, method_name), &suite_id)?;
        self.collector.activate_run(run_id)?;
        Ok(true)
    }

    /// Finish a test method's run and evaluate its coverage.
    ///
    /// The active run is finished whatever the outcome. Returns `None` for an
    /// untracked test or when method coverage handling is off.
    pub fn after_test(
        &self,
        run_id: &str,
        deployed_keys: &[&str],
    ) -> CoverageResult<Option<RunReport>> {
        if !self.is_relevant_test(deployed_keys) {
            return Ok(None);
        }
        if self.collector.active_run_id().is_some() {
            let _ = self.collector.finish_run()?;
        }
        if !self.config.handle_method_coverage {
            return Ok(None);
        }

        let report = self.collector.run_report(run_id)?;
        info!(
            collector = %self.collector.instance_id(),
            run = %report.name,
            coverage = %format_ratio(report.ratio()),
            "{} test method coverage is {}",
            report.name,
            format_ratio(report.ratio())
        );
        if self.config.detailed_logging {
            debug!("{report}");
        }
        assert_threshold(
            ThresholdScope::Method,
            &report.name,
            &report.coverage,
            self.config.method_coverage_at_least.get(&report.name).copied(),
        )?;
        Ok(Some(report))
    }

    /// Finish the active suite, write the JSON report if `output_dir` is set,
    /// then evaluate the class coverage
    pub fn after_all(&self, output_dir: Option<&Path>) -> CoverageResult<SuiteReport> {
        let report = self.collector.suite_report()?;
        let _ = self.collector.finish_suite()?;

        info!(
            collector = %self.collector.instance_id(),
            suite = %report.name,
            coverage = %format_ratio(report.ratio()),
            "{} test class coverage is: {}",
            report.name,
            format_ratio(report.ratio())
        );
        if self.config.detailed_logging {
            debug!("{report}");
        }
        if let Some(dir) = output_dir {
            let path = JsonReportFormatter::new(&report).save(dir)?;
            debug!(path = %path.display(), "wrote coverage report");
        }
        assert_threshold(
            ThresholdScope::Class,
            &report.name,
            &report.coverage,
            self.config.assert_class_coverage_at_least,
        )?;
        Ok(report)
    }
}

fn assert_threshold(
    scope: ThresholdScope,
    name: &str,
    coverage: &Coverage,
    required: Option<f64>,
) -> CoverageResult<()> {
    let Some(required) = required else {
        return Ok(());
    };
    match coverage.ratio {
        Some(actual) if actual >= required => Ok(()),
        Some(actual) => Err(CoverageError::CoverageBelowThreshold {
            scope,
            name: name.to_string(),
            actual,
            required,
        }),
        None => Err(CoverageError::UndefinedCoverage {
            scope,
            name: name.to_string(),
            required,
        }),
    }
}
