//! Coverage Report Tree
//!
//! Read-only result handed to renderers. Every number is computed when the
//! tree is built; nothing in it refers back to live collector state.

use crate::calculator::{Coverage, CoveredElements};
use crate::model::{ElementId, ModelRegistry, Run, Suite};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Coverage of one test method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Run id
    pub id: String,
    /// Test method name
    pub name: String,
    /// Computed coverage with per-definition breakdown
    pub coverage: Coverage,
    /// Everything recorded, including excluded and unregistered definitions
    pub covered_element_ids: CoveredElements,
}

impl RunReport {
    /// Compute the report for a run
    #[must_use]
    pub fn build(run: &Run, registry: &ModelRegistry, excluded_keys: &BTreeSet<String>) -> Self {
        Self {
            id: run.id().to_string(),
            name: run.name().to_string(),
            coverage: run.calculate_coverage(registry, excluded_keys),
            covered_element_ids: run.covered_elements(),
        }
    }

    /// Coverage ratio, `None` if undefined
    #[must_use]
    pub fn ratio(&self) -> Option<f64> {
        self.coverage.ratio
    }
}

/// Coverage of one test class and its methods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Suite id
    pub id: String,
    /// Test class name
    pub name: String,
    /// When the report was computed
    pub generated_at: DateTime<Utc>,
    /// Coverage of the union of all runs
    pub coverage: Coverage,
    /// Keys excluded from every number in this report
    pub excluded_keys: BTreeSet<String>,
    /// Runs in execution order
    pub runs: Vec<RunReport>,
}

impl SuiteReport {
    /// Compute the report for a suite
    #[must_use]
    pub fn build(suite: &Suite, registry: &ModelRegistry) -> Self {
        let excluded_keys = suite.excluded_keys().clone();
        Self {
            id: suite.id().to_string(),
            name: suite.name().to_string(),
            generated_at: Utc::now(),
            coverage: suite.calculate_coverage(registry),
            runs: suite
                .runs()
                .iter()
                .map(|run| RunReport::build(run, registry, &excluded_keys))
                .collect(),
            excluded_keys,
        }
    }

    /// Coverage ratio, `None` if undefined
    #[must_use]
    pub fn ratio(&self) -> Option<f64> {
        self.coverage.ratio
    }

    /// Look up a run report by id
    #[must_use]
    pub fn run(&self, id: &str) -> Option<&RunReport> {
        self.runs.iter().find(|run| run.id == id)
    }
}

/// Render a ratio for humans
#[must_use]
pub fn format_ratio(ratio: Option<f64>) -> String {
    ratio.map_or_else(|| "n/a".to_string(), |r| format!("{:.1}%", r * 100.0))
}

fn write_coverage(f: &mut fmt::Formatter<'_>, coverage: &Coverage, indent: &str) -> fmt::Result {
    for definition in &coverage.definitions {
        write!(
            f,
            "\n{indent}{} (v{}): {}/{} {}",
            definition.definition_id,
            definition.version,
            definition.covered,
            definition.total,
            format_ratio(definition.ratio)
        )?;
        if !definition.uncovered_element_ids.is_empty() {
            let missing: Vec<_> = definition
                .uncovered_element_ids
                .iter()
                .map(ElementId::as_str)
                .collect();
            write!(f, " missing [{}]", missing.join(", "))?;
        }
    }
    Ok(())
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({}/{})",
            self.name,
            format_ratio(self.coverage.ratio),
            self.coverage.covered,
            self.coverage.total
        )?;
        write_coverage(f, &self.coverage, "    ")
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({}/{})",
            self.name,
            format_ratio(self.coverage.ratio),
            self.coverage.covered,
            self.coverage.total
        )?;
        write_coverage(f, &self.coverage, "  ")?;
        for run in &self.runs {
            write!(f, "\n  {run}")?;
        }
        Ok(())
    }
}
