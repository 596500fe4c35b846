//! JSON Report Formatter
//!
//! Writes a suite report as pretty-printed JSON:
//!
//! ```text
//! <output dir>/<suite name>/report.json
//! ```

use crate::report::SuiteReport;
use crate::result::CoverageResult;
use std::path::{Path, PathBuf};

/// File name of the JSON report inside the suite directory
pub const REPORT_FILE_NAME: &str = "report.json";

/// JSON format report generator
#[derive(Debug)]
pub struct JsonReportFormatter<'a> {
    report: &'a SuiteReport,
}

impl<'a> JsonReportFormatter<'a> {
    /// Create a new JSON formatter for a suite report
    #[must_use]
    pub fn new(report: &'a SuiteReport) -> Self {
        Self { report }
    }

    /// Generate the JSON document
    pub fn generate(&self) -> CoverageResult<String> {
        Ok(serde_json::to_string_pretty(self.report)?)
    }

    /// Directory the report is written to under `output_dir`
    #[must_use]
    pub fn suite_dir(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(sanitize(&self.report.name))
    }

    /// Save the report under `output_dir`, returning the file path
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or the write fails
    pub fn save(&self, output_dir: &Path) -> CoverageResult<PathBuf> {
        let dir = self.suite_dir(output_dir);
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(REPORT_FILE_NAME);
        std::fs::write(&path, self.generate()?)?;
        Ok(path)
    }
}

/// Keep suite names usable as a single path component
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "suite".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::model::{CoverableElement, DefinitionId, ElementId, ElementKind, ModelRegistry, Run, Suite};

    fn create_test_report() -> SuiteReport {
        let registry = ModelRegistry::new();
        registry.register_elements(
            "order-process:1:a",
            "order-process",
            1,
            [
                CoverableElement::new("Start", ElementKind::Event),
                CoverableElement::new("Flow_1", ElementKind::SequenceFlow),
            ],
        );
        let mut suite = Suite::new("suite-1", "com.example.OrderProcessTest");
        let run = suite.add_run(Run::new("run-1", "shouldApprove")).unwrap();
        run.record(&DefinitionId::new("order-process:1:a"), &ElementId::new("Start"));
        SuiteReport::build(&suite, &registry)
    }

    #[test]
    fn test_generate_json() {
        let report = create_test_report();
        let json = JsonReportFormatter::new(&report).generate().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["name"], "com.example.OrderProcessTest");
        assert_eq!(value["coverage"]["ratio"], 0.5);
        assert_eq!(value["runs"][0]["name"], "shouldApprove");
        assert_eq!(
            value["runs"][0]["covered_element_ids"]["order-process:1:a"][0],
            "Start"
        );
    }

    #[test]
    fn test_save_writes_suite_dir() {
        let dir = tempfile::tempdir().unwrap();
        let report = create_test_report();
        let path = JsonReportFormatter::new(&report).save(dir.path()).unwrap();

        assert_eq!(
            path,
            dir.path()
                .join("com.example.OrderProcessTest")
                .join(REPORT_FILE_NAME)
        );
        let parsed: SuiteReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("a/b c"), "a_b_c");
        assert_eq!(sanitize(".."), "suite");
        assert_eq!(sanitize(""), "suite");
    }
}
