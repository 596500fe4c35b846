//! Coverage Configuration
//!
//! One configuration value with the recognized options. Every ratio is
//! checked when the value is built or loaded, never when coverage is
//! calculated.
//!
//! ```yaml
//! detailed_logging: true
//! handle_method_coverage: true
//! excluded_process_definition_keys: [invoice-process]
//! assert_class_coverage_at_least: 0.8
//! method_coverage_at_least:
//!   shouldApprove: 0.6
//! ```

use crate::result::{CoverageError, CoverageResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Default environment variable holding a minimal class coverage ratio
pub const DEFAULT_ASSERT_AT_LEAST_VAR: &str = "PROCESS_COVERAGE_ASSERT_AT_LEAST";

/// Validated coverage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageConfig {
    /// Log full suite/run detail at debug level
    pub detailed_logging: bool,
    /// Compute and assert coverage after every test method
    pub handle_method_coverage: bool,
    /// Logical keys excluded from every calculation
    pub excluded_process_definition_keys: BTreeSet<String>,
    /// Minimal class coverage ratio
    pub assert_class_coverage_at_least: Option<f64>,
    /// Minimal coverage ratio per test method name
    pub method_coverage_at_least: BTreeMap<String, f64>,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            detailed_logging: false,
            handle_method_coverage: true,
            excluded_process_definition_keys: BTreeSet::new(),
            assert_class_coverage_at_least: None,
            method_coverage_at_least: BTreeMap::new(),
        }
    }
}

impl CoverageConfig {
    /// Create a builder for coverage config
    #[must_use]
    pub fn builder() -> CoverageConfigBuilder {
        CoverageConfigBuilder::default()
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> CoverageResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn from_yaml_file(path: &Path) -> CoverageResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Check every configured ratio lies in `[0, 1]`
    pub fn validate(&self) -> CoverageResult<()> {
        if let Some(ratio) = self.assert_class_coverage_at_least {
            check_ratio("class coverage", ratio)?;
        }
        for (method, ratio) in &self.method_coverage_at_least {
            check_ratio(&format!("coverage of method '{method}'"), *ratio)?;
        }
        Ok(())
    }

    /// Whether a logical key is excluded
    #[must_use]
    pub fn is_excluded(&self, key: &str) -> bool {
        self.excluded_process_definition_keys.contains(key)
    }
}

/// Reject ratios outside `[0, 1]` (and NaN)
pub fn check_ratio(what: &str, ratio: f64) -> CoverageResult<f64> {
    if (0.0..=1.0).contains(&ratio) {
        Ok(ratio)
    } else {
        Err(CoverageError::invalid_config(format!(
            "{what} at least {ratio} ({}%) is not a ratio in [0, 1]",
            ratio * 100.0
        )))
    }
}

/// Builder for coverage configuration.
///
/// `build` reads a minimal class ratio from [`DEFAULT_ASSERT_AT_LEAST_VAR`]
/// unless another variable is named with `assert_at_least_from_env`.
#[derive(Debug)]
pub struct CoverageConfigBuilder {
    config: CoverageConfig,
    env_var: String,
}

impl Default for CoverageConfigBuilder {
    fn default() -> Self {
        Self {
            config: CoverageConfig::default(),
            env_var: DEFAULT_ASSERT_AT_LEAST_VAR.to_string(),
        }
    }
}

impl CoverageConfigBuilder {
    /// Log suite/run detail at debug level
    #[must_use]
    pub fn detailed_logging(mut self, enabled: bool) -> Self {
        self.config.detailed_logging = enabled;
        self
    }

    /// Enable or disable per-method coverage handling
    #[must_use]
    pub fn handle_method_coverage(mut self, enabled: bool) -> Self {
        self.config.handle_method_coverage = enabled;
        self
    }

    /// Replace the process definition keys excluded from the analysis
    #[must_use]
    pub fn exclude_process_definition_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.excluded_process_definition_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Require the class coverage to be at least `ratio`
    #[must_use]
    pub fn assert_class_coverage_at_least(mut self, ratio: f64) -> Self {
        self.config.assert_class_coverage_at_least = Some(ratio);
        self
    }

    /// Require a test method's coverage to be at least `ratio`
    #[must_use]
    pub fn method_coverage_at_least(mut self, method: impl Into<String>, ratio: f64) -> Self {
        let _ = self
            .config
            .method_coverage_at_least
            .insert(method.into(), ratio);
        self
    }

    /// Read the minimal class ratio from `var` instead of the default variable
    #[must_use]
    pub fn assert_at_least_from_env(mut self, var: impl Into<String>) -> Self {
        self.env_var = var.into();
        self
    }

    /// Validate and build the configuration.
    ///
    /// When both an explicit class ratio and the environment variable are
    /// set, the stricter one wins.
    pub fn build(self) -> CoverageResult<CoverageConfig> {
        let mut config = self.config;
        if let Some(from_env) = ratio_from_env(&self.env_var)? {
            config.assert_class_coverage_at_least = Some(
                config
                    .assert_class_coverage_at_least
                    .map_or(from_env, |explicit| explicit.max(from_env)),
            );
        }
        config.validate()?;
        Ok(config)
    }
}

fn ratio_from_env(var: &str) -> CoverageResult<Option<f64>> {
    let Ok(raw) = std::env::var(var) else {
        return Ok(None);
    };
    let ratio: f64 = raw.trim().parse().map_err(|_| {
        CoverageError::invalid_config(format!(
            "environment variable \"{var}\" must be a number, got \"{raw}\""
        ))
    })?;
    check_ratio(&format!("environment variable \"{var}\""), ratio).map(Some)
}
