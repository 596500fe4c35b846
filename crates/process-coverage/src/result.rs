//! Result and error types for process coverage.

use std::fmt;
use thiserror::Error;

/// Result type for coverage operations
pub type CoverageResult<T> = Result<T, CoverageError>;

/// Aggregate kinds that can be looked up by id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A test-class aggregate
    Suite,
    /// A test-method aggregate
    Run,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Suite => write!(f, "suite"),
            Self::Run => write!(f, "run"),
        }
    }
}

/// Scope a coverage threshold applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdScope {
    /// Whole test class
    Class,
    /// Single test method
    Method,
}

impl fmt::Display for ThresholdScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class => write!(f, "class"),
            Self::Method => write!(f, "method"),
        }
    }
}

/// Errors that can occur while collecting or evaluating coverage
#[derive(Debug, Error)]
pub enum CoverageError {
    /// Lookup of a suite or run id that was never created
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// What was looked up
        kind: EntityKind,
        /// The missing id
        id: String,
    },

    /// A suite or run id was created twice
    #[error("{kind} '{id}' already exists")]
    DuplicateId {
        /// What was created
        kind: EntityKind,
        /// The duplicated id
        id: String,
    },

    /// An operation needs an active suite but none is active
    #[error("no active suite")]
    NoActiveSuite,

    /// Configuration rejected at build time
    #[error("BAD TEST CONFIGURATION: {message}")]
    InvalidConfig {
        /// Error message
        message: String,
    },

    /// Computed coverage is below the configured minimum
    #[error("{scope} coverage of '{name}' is {actual:.4}, expected at least {required:.4}")]
    CoverageBelowThreshold {
        /// Class or method
        scope: ThresholdScope,
        /// Suite or run display name
        name: String,
        /// Computed ratio
        actual: f64,
        /// Configured minimum ratio
        required: f64,
    },

    /// A threshold is configured but nothing coverable was registered
    #[error("{scope} coverage of '{name}' is undefined (no coverable elements), expected at least {required:.4}")]
    UndefinedCoverage {
        /// Class or method
        scope: ThresholdScope,
        /// Suite or run display name
        name: String,
        /// Configured minimum ratio
        required: f64,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML configuration error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl CoverageError {
    /// Create a not-found error
    #[must_use]
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Create a duplicate-id error
    #[must_use]
    pub fn duplicate(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            kind,
            id: id.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
