//! Coverage Report Formatters
//!
//! Renderers consuming the read-only report tree.

mod json;

pub use json::{JsonReportFormatter, REPORT_FILE_NAME};
