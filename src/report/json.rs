//! JSON output format for assembled reports
//!
//! `--format json`: the same joined structure the HTML renderer walks, for
//! dashboards and CI scripts.

use crate::report::assembler::Report;
use serde::Serialize;

/// Versioned wrapper around a [`Report`]
#[derive(Debug, Serialize)]
pub struct JsonOutput<'a> {
    /// Crate version that produced the document
    pub version: String,
    /// Format name
    pub format: String,
    pub report: &'a Report,
    /// Notes or scratchpad fragment, verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment: Option<String>,
}

impl<'a> JsonOutput<'a> {
    pub fn new(report: &'a Report) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "benchlens-report-v1".to_string(),
            report,
            fragment: None,
        }
    }

    pub fn with_fragment(mut self, fragment: Option<String>) -> Self {
        self.fragment = fragment;
        self
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
