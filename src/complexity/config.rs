// Configuration for the complexity analysis pipeline
//
// Loadable from a TOML file; command-line flags override file values.

use crate::trace_folder::FoldLimits;
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Analysis configuration
///
/// # Example
/// ```
/// use asintota::complexity::AnalysisConfig;
///
/// let config = AnalysisConfig::from_toml_str(r#"
///     properties = ["n", "density"]
///     jobs = 4
/// "#).unwrap();
/// assert_eq!(config.id_column, "id");
/// assert_eq!(config.jobs, 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Identifier column of the instance property table
    pub id_column: String,

    /// Numeric instance properties to regress against.
    ///
    /// Empty means every column except `id_column`; either way each one is
    /// validated as numeric when the table is loaded.
    pub properties: Vec<String>,

    /// Tags a trace file name must contain to be eligible
    /// (best algorithm, best iteration)
    pub required_tags: Vec<String>,

    /// Deepest call stack accepted while folding a trace
    pub max_stack_depth: usize,

    /// Largest number of events accepted per trace document
    pub max_events_per_trace: usize,

    /// Worker threads for folding and fitting (1 = sequential)
    pub jobs: usize,

    /// Ranked fits kept per component for reporting
    pub top_fits: usize,

    /// Only analyse components whose call path matches this regex
    pub component_filter: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            id_column: "id".to_string(),
            properties: Vec::new(),
            required_tags: vec!["bestalg".to_string(), "bestiter".to_string()],
            max_stack_depth: 10_000,
            max_events_per_trace: 10_000_000,
            jobs: 1,
            top_fits: 6,
            component_filter: None,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML")
    }

    pub fn fold_limits(&self) -> FoldLimits {
        FoldLimits {
            max_stack_depth: self.max_stack_depth,
            max_events: self.max_events_per_trace,
        }
    }

    /// Compiled component filter, if any
    pub fn component_regex(&self) -> Result<Option<Regex>> {
        self.component_filter
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern)
                    .with_context(|| format!("Invalid component filter regex: {}", pattern))
            })
            .transpose()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.id_column.trim().is_empty() {
            return Err("id_column must not be empty".to_string());
        }

        if self.properties.iter().any(|p| p == &self.id_column) {
            return Err(format!(
                "properties must not include the id column '{}'",
                self.id_column
            ));
        }

        let mut seen = std::collections::BTreeSet::new();
        if let Some(dup) = self.properties.iter().find(|p| !seen.insert(p.as_str())) {
            return Err(format!("property '{}' listed more than once", dup));
        }

        if self.max_stack_depth == 0 {
            return Err("max_stack_depth must be >= 1".to_string());
        }

        if self.max_events_per_trace == 0 {
            return Err("max_events_per_trace must be >= 1".to_string());
        }

        if self.jobs == 0 {
            return Err("jobs must be >= 1".to_string());
        }

        if self.top_fits == 0 {
            return Err("top_fits must be >= 1".to_string());
        }

        if let Some(pattern) = &self.component_filter {
            Regex::new(pattern)
                .map_err(|e| format!("Invalid component filter regex '{}': {}", pattern, e))?;
        }

        Ok(())
    }
}
