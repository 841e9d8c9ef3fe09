//! CLI argument parsing for asintota

use crate::complexity::AnalysisConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the analysis report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for charts and treemaps
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "asintota")]
#[command(version)]
#[command(
    about = "Empirical time complexity estimation from per-instance profiler traces",
    long_about = None
)]
pub struct Cli {
    /// CSV file with one row per instance and numeric property columns
    #[arg(
        short = 'p',
        long = "properties",
        value_name = "CSV",
        default_value = "instance_properties.csv"
    )]
    pub properties: PathBuf,

    /// Directory containing profiler trace JSON documents
    #[arg(short = 'i', long = "data", value_name = "DIR", default_value = "solutions")]
    pub data_dir: PathBuf,

    /// TOML configuration file (command-line flags take precedence)
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Restrict analysis to this property column (repeatable)
    #[arg(long = "property", value_name = "NAME")]
    pub property: Vec<String>,

    /// Identifier column of the properties CSV
    #[arg(long = "id-column", value_name = "NAME")]
    pub id_column: Option<String>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Worker threads for folding and fitting
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    pub jobs: Option<usize>,

    /// Number of ranked fits kept per component
    #[arg(long = "top", value_name = "N")]
    pub top: Option<usize>,

    /// Only analyse components whose call path matches this regex
    #[arg(long = "component", value_name = "REGEX")]
    pub component: Option<String>,

    /// Deepest call stack accepted while folding a trace
    #[arg(long = "max-stack-depth", value_name = "N")]
    pub max_stack_depth: Option<usize>,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Apply command-line overrides on top of a base configuration
    pub fn apply_to(&self, mut config: AnalysisConfig) -> AnalysisConfig {
        if !self.property.is_empty() {
            config.properties = self.property.clone();
        }
        if let Some(id_column) = &self.id_column {
            config.id_column = id_column.clone();
        }
        if let Some(jobs) = self.jobs {
            config.jobs = jobs;
        }
        if let Some(top) = self.top {
            config.top_fits = top;
        }
        if let Some(pattern) = &self.component {
            config.component_filter = Some(pattern.clone());
        }
        if let Some(depth) = self.max_stack_depth {
            config.max_stack_depth = depth;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["asintota"]);
        assert_eq!(cli.properties, PathBuf::from("instance_properties.csv"));
        assert_eq!(cli.data_dir, PathBuf::from("solutions"));
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.config.is_none());
        assert!(cli.output.is_none());
        assert!(cli.property.is_empty());
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["asintota", "-p", "props.csv", "-i", "traces", "-j", "4"]);
        assert_eq!(cli.properties, PathBuf::from("props.csv"));
        assert_eq!(cli.data_dir, PathBuf::from("traces"));
        assert_eq!(cli.jobs, Some(4));
    }

    #[test]
    fn test_cli_format_json() {
        let cli = Cli::parse_from(["asintota", "--format", "json"]);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_format_csv() {
        let cli = Cli::parse_from(["asintota", "--format", "csv"]);
        assert_eq!(cli.format, OutputFormat::Csv);
    }

    #[test]
    fn test_cli_invalid_format_rejected() {
        assert!(Cli::try_parse_from(["asintota", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_cli_repeated_property() {
        let cli = Cli::parse_from(["asintota", "--property", "n", "--property", "m"]);
        assert_eq!(cli.property, vec!["n".to_string(), "m".to_string()]);
    }

    #[test]
    fn test_cli_debug_flag() {
        let cli = Cli::parse_from(["asintota", "--debug"]);
        assert!(cli.debug);
    }

    #[test]
    fn test_apply_to_keeps_base_without_flags() {
        let cli = Cli::parse_from(["asintota"]);
        let base = AnalysisConfig {
            jobs: 3,
            properties: vec!["n".to_string()],
            ..AnalysisConfig::default()
        };
        assert_eq!(cli.apply_to(base.clone()), base);
    }

    #[test]
    fn test_apply_to_overrides() {
        let cli = Cli::parse_from([
            "asintota",
            "--property",
            "n",
            "--id-column",
            "name",
            "-j",
            "8",
            "--top",
            "2",
            "--component",
            "^Solver::",
            "--max-stack-depth",
            "64",
        ]);
        let config = cli.apply_to(AnalysisConfig::default());
        assert_eq!(config.properties, vec!["n".to_string()]);
        assert_eq!(config.id_column, "name");
        assert_eq!(config.jobs, 8);
        assert_eq!(config.top_fits, 2);
        assert_eq!(config.component_filter.as_deref(), Some("^Solver::"));
        assert_eq!(config.max_stack_depth, 64);
    }
}
