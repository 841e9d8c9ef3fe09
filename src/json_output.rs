//! JSON report format
//!
//! Carries everything a chart or treemap renderer needs: ranked fits with
//! curve samples, the joined series, treemap nodes and failures.

use crate::complexity::{CandidateFit, ComponentAnalysis, GrowthFunction};
use crate::join::SeriesPoint;
use crate::pipeline::{AnalysisReport, InstanceFailure, TreemapEntry};
use crate::stats::TimingSummary;
use serde::{Deserialize, Serialize};

/// One ranked candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonFit {
    pub function: GrowthFunction,
    /// e.g. `Θ(0.5·n²)`
    pub label: String,
    /// e.g. `0.5 \cdot n^2`
    pub latex: String,
    /// `None` (`null`) when not finite
    pub r_squared: Option<f64>,
    pub parameter: f64,
    pub curve: Vec<SeriesPoint>,
}

impl From<&CandidateFit> for JsonFit {
    fn from(fit: &CandidateFit) -> Self {
        Self {
            function: fit.function,
            label: fit.label(),
            latex: fit.latex(),
            r_squared: finite(fit.r_squared),
            parameter: fit.parameter,
            curve: fit.curve.clone(),
        }
    }
}

/// Analysis of one component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonComponent {
    pub component: String,
    pub parent: String,
    pub leaf: String,
    /// Instance property that best explains the timings
    pub property: String,
    /// Label of the top-ranked fit
    pub complexity: String,
    pub r_squared: Option<f64>,
    /// Ranked fits, best first
    pub fits: Vec<JsonFit>,
    /// Observed (property value, mean time) series
    pub series: Vec<SeriesPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<TimingSummary>,
}

/// Counts for the whole batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    pub instances: usize,
    pub components_fitted: usize,
    pub components_unfittable: usize,
    pub failed_traces: usize,
    pub missing_instances: usize,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    pub components: Vec<JsonComponent>,
    pub unfittable: Vec<String>,
    pub treemap: Vec<TreemapEntry>,
    pub failures: Vec<InstanceFailure>,
    /// Timed instances absent from the property table
    #[serde(default)]
    pub missing_instances: Vec<String>,
    pub summary: JsonSummary,
}

impl JsonOutput {
    pub fn from_report(report: &AnalysisReport) -> Self {
        let components = report
            .components
            .iter()
            .map(|analysis| component(analysis, report))
            .collect();

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "asintota-json-v1".to_string(),
            components,
            unfittable: report.unfittable.iter().map(|c| c.to_string()).collect(),
            treemap: report.treemap.clone(),
            failures: report.failures.clone(),
            missing_instances: report.missing_instances.clone(),
            summary: JsonSummary {
                instances: report.instances_analyzed,
                components_fitted: report.components.len(),
                components_unfittable: report.unfittable.len(),
                failed_traces: report.failures.len(),
                missing_instances: report.missing_instances.len(),
            },
        }
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn component(analysis: &ComponentAnalysis, report: &AnalysisReport) -> JsonComponent {
    let best = analysis.best();
    JsonComponent {
        component: analysis.component.to_string(),
        parent: analysis.component.parent().to_string(),
        leaf: analysis.component.leaf().to_string(),
        property: analysis.property.clone(),
        complexity: best.label(),
        r_squared: finite(best.r_squared),
        fits: analysis.fits.iter().map(JsonFit::from).collect(),
        series: analysis.series.points.clone(),
        timing: report.summaries.get(&analysis.component).cloned(),
    }
}
