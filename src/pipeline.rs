//! Batch analysis pipeline
//!
//! ```text
//! trace files ──load+fold (per document)──▶ FoldedTrace*
//!                                              │ aggregate
//!                                              ▼
//! instance table ───────────────────────▶ TimeStatsTable
//!                                              │ select (per component)
//!                                              ▼
//!                                        AnalysisReport
//! ```
//!
//! Each stage completes before the next starts. A document that fails to
//! load or fold is recorded as an [`InstanceFailure`] and the batch goes on;
//! components without any usable fit are listed as unfittable.

use crate::aggregate::{aggregate, TimeStatsTable, TreemapNode};
use crate::call_path::CallPath;
use crate::complexity::{analyze_component, AnalysisConfig, ComponentAnalysis};
use crate::event::TraceDocument;
use crate::ingest::{discover_trace_files, load_document};
use crate::instances::InstanceTable;
use crate::stats::{component_summaries, TimingSummary};
use crate::trace_folder::{fold_document, FoldedTrace};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A trace document dropped from the batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceFailure {
    /// File path or document label
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    pub reason: String,
}

/// Folded traces plus the documents that failed
#[derive(Debug, Default)]
pub struct FoldOutcome {
    pub traces: Vec<FoldedTrace>,
    pub failures: Vec<InstanceFailure>,
}

impl FoldOutcome {
    fn collect(results: Vec<std::result::Result<FoldedTrace, InstanceFailure>>) -> Self {
        let mut outcome = Self::default();
        for result in results {
            match result {
                Ok(trace) => outcome.traces.push(trace),
                Err(failure) => {
                    tracing::warn!(
                        source = %failure.source,
                        "Skipping trace: {}",
                        failure.reason
                    );
                    outcome.failures.push(failure);
                }
            }
        }
        outcome
    }
}

/// Treemap node annotated with the component's best fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreemapEntry {
    #[serde(flatten)]
    pub node: TreemapNode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r_squared: Option<f64>,
}

/// Everything the presentation layer needs
#[derive(Debug, Clone, Default)]
pub struct AnalysisReport {
    /// Fitted components, ordered by call path
    pub components: Vec<ComponentAnalysis>,
    /// Components with no usable (property, function) fit
    pub unfittable: Vec<CallPath>,
    pub treemap: Vec<TreemapEntry>,
    pub summaries: BTreeMap<CallPath, TimingSummary>,
    pub failures: Vec<InstanceFailure>,
    /// Timed instances with no row in the property table
    pub missing_instances: Vec<String>,
    /// Distinct instances with at least one folded trace
    pub instances_analyzed: usize,
}

/// Load and fold every file, isolating failures per document
pub fn fold_files(paths: &[PathBuf], config: &AnalysisConfig) -> FoldOutcome {
    let limits = config.fold_limits();
    let results = parallel_map(paths, config.jobs, |path| {
        tracing::info!("Processing {}", path.display());
        let source = path.display().to_string();
        let doc = load_document(path).map_err(|e| InstanceFailure {
            source: source.clone(),
            instance_id: None,
            reason: format!("{:#}", e),
        })?;
        fold_document(&doc, limits).map_err(|e| InstanceFailure {
            source,
            instance_id: Some(doc.instance_id.clone()),
            reason: e.to_string(),
        })
    });
    FoldOutcome::collect(results)
}

/// Fold in-memory documents, isolating failures per document
pub fn fold_documents(docs: &[TraceDocument], config: &AnalysisConfig) -> FoldOutcome {
    let limits = config.fold_limits();
    let results = parallel_map(docs, config.jobs, |doc| {
        fold_document(doc, limits).map_err(|e| InstanceFailure {
            source: doc.instance_id.clone(),
            instance_id: Some(doc.instance_id.clone()),
            reason: e.to_string(),
        })
    });
    FoldOutcome::collect(results)
}

/// Run model selection for every component of `stats`
pub fn analyze_complexity(
    instances: &InstanceTable,
    stats: &TimeStatsTable,
    config: &AnalysisConfig,
) -> Result<AnalysisReport> {
    let filter = config.component_regex()?;
    let components: Vec<CallPath> = stats
        .components()
        .into_iter()
        .filter(|c| filter.as_ref().map_or(true, |re| re.is_match(c.as_str())))
        .collect();

    let results = parallel_map(&components, config.jobs, |component| {
        analyze_component(instances, stats, component, config.top_fits)
    });

    let missing_instances = missing_instances(instances, stats);
    for instance in &missing_instances {
        tracing::warn!(
            instance = instance.as_str(),
            "Instance missing from property table, excluded from fitting"
        );
    }

    let mut report = AnalysisReport {
        missing_instances,
        summaries: component_summaries(stats),
        instances_analyzed: stats.instances().len(),
        ..AnalysisReport::default()
    };
    for (component, result) in components.into_iter().zip(results) {
        match result {
            Some(analysis) => report.components.push(analysis),
            None => {
                tracing::warn!("Component {} is unfittable, excluded from results", component);
                report.unfittable.push(component);
            }
        }
    }

    report.treemap = treemap_entries(stats, &report.components);
    Ok(report)
}

/// End-to-end: property CSV + trace directory to report
pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    properties_csv: P,
    data_dir: Q,
    config: &AnalysisConfig,
) -> Result<AnalysisReport> {
    config.validate().map_err(|e| anyhow!(e))?;

    tracing::info!("Loading CSV {}", properties_csv.as_ref().display());
    let instances = InstanceTable::from_file(properties_csv, &config.id_column, &config.properties)?;

    tracing::info!("Loading profiler data");
    let files = discover_trace_files(data_dir, &config.required_tags)?;
    let outcome = fold_files(&files, config);
    let stats = aggregate(&outcome.traces);

    tracing::info!("Analyzing complexity");
    let mut report = analyze_complexity(&instances, &stats, config)?;
    report.failures = outcome.failures;
    Ok(report)
}

/// Instances with timings but no property row, in id order
pub fn missing_instances(instances: &InstanceTable, stats: &TimeStatsTable) -> Vec<String> {
    stats
        .instances()
        .into_iter()
        .filter(|id| !instances.contains(id))
        .map(str::to_string)
        .collect()
}

fn treemap_entries(stats: &TimeStatsTable, analyses: &[ComponentAnalysis]) -> Vec<TreemapEntry> {
    let by_component: BTreeMap<&CallPath, &ComponentAnalysis> =
        analyses.iter().map(|a| (&a.component, a)).collect();

    stats
        .treemap_nodes()
        .into_iter()
        .map(|node| {
            let analysis = by_component.get(&node.component);
            TreemapEntry {
                property: analysis.map(|a| a.property.clone()),
                function: analysis.map(|a| a.best().label()),
                r_squared: analysis.map(|a| a.best().r_squared),
                node,
            }
        })
        .collect()
}

/// Order-preserving map over `items` using up to `jobs` scoped threads
fn parallel_map<T, R, F>(items: &[T], jobs: usize, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    if jobs <= 1 || items.len() <= 1 {
        return items.iter().map(f).collect();
    }

    let chunk_size = items.len().div_ceil(jobs);
    let f = &f;
    crossbeam::thread::scope(|s| {
        let handles: Vec<_> = items
            .chunks(chunk_size)
            .map(|chunk| s.spawn(move |_| chunk.iter().map(f).collect::<Vec<R>>()))
            .collect();

        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect()
    })
    .unwrap_or_else(|e| std::panic::resume_unwind(e))
}
