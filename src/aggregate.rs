//! Aggregation of folded traces into one mean time per (instance, component)
//!
//! Several trace documents may describe the same instance; their per-path
//! means are averaged together. Rows come out ordered by
//! `(instance_id, call_path)` so downstream processing is deterministic.

use crate::call_path::CallPath;
use crate::trace_folder::{FoldedTrace, TimeStat};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Mean time of one component across all instances, positioned in the call tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreemapNode {
    pub component: CallPath,
    pub parent: String,
    pub child: String,
    pub mean_millis: f64,
}

/// Aggregated timings, one row per (instance, component)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeStatsTable {
    rows: Vec<TimeStat>,
}

impl TimeStatsTable {
    /// Build from raw rows, averaging duplicate (instance, path) entries
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = TimeStat>,
    {
        let mut grouped: BTreeMap<(String, CallPath), Vec<f64>> = BTreeMap::new();
        for row in rows {
            grouped
                .entry((row.instance_id, row.call_path))
                .or_default()
                .push(row.elapsed_millis);
        }

        let rows = grouped
            .into_iter()
            .map(|((instance_id, path), times)| {
                if times.len() > 1 {
                    tracing::debug!(
                        instance = %instance_id,
                        component = %path,
                        entries = times.len(),
                        "Averaging duplicate entries"
                    );
                }
                TimeStat::new(&instance_id, path, mean(&times))
            })
            .collect();

        Self { rows }
    }

    pub fn rows(&self) -> &[TimeStat] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct components, sorted
    pub fn components(&self) -> Vec<CallPath> {
        self.rows
            .iter()
            .map(|r| r.call_path.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct instance ids, sorted
    pub fn instances(&self) -> Vec<&str> {
        self.rows
            .iter()
            .map(|r| r.instance_id.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// `(instance_id, mean ms)` pairs for one component, ordered by instance
    pub fn component_times<'a>(
        &'a self,
        component: &'a CallPath,
    ) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        self.rows
            .iter()
            .filter(move |r| &r.call_path == component)
            .map(|r| (r.instance_id.as_str(), r.elapsed_millis))
    }

    /// Mean time per component across instances, with parent/child labels
    pub fn treemap_nodes(&self) -> Vec<TreemapNode> {
        let mut grouped: BTreeMap<&CallPath, Vec<f64>> = BTreeMap::new();
        for row in &self.rows {
            grouped
                .entry(&row.call_path)
                .or_default()
                .push(row.elapsed_millis);
        }

        grouped
            .into_iter()
            .map(|(path, times)| TreemapNode {
                component: path.clone(),
                parent: path.parent().to_string(),
                child: path.leaf().to_string(),
                mean_millis: mean(&times),
            })
            .collect()
    }
}

/// Merge all per-instance folder outputs into one table
pub fn aggregate(traces: &[FoldedTrace]) -> TimeStatsTable {
    TimeStatsTable::from_rows(traces.iter().flat_map(FoldedTrace::rows))
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
