//! Cross-instance timing summaries for reports
//!
//! Summaries use Trueno vectors for SIMD-accelerated mean / stddev / min /
//! max and aprender's `DescriptiveStats` for the median. They are display
//! figures only; fitting works on the exact f64 means.

use crate::aggregate::TimeStatsTable;
use crate::call_path::CallPath;
use aprender::stats::DescriptiveStats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use trueno::Vector;

/// Spread of one component's mean time across instances (milliseconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingSummary {
    pub instances: usize,
    pub mean: f32,
    pub stddev: f32,
    pub min: f32,
    pub max: f32,
    pub median: f32,
}

/// Summarize a set of per-instance times
pub fn summarize(times_ms: &[f64]) -> Option<TimingSummary> {
    if times_ms.is_empty() {
        return None;
    }

    let samples: Vec<f32> = times_ms.iter().map(|&t| t as f32).collect();
    let v = Vector::from_slice(&samples);

    let median = DescriptiveStats::new(&v)
        .quantile(0.5)
        .unwrap_or_else(|e| {
            tracing::debug!("Median unavailable: {}", e);
            0.0
        });

    Some(TimingSummary {
        instances: samples.len(),
        mean: v.mean().unwrap_or(0.0),
        stddev: v.stddev().unwrap_or(0.0),
        min: v.min().unwrap_or(0.0),
        max: v.max().unwrap_or(0.0),
        median,
    })
}

/// One summary per component in the table
pub fn component_summaries(stats: &TimeStatsTable) -> BTreeMap<CallPath, TimingSummary> {
    let mut grouped: BTreeMap<CallPath, Vec<f64>> = BTreeMap::new();
    for row in stats.rows() {
        grouped
            .entry(row.call_path.clone())
            .or_default()
            .push(row.elapsed_millis);
    }

    grouped
        .into_iter()
        .filter_map(|(path, times)| summarize(&times).map(|s| (path, s)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace_folder::TimeStat;

    #[test]
    fn test_summarize_empty() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn test_summarize_basic() {
        let summary = summarize(&[2.0, 4.0, 6.0, 8.0]).unwrap();
        assert_eq!(summary.instances, 4);
        assert!((summary.mean - 5.0).abs() < 1e-4);
        assert!((summary.min - 2.0).abs() < 1e-4);
        assert!((summary.max - 8.0).abs() < 1e-4);
        assert!((summary.median - 5.0).abs() < 1e-4);
        assert!(summary.stddev > 2.0 && summary.stddev < 2.6);
    }

    #[test]
    fn test_summarize_single_value() {
        let summary = summarize(&[3.5]).unwrap();
        assert_eq!(summary.instances, 1);
        assert!((summary.median - 3.5).abs() < 1e-6);
        assert!((summary.min - summary.max).abs() < 1e-6);
    }

    #[test]
    fn test_component_summaries() {
        let table = TimeStatsTable::from_rows(vec![
            TimeStat::new("a", CallPath::from("X::solve"), 1.0),
            TimeStat::new("b", CallPath::from("X::solve"), 3.0),
            TimeStat::new("a", CallPath::from("Y::other"), 9.0),
        ]);
        let summaries = component_summaries(&table);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[&CallPath::from("X::solve")].instances, 2);
        assert!((summaries[&CallPath::from("Y::other")].mean - 9.0).abs() < 1e-6);
    }
}
