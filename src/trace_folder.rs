//! Trace folding: flat enter/exit events to per-path durations
//!
//! Events of one experiment instance are sorted by timestamp (stable, so
//! events sharing a timestamp keep their recorded order) and replayed on an
//! explicit [`CallStack`]:
//!
//! - enter pushes a frame
//! - exit captures the current path, pops the top frame (which must carry
//!   the same qualified name) and records `(exit - enter) / 1e6` ms under
//!   that path
//! - once all events are consumed the stack must be empty
//!
//! Any violation aborts the instance with a [`TraceError`].

use crate::call_path::CallPath;
use crate::call_stack::{CallStack, StackViolation};
use crate::event::{Event, TraceDocument};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

const NANOS_PER_MILLI: f64 = 1_000_000.0;

/// Integrity errors while folding one instance's trace
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraceError {
    #[error("Unexpected stack frame at t={timestamp}: exit of {found} while {expected} is open")]
    StackMismatch {
        expected: String,
        found: String,
        timestamp: i64,
    },

    #[error("Exit of {found} at t={timestamp} with no open frame")]
    UnmatchedExit { found: String, timestamp: i64 },

    #[error("Truncated trace: {open_frames} frame(s) still open, innermost {innermost}")]
    TruncatedTrace { open_frames: usize, innermost: String },

    #[error("Call stack exceeded maximum depth of {limit} at t={timestamp}")]
    DepthExceeded { limit: usize, timestamp: i64 },

    #[error("Trace has {actual} events, limit is {limit}")]
    EventLimitExceeded { limit: usize, actual: usize },
}

/// Bounds protecting the folder from pathological traces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldLimits {
    pub max_stack_depth: usize,
    pub max_events: usize,
}

impl Default for FoldLimits {
    fn default() -> Self {
        Self {
            max_stack_depth: 10_000,
            max_events: 10_000_000,
        }
    }
}

/// Mean timing of one call path within one instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeStat {
    pub instance_id: String,
    pub call_path: CallPath,
    /// Path with the last segment removed, empty for root calls
    pub parent_path: String,
    /// Last segment of the path
    pub leaf_name: String,
    /// Mean elapsed time (milliseconds)
    pub elapsed_millis: f64,
}

impl TimeStat {
    pub fn new(instance_id: &str, call_path: CallPath, elapsed_millis: f64) -> Self {
        Self {
            instance_id: instance_id.to_string(),
            parent_path: call_path.parent().to_string(),
            leaf_name: call_path.leaf().to_string(),
            call_path,
            elapsed_millis,
        }
    }
}

/// Durations observed per call path for one instance
#[derive(Debug, Clone, PartialEq)]
pub struct FoldedTrace {
    pub instance_id: String,
    durations: BTreeMap<CallPath, Vec<f64>>,
}

impl FoldedTrace {
    /// Elapsed milliseconds per path, in closing order
    pub fn durations(&self) -> &BTreeMap<CallPath, Vec<f64>> {
        &self.durations
    }

    pub fn get(&self, path: &str) -> Option<&[f64]> {
        self.durations.get(&CallPath::from(path)).map(Vec::as_slice)
    }

    /// Number of closed frames across all paths
    pub fn call_count(&self) -> usize {
        self.durations.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// One row per path holding the mean of its durations, ordered by path
    pub fn rows(&self) -> Vec<TimeStat> {
        self.durations
            .iter()
            .map(|(path, samples)| {
                let mean = samples.iter().sum::<f64>() / samples.len() as f64;
                TimeStat::new(&self.instance_id, path.clone(), mean)
            })
            .collect()
    }
}

/// Fold one profiler document
pub fn fold_document(doc: &TraceDocument, limits: FoldLimits) -> Result<FoldedTrace, TraceError> {
    fold_events(&doc.instance_id, &doc.time_data, limits)
}

/// Fold an unordered list of events belonging to one instance
pub fn fold_events(
    instance_id: &str,
    events: &[Event],
    limits: FoldLimits,
) -> Result<FoldedTrace, TraceError> {
    if events.len() > limits.max_events {
        return Err(TraceError::EventLimitExceeded {
            limit: limits.max_events,
            actual: events.len(),
        });
    }

    let mut ordered: Vec<&Event> = events.iter().collect();
    ordered.sort_by_key(|e| e.timestamp);

    let mut stack = CallStack::new(limits.max_stack_depth);
    let mut durations: BTreeMap<CallPath, Vec<f64>> = BTreeMap::new();

    for event in ordered {
        let name = event.qualified_name();
        if event.is_enter {
            stack
                .push(name, event.timestamp)
                .map_err(|o| TraceError::DepthExceeded {
                    limit: o.limit,
                    timestamp: event.timestamp,
                })?;
            continue;
        }

        let current = stack.current_path();
        let frame = stack
            .pop_verified(&name)
            .map_err(|v| violation(v, name, event.timestamp))?;

        // Sorted order guarantees exit >= enter
        let elapsed = event.timestamp.abs_diff(frame.start_time) as f64 / NANOS_PER_MILLI;
        durations.entry(current).or_default().push(elapsed);
    }

    if let Some(top) = stack.top() {
        return Err(TraceError::TruncatedTrace {
            open_frames: stack.depth(),
            innermost: top.qualified_name.clone(),
        });
    }

    tracing::trace!(
        instance = instance_id,
        paths = durations.len(),
        "Folded trace"
    );

    Ok(FoldedTrace {
        instance_id: instance_id.to_string(),
        durations,
    })
}

fn violation(v: StackViolation, closing: String, timestamp: i64) -> TraceError {
    match v {
        StackViolation::Empty => TraceError::UnmatchedExit {
            found: closing,
            timestamp,
        },
        StackViolation::Mismatch { expected, found } => TraceError::StackMismatch {
            expected,
            found,
            timestamp,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> FoldLimits {
        FoldLimits::default()
    }

    #[test]
    fn test_single_call() {
        let events = vec![
            Event::enter(1_000_000, "X", "solve"),
            Event::exit(6_000_000, "X", "solve"),
        ];
        let folded = fold_events("i1", &events, limits()).unwrap();

        assert_eq!(folded.get("X::solve"), Some(&[5.0][..]));
        assert_eq!(folded.call_count(), 1);
    }

    #[test]
    fn test_nested_calls_produce_nested_paths() {
        let events = vec![
            Event::enter(0, "A", "run"),
            Event::enter(1_000_000, "B", "step"),
            Event::enter(2_000_000, "C", "eval"),
            Event::exit(2_500_000, "C", "eval"),
            Event::exit(4_000_000, "B", "step"),
            Event::exit(10_000_000, "A", "run"),
        ];
        let folded = fold_events("i1", &events, limits()).unwrap();

        assert_eq!(folded.get("A::run"), Some(&[10.0][..]));
        assert_eq!(folded.get("A::run/B::step"), Some(&[3.0][..]));
        assert_eq!(folded.get("A::run/B::step/C::eval"), Some(&[0.5][..]));
    }

    #[test]
    fn test_events_are_sorted_before_folding() {
        let events = vec![
            Event::exit(9_000_000, "A", "run"),
            Event::exit(5_000_000, "B", "step"),
            Event::enter(0, "A", "run"),
            Event::enter(2_000_000, "B", "step"),
        ];
        let folded = fold_events("i1", &events, limits()).unwrap();

        assert_eq!(folded.get("A::run"), Some(&[9.0][..]));
        assert_eq!(folded.get("A::run/B::step"), Some(&[3.0][..]));
    }

    #[test]
    fn test_equal_timestamps_keep_recorded_order() {
        // Zero-length call: enter and exit share a timestamp
        let events = vec![
            Event::enter(0, "A", "run"),
            Event::enter(5, "B", "noop"),
            Event::exit(5, "B", "noop"),
            Event::exit(10, "A", "run"),
        ];
        let folded = fold_events("i1", &events, limits()).unwrap();
        assert_eq!(folded.get("A::run/B::noop"), Some(&[0.0][..]));
    }

    #[test]
    fn test_repeated_calls_accumulate() {
        let events = vec![
            Event::enter(0, "A", "run"),
            Event::enter(0, "B", "step"),
            Event::exit(1_000_000, "B", "step"),
            Event::enter(1_000_000, "B", "step"),
            Event::exit(4_000_000, "B", "step"),
            Event::exit(4_000_000, "A", "run"),
        ];
        let folded = fold_events("i1", &events, limits()).unwrap();

        assert_eq!(folded.get("A::run/B::step"), Some(&[1.0, 3.0][..]));
        let rows = folded.rows();
        let step = rows
            .iter()
            .find(|r| r.call_path.as_str() == "A::run/B::step")
            .unwrap();
        assert_eq!(step.elapsed_millis, 2.0);
        assert_eq!(step.parent_path, "A::run");
        assert_eq!(step.leaf_name, "B::step");
    }

    #[test]
    fn test_root_row_has_empty_parent() {
        let events = vec![Event::enter(0, "A", "run"), Event::exit(1, "A", "run")];
        let rows = fold_events("i1", &events, limits()).unwrap().rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].parent_path, "");
        assert_eq!(rows[0].leaf_name, "A::run");
        assert_eq!(rows[0].instance_id, "i1");
    }

    #[test]
    fn test_stack_mismatch() {
        let events = vec![
            Event::enter(0, "A", "run"),
            Event::enter(1, "B", "step"),
            Event::exit(2, "A", "run"),
        ];
        let err = fold_events("i1", &events, limits()).unwrap_err();
        assert_eq!(
            err,
            TraceError::StackMismatch {
                expected: "B::step".to_string(),
                found: "A::run".to_string(),
                timestamp: 2,
            }
        );
    }

    #[test]
    fn test_exit_without_enter() {
        let events = vec![Event::exit(3, "A", "run")];
        let err = fold_events("i1", &events, limits()).unwrap_err();
        assert_eq!(
            err,
            TraceError::UnmatchedExit {
                found: "A::run".to_string(),
                timestamp: 3,
            }
        );
    }

    #[test]
    fn test_truncated_trace() {
        let events = vec![
            Event::enter(0, "A", "run"),
            Event::enter(1, "B", "step"),
            Event::exit(2, "B", "step"),
        ];
        let err = fold_events("i1", &events, limits()).unwrap_err();
        assert_eq!(
            err,
            TraceError::TruncatedTrace {
                open_frames: 1,
                innermost: "A::run".to_string(),
            }
        );
    }

    #[test]
    fn test_depth_limit() {
        let events: Vec<Event> = (0..5).map(|i| Event::enter(i, "R", "recurse")).collect();
        let limits = FoldLimits {
            max_stack_depth: 3,
            ..FoldLimits::default()
        };
        let err = fold_events("i1", &events, limits).unwrap_err();
        assert_eq!(
            err,
            TraceError::DepthExceeded {
                limit: 3,
                timestamp: 3,
            }
        );
    }

    #[test]
    fn test_event_limit() {
        let events = vec![Event::enter(0, "A", "run"), Event::exit(1, "A", "run")];
        let limits = FoldLimits {
            max_events: 1,
            ..FoldLimits::default()
        };
        assert_eq!(
            fold_events("i1", &events, limits).unwrap_err(),
            TraceError::EventLimitExceeded {
                limit: 1,
                actual: 2,
            }
        );
    }

    #[test]
    fn test_empty_trace() {
        let folded = fold_events("i1", &[], limits()).unwrap();
        assert!(folded.is_empty());
        assert!(folded.rows().is_empty());
    }

    #[test]
    fn test_fold_document() {
        let doc = TraceDocument::new(
            "berlin52",
            vec![Event::enter(0, "A", "run"), Event::exit(2_000_000, "A", "run")],
        );
        let folded = fold_document(&doc, limits()).unwrap();
        assert_eq!(folded.instance_id, "berlin52");
        assert_eq!(folded.get("A::run"), Some(&[2.0][..]));
    }

    #[test]
    fn test_error_messages() {
        let err = TraceError::StackMismatch {
            expected: "B::step".to_string(),
            found: "A::run".to_string(),
            timestamp: 2,
        };
        assert_eq!(
            err.to_string(),
            "Unexpected stack frame at t=2: exit of A::run while B::step is open"
        );
    }
}
