//! Joining component timings with instance properties
//!
//! For one component and one property the joiner produces the series the
//! fitter regresses on: `x` is the property value, `y` the mean time of all
//! instances sharing that value, sorted by `x` with unique `x` values.

use crate::aggregate::TimeStatsTable;
use crate::call_path::CallPath;
use crate::instances::InstanceTable;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Property value
    pub x: f64,
    /// Mean elapsed time (ms)
    pub y: f64,
}

/// `(property value, mean time)` series of one component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentTimeSeries {
    pub component: CallPath,
    pub property: String,
    pub points: Vec<SeriesPoint>,
    /// Timed instances that had no row in the property table
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub dropped_instances: Vec<String>,
}

impl ComponentTimeSeries {
    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    /// Number of distinct property values
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Build the series of `component` against `property`.
///
/// Instances timed but absent from the property table are dropped and
/// listed in `dropped_instances`; the pipeline warns about them once.
pub fn join_instance_timestats(
    instances: &InstanceTable,
    stats: &TimeStatsTable,
    component: &CallPath,
    property: &str,
) -> ComponentTimeSeries {
    let mut pairs: Vec<SeriesPoint> = Vec::new();
    let mut dropped_instances = Vec::new();

    for (instance_id, time) in stats.component_times(component) {
        match instances.value(instance_id, property) {
            Some(x) => pairs.push(SeriesPoint { x, y: time }),
            None => {
                tracing::trace!(
                    instance = instance_id,
                    property,
                    component = %component,
                    "Dropping instance without properties from join"
                );
                dropped_instances.push(instance_id.to_string());
            }
        }
    }

    pairs.sort_by(|a, b| a.x.total_cmp(&b.x));

    let mut points: Vec<SeriesPoint> = Vec::with_capacity(pairs.len());
    let mut group: Vec<f64> = Vec::new();
    let mut current_x = None;
    for pair in pairs {
        if current_x != Some(pair.x) {
            if let Some(x) = current_x {
                points.push(SeriesPoint { x, y: mean(&group) });
            }
            group.clear();
            current_x = Some(pair.x);
        }
        group.push(pair.y);
    }
    if let Some(x) = current_x {
        points.push(SeriesPoint { x, y: mean(&group) });
    }

    ComponentTimeSeries {
        component: component.clone(),
        property: property.to_string(),
        points,
        dropped_instances,
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace_folder::TimeStat;

    fn table(rows: &[(&str, &str, f64)]) -> TimeStatsTable {
        TimeStatsTable::from_rows(
            rows.iter()
                .map(|(i, p, t)| TimeStat::new(i, CallPath::from(*p), *t)),
        )
    }

    fn instances() -> InstanceTable {
        InstanceTable::from_csv_str("id,n,m\na,100,1\nb,10,2\nc,10,3\nd,50,4\n", "id", &[])
            .unwrap()
    }

    #[test]
    fn test_join_sorts_by_property_value() {
        let stats = table(&[("a", "X::solve", 50.0), ("d", "X::solve", 25.0), ("b", "X::solve", 5.0)]);
        let series = join_instance_timestats(&instances(), &stats, &CallPath::from("X::solve"), "n");

        assert_eq!(series.xs(), vec![10.0, 50.0, 100.0]);
        assert_eq!(series.ys(), vec![5.0, 25.0, 50.0]);
        assert_eq!(series.property, "n");
    }

    #[test]
    fn test_join_averages_shared_property_values() {
        let stats = table(&[("b", "X::solve", 4.0), ("c", "X::solve", 6.0)]);
        let series = join_instance_timestats(&instances(), &stats, &CallPath::from("X::solve"), "n");

        assert_eq!(series.len(), 1);
        assert_eq!(series.points[0], SeriesPoint { x: 10.0, y: 5.0 });
    }

    #[test]
    fn test_join_drops_unknown_instances() {
        let stats = table(&[("a", "X::solve", 1.0), ("zzz", "X::solve", 9.0)]);
        let series = join_instance_timestats(&instances(), &stats, &CallPath::from("X::solve"), "m");

        assert_eq!(series.len(), 1);
        assert_eq!(series.dropped_instances, vec!["zzz".to_string()]);
    }

    #[test]
    fn test_join_only_uses_requested_component() {
        let stats = table(&[("a", "X::solve", 1.0), ("b", "Y::other", 2.0)]);
        let series = join_instance_timestats(&instances(), &stats, &CallPath::from("Y::other"), "m");
        assert_eq!(series.points, vec![SeriesPoint { x: 2.0, y: 2.0 }]);
    }

    #[test]
    fn test_join_unknown_component_is_empty() {
        let stats = table(&[("a", "X::solve", 1.0)]);
        let series = join_instance_timestats(&instances(), &stats, &CallPath::from("nope"), "n");
        assert!(series.is_empty());
    }
}
