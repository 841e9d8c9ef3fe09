// Model selection for one component
//
// Two exhaustive nested searches:
// - inner: every catalog function against one (component, property) series,
//   ranked by R² descending
// - outer: every instance property, keeping the one whose top fit has the
//   strictly highest R² (first found wins ties)

use crate::aggregate::TimeStatsTable;
use crate::call_path::CallPath;
use crate::complexity::fitter::{fit, CandidateFit};
use crate::complexity::growth::GrowthFunction;
use crate::instances::InstanceTable;
use crate::join::{join_instance_timestats, ComponentTimeSeries};
use serde::{Deserialize, Serialize};

/// Winning property of a component with its ranked fits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentAnalysis {
    pub component: CallPath,
    pub property: String,
    /// Ranked by R² descending; never empty
    pub fits: Vec<CandidateFit>,
    /// Series the fits were computed on
    pub series: ComponentTimeSeries,
}

impl ComponentAnalysis {
    /// Top-ranked fit
    pub fn best(&self) -> &CandidateFit {
        &self.fits[0]
    }

    /// Keep only the `n` best fits
    pub fn truncate_fits(&mut self, n: usize) {
        self.fits.truncate(n.max(1));
    }
}

/// Fit every catalog function to `series`, drop failures, rank by R².
///
/// The sort is stable, so equal R² keeps catalog declaration order.
pub fn calculate_fitting_funcs(series: &ComponentTimeSeries) -> Vec<CandidateFit> {
    let mut fits: Vec<CandidateFit> = GrowthFunction::CATALOG
        .into_iter()
        .filter_map(|function| match fit(function, series) {
            Ok(candidate) => Some(candidate),
            Err(e) => {
                tracing::debug!(
                    component = %series.component,
                    property = %series.property,
                    "Skipping candidate: {}",
                    e
                );
                None
            }
        })
        .collect();

    fits.sort_by(|a, b| b.r_squared.total_cmp(&a.r_squared));
    fits
}

/// Find the property that best explains `component`'s timings.
///
/// Returns `None` when no (property, function) pair produced a fit.
pub fn find_best_instance_property(
    instances: &InstanceTable,
    stats: &TimeStatsTable,
    component: &CallPath,
) -> Option<ComponentAnalysis> {
    let mut best: Option<ComponentAnalysis> = None;

    for property in instances.properties() {
        let series = join_instance_timestats(instances, stats, component, property);
        let fits = calculate_fitting_funcs(&series);

        let Some(top) = fits.first() else {
            continue;
        };

        let improves = best
            .as_ref()
            .map_or(true, |current| top.r_squared > current.best().r_squared);
        if improves {
            best = Some(ComponentAnalysis {
                component: component.clone(),
                property: property.clone(),
                fits,
                series,
            });
        }
    }

    best
}

/// Full selection for one component, keeping `top_fits` ranked fits
pub fn analyze_component(
    instances: &InstanceTable,
    stats: &TimeStatsTable,
    component: &CallPath,
    top_fits: usize,
) -> Option<ComponentAnalysis> {
    let mut analysis = find_best_instance_property(instances, stats, component)?;
    analysis.truncate_fits(top_fits);

    let best = analysis.best();
    tracing::info!(
        "Component {} performance predicted as {} by {} - R2: {}",
        component,
        best.label(),
        analysis.property,
        best.r_squared
    );
    Some(analysis)
}
