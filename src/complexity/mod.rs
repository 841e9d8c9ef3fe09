// Empirical complexity estimation
//
// For each component, fits a fixed catalog of single-parameter growth
// functions (constant, logarithmic, linear, linearithmic, quadratic,
// exponential) against every instance property by least squares, and keeps
// the (property, function) pair with the highest coefficient of
// determination (R²).
//
// No significance testing is performed: R² only ranks candidates.

mod config;
mod fitter;
mod growth;
mod selector;

pub use config::AnalysisConfig;
pub use fitter::{fit, r_squared, CandidateFit, FitError, MIN_POINTS};
pub use growth::GrowthFunction;
pub use selector::{
    analyze_component, calculate_fitting_funcs, find_best_instance_property, ComponentAnalysis,
};
