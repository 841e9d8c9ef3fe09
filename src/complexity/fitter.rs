// Least-squares fitting of one growth function to one component series
//
// Each candidate is f(x; a) = a * g(x) with a single free parameter, so the
// least-squares minimiser has the closed form
//
//     a = Σ g(x)·y / Σ g(x)²
//
// and the parameter variance is s² / Σ g(x)² with s² = RSS / (n - 1).
// A fit whose variance is undefined (fewer than two points, zero basis,
// non-finite values) is degenerate and skipped by the caller.

use crate::complexity::growth::GrowthFunction;
use crate::join::{ComponentTimeSeries, SeriesPoint};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum number of distinct property values for a meaningful fit
pub const MIN_POINTS: usize = 2;

/// Why a candidate produced no fit. All variants are recoverable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    #[error("Insufficient data: need at least {required} distinct values, got {actual}")]
    InsufficientPoints { required: usize, actual: usize },

    #[error("{function} is undefined at x={x}")]
    OutOfDomain { function: GrowthFunction, x: f64 },

    #[error("Degenerate fit for {function}: parameter covariance is undefined")]
    Degenerate { function: GrowthFunction },
}

/// One fitted candidate for a (component, property) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateFit {
    pub function: GrowthFunction,
    pub property: String,
    /// Coefficient of determination, unclamped (may be negative)
    pub r_squared: f64,
    /// Fitted scale parameter `a`
    pub parameter: f64,
    /// Variance of `a`
    pub parameter_variance: f64,
    /// Residual sum of squares
    pub rss: f64,
    /// Predicted values at each observed x
    pub curve: Vec<SeriesPoint>,
}

impl CandidateFit {
    /// `0.5·n²`
    pub fn name(&self) -> String {
        self.function.format_with(self.parameter)
    }

    /// `Θ(0.5·n²)`
    pub fn label(&self) -> String {
        format!("Θ({})", self.name())
    }

    pub fn latex(&self) -> String {
        self.function.latex_with(self.parameter)
    }
}

/// Fit `function` to `series`
pub fn fit(function: GrowthFunction, series: &ComponentTimeSeries) -> Result<CandidateFit, FitError> {
    let points = &series.points;
    if points.len() < MIN_POINTS {
        return Err(FitError::InsufficientPoints {
            required: MIN_POINTS,
            actual: points.len(),
        });
    }

    if function.requires_positive() {
        if let Some(p) = points.iter().find(|p| p.x <= 0.0) {
            return Err(FitError::OutOfDomain { function, x: p.x });
        }
    }

    let basis: Vec<f64> = points.iter().map(|p| function.basis(p.x)).collect();
    if basis.iter().any(|g| !g.is_finite()) {
        return Err(FitError::Degenerate { function });
    }

    let sum_gg: f64 = basis.iter().map(|g| g * g).sum();
    let sum_gy: f64 = basis.iter().zip(points).map(|(g, p)| g * p.y).sum();
    if sum_gg == 0.0 || !sum_gg.is_finite() {
        return Err(FitError::Degenerate { function });
    }

    let parameter = sum_gy / sum_gg;
    let curve: Vec<SeriesPoint> = basis
        .iter()
        .zip(points)
        .map(|(g, p)| SeriesPoint {
            x: p.x,
            y: parameter * g,
        })
        .collect();

    let rss: f64 = curve
        .iter()
        .zip(points)
        .map(|(fitted, observed)| (observed.y - fitted.y).powi(2))
        .sum();

    let dof = (points.len() - 1) as f64;
    let parameter_variance = rss / dof / sum_gg;
    if !parameter.is_finite() || !parameter_variance.is_finite() {
        return Err(FitError::Degenerate { function });
    }

    let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
    let r_squared = r_squared(&ys, rss);

    Ok(CandidateFit {
        function,
        property: series.property.clone(),
        r_squared,
        parameter,
        parameter_variance,
        rss,
        curve,
    })
}

/// R² = 1 - RSS / TSS.
///
/// A series with no variance is explained perfectly only by a zero-residual
/// fit; anything else scores -∞.
pub fn r_squared(observed: &[f64], rss: f64) -> f64 {
    let n = observed.len() as f64;
    let mean = observed.iter().sum::<f64>() / n;
    let tss: f64 = observed.iter().map(|y| (y - mean).powi(2)).sum();

    // Relative to the signal energy so constant series survive rounding
    let scale = observed.iter().map(|y| y * y).sum::<f64>().max(f64::MIN_POSITIVE);
    let tolerance = scale * f64::EPSILON * f64::EPSILON;

    if tss <= tolerance {
        if rss <= tolerance {
            1.0
        } else {
            f64::NEG_INFINITY
        }
    } else {
        1.0 - rss / tss
    }
}
