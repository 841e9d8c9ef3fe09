// Fixed catalog of candidate growth functions
//
// Every candidate has a single free scale parameter `a`: f(x; a) = a * g(x).
// The catalog is closed; declaration order is also the tie-break order
// when two candidates explain a series equally well.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Candidate asymptotic growth function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthFunction {
    /// a
    Constant,
    /// a·ln(n)
    Logarithmic,
    /// a·n
    Linear,
    /// a·n·ln(n)
    Linearithmic,
    /// a·n²
    Quadratic,
    /// a·2ⁿ
    Exponential,
}

impl GrowthFunction {
    /// All candidates in declaration (tie-break) order
    pub const CATALOG: [GrowthFunction; 6] = [
        GrowthFunction::Constant,
        GrowthFunction::Logarithmic,
        GrowthFunction::Linear,
        GrowthFunction::Linearithmic,
        GrowthFunction::Quadratic,
        GrowthFunction::Exponential,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GrowthFunction::Constant => "constant",
            GrowthFunction::Logarithmic => "logarithmic",
            GrowthFunction::Linear => "linear",
            GrowthFunction::Linearithmic => "linearithmic",
            GrowthFunction::Quadratic => "quadratic",
            GrowthFunction::Exponential => "exponential",
        }
    }

    /// g(x), the shape scaled by `a`
    pub fn basis(self, x: f64) -> f64 {
        match self {
            GrowthFunction::Constant => 1.0,
            GrowthFunction::Logarithmic => x.ln(),
            GrowthFunction::Linear => x,
            GrowthFunction::Linearithmic => x * x.ln(),
            GrowthFunction::Quadratic => x * x,
            GrowthFunction::Exponential => x.exp2(),
        }
    }

    /// f(x; a)
    pub fn evaluate(self, x: f64, a: f64) -> f64 {
        a * self.basis(x)
    }

    /// Whether the function is only defined for x > 0
    pub fn requires_positive(self) -> bool {
        matches!(
            self,
            GrowthFunction::Logarithmic | GrowthFunction::Linearithmic
        )
    }

    /// Display template, `a` is the placeholder for the fitted parameter
    pub fn template(self) -> &'static str {
        match self {
            GrowthFunction::Constant => "a",
            GrowthFunction::Logarithmic => "a·log(n)",
            GrowthFunction::Linear => "a·n",
            GrowthFunction::Linearithmic => "a·n·log(n)",
            GrowthFunction::Quadratic => "a·n²",
            GrowthFunction::Exponential => "a·2ⁿ",
        }
    }

    /// LaTeX template, used by chart titles and legends
    pub fn latex_template(self) -> &'static str {
        match self {
            GrowthFunction::Constant => r"a",
            GrowthFunction::Logarithmic => r"a \cdot \log(n)",
            GrowthFunction::Linear => r"a \cdot n",
            GrowthFunction::Linearithmic => r"a \cdot n \log(n)",
            GrowthFunction::Quadratic => r"a \cdot n^2",
            GrowthFunction::Exponential => r"a \cdot 2^n",
        }
    }

    /// Template with `a` replaced by the parameter rounded to one decimal
    pub fn format_with(self, a: f64) -> String {
        substitute(self.template(), a)
    }

    pub fn latex_with(self, a: f64) -> String {
        substitute(self.latex_template(), a)
    }
}

// Templates carry exactly one `a`, always the leading character
fn substitute(template: &str, a: f64) -> String {
    let rest = template.strip_prefix('a').unwrap_or(template);
    format!("{:.1}{}", a, rest)
}

impl fmt::Display for GrowthFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GrowthFunction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GrowthFunction::CATALOG
            .into_iter()
            .find(|g| g.label() == s)
            .ok_or_else(|| format!("Unknown growth function: {}", s))
    }
}
