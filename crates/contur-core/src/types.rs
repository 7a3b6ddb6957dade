//! Common data types

use serde::{Deserialize, Serialize};

/// Which dataset an objective or log-density is conditioned on.
///
/// - `Observed`: the experimental data is taken as truth (post-fit).
/// - `APosteriori`: expected results under the post-fit prescription; the
///   experimental data is still the baseline.
/// - `APriori`: expected results under the pre-fit prescription; the
///   background-only prediction stands in for the observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expectation {
    /// Post-fit, observed data.
    #[default]
    Observed,
    /// Post-fit expected.
    APosteriori,
    /// Pre-fit expected (background-only data).
    APriori,
}

impl Expectation {
    /// Whether the background-only yields replace the observation.
    pub fn uses_background_as_data(self) -> bool {
        matches!(self, Expectation::APriori)
    }
}

impl std::str::FromStr for Expectation {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "observed" => Ok(Expectation::Observed),
            "aposteriori" => Ok(Expectation::APosteriori),
            "apriori" => Ok(Expectation::APriori),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown expectation type '{other}' (expected observed, aposteriori or apriori)"
            ))),
        }
    }
}

/// Model configuration handed to a minimizer.
///
/// Infinite bounds serialize as JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelConfig {
    /// Index of the parameter of interest.
    pub poi_index: usize,

    /// Smallest POI keeping every signal-bearing bin non-negative at zero
    /// nuisance displacement.
    pub minimum_poi: f64,

    /// Suggested starting point.
    pub suggested_init: Vec<f64>,

    /// `(low, high)` per parameter. Unbounded sides are infinite.
    pub suggested_bounds: Vec<(f64, f64)>,
}
