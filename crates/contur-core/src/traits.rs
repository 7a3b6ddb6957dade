//! Core traits
//!
//! Statistical models expose themselves to optimizers and samplers through
//! these traits, so inference code never depends on a concrete model type.

use crate::Result;

/// A model with a (negative) log-density over a flat parameter vector.
///
/// This is the seam consumed by external minimizers: they need only a
/// dimension, bounds, a starting point, the NLL and its gradient.
pub trait LogDensityModel: Send + Sync {
    /// Number of parameters.
    fn dim(&self) -> usize;

    /// Parameter names, in parameter-vector order.
    fn parameter_names(&self) -> Vec<String>;

    /// Parameter bounds `(min, max)`; unbounded sides are infinite.
    fn parameter_bounds(&self) -> Vec<(f64, f64)>;

    /// Suggested starting point.
    fn parameter_init(&self) -> Vec<f64>;

    /// Negative log-likelihood at `params`.
    fn nll(&self, params: &[f64]) -> Result<f64>;

    /// Gradient of [`nll`](LogDensityModel::nll) with respect to `params`.
    fn grad_nll(&self, params: &[f64]) -> Result<Vec<f64>>;
}

/// Models that have a designated parameter of interest.
pub trait PoiModel {
    /// Index of the POI in the parameter vector, if any.
    fn poi_index(&self) -> Option<usize>;
}
