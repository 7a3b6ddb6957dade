//! # contur-likelihood
//!
//! The Contur full likelihood (arXiv:2102.04377, eq. 7):
//!
//! ```text
//! L(μ, θ) = Π_i Poiss(n_i | μ s_i + b_i + Σ_{j∈s,b,d} θ^(j)_i σ^(j)_i) · Π_j Gauss(θ^(j) | 0, 1)
//! ```
//!
//! One Poisson term per bin, with three nuisance parameters per bin (signal,
//! background and data uncertainty), each a number of standard deviations of
//! its source. The parameter vector is `[μ, θ^(s)_0.., θ^(b)_0.., θ^(d)_0..]`
//! (length `3N + 1`).
//!
//! The model exposes:
//! - [`ConturLikelihood::get_objective_function`]: `-log L` with exact gradient
//! - [`ConturLikelihood::get_logpdf_func`]: `log L`
//! - [`ConturLikelihood::get_sampler`]: Poisson toys plus auxiliary draws
//! - [`ConturLikelihood::expected_data`]: Asimov counts plus auxiliary means
//! - [`ConturLikelihood::constraints`]: non-negative background inequality
//!
//! Every evaluator is a pure function of its arguments; the model is
//! `Send + Sync` and can be shared across threads freely.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod constraint;
pub mod constraint_model;
pub mod covariance;
pub mod input;
pub mod main_model;
pub mod metadata;
pub mod model;
pub mod objective;
pub mod response;
pub mod sampler;

pub use constraint::InequalityConstraint;
pub use constraint_model::ConstraintModel;
pub use covariance::CovarianceMatrix;
pub use input::ModelInput;
pub use main_model::MainModel;
pub use metadata::{BackendMetadata, METADATA};
pub use model::{ConturLikelihood, DEFAULT_POI_UPPER_BOUND};
pub use objective::{LogPdf, Objective, ObjectiveValue};
pub use sampler::Sampler;

pub use contur_core::{Error, Expectation, ModelConfig, Result};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::ConturLikelihood;

    pub(crate) fn identity(n: usize) -> Vec<Vec<f64>> {
        (0..n).map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect()).collect()
    }

    pub(crate) fn diag(d: &[f64]) -> Vec<Vec<f64>> {
        let n = d.len();
        (0..n).map(|i| (0..n).map(|j| if i == j { d[i] } else { 0.0 }).collect()).collect()
    }

    /// Two bins: s = [5, 10], b = [20, 30], n = [25, 40], unit variances.
    pub(crate) fn two_bin_model() -> ConturLikelihood {
        ConturLikelihood::new(
            vec![5.0, 10.0],
            vec![20.0, 30.0],
            vec![25.0, 40.0],
            identity(2),
            identity(2),
            identity(2),
        )
        .unwrap()
    }

    /// Three bins with distinct variances per source.
    pub(crate) fn three_bin_model() -> ConturLikelihood {
        ConturLikelihood::new(
            vec![2.0, 6.0, 1.5],
            vec![40.0, 25.0, 12.0],
            vec![44.0, 29.0, 11.0],
            diag(&[0.25, 1.0, 0.04]),
            diag(&[9.0, 4.0, 1.0]),
            diag(&[44.0, 29.0, 11.0]),
        )
        .unwrap()
    }
}
