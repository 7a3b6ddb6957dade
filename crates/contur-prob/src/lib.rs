//! Probability building blocks for the Contur likelihood.
//!
//! Only the two families the model is built from live here:
//! - [`poisson`]: main-bin counts
//! - [`normal`]: nuisance-parameter priors
//!
//! Log-densities are generic over [`contur_ad::scalar::Scalar`] so the same
//! code yields values and exact derivatives.

pub mod normal;
pub mod poisson;
