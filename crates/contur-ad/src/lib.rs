//! # contur-ad
//!
//! Automatic differentiation (AD) primitives for the Contur likelihood.
//!
//! Provides:
//! - **Forward-mode AD** via [`dual::Dual`] numbers
//! - [`Scalar`](scalar::Scalar) trait for writing likelihood code once and
//!   evaluating it with either `f64` or `Dual`
//! - [`forward`] drivers that turn a generic function into an exact gradient
//!   or Jacobian

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dual;
pub mod forward;
pub mod scalar;
