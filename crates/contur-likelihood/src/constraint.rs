//! Nonlinear inequality constraint handed to a constrained minimizer.

use crate::response::BackgroundConstraint;
use contur_ad::forward;
use contur_core::Result;

/// `lower ≤ fun(pars) ≤ upper` elementwise, with an exact Jacobian.
///
/// Borrowed from the model; evaluation is pure and may run concurrently.
#[derive(Debug, Clone, Copy)]
pub struct InequalityConstraint<'a> {
    function: &'a BackgroundConstraint,
    /// Lower bound applied to every component.
    pub lower_bound: f64,
    /// Upper bound applied to every component.
    pub upper_bound: f64,
}

impl<'a> InequalityConstraint<'a> {
    /// Constraint `function ∈ [0, +∞)`.
    pub fn non_negative(function: &'a BackgroundConstraint) -> Self {
        Self { function, lower_bound: 0.0, upper_bound: f64::INFINITY }
    }

    /// Number of constraint components.
    pub fn len(&self) -> usize {
        self.function.nbins()
    }

    /// Whether the constraint has no components.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Constraint values at `pars`.
    pub fn fun(&self, pars: &[f64]) -> Result<Vec<f64>> {
        self.function.eval(pars)
    }

    /// Jacobian (`nbins` rows × `3N+1` columns) by forward-mode AD.
    pub fn jac(&self, pars: &[f64]) -> Result<Vec<Vec<f64>>> {
        forward::jacobian(pars, |p| self.function.eval(p))
    }

    /// Whether every component lies within the bounds at `pars`.
    pub fn is_satisfied(&self, pars: &[f64]) -> Result<bool> {
        Ok(self.fun(pars)?.iter().all(|&v| v >= self.lower_bound && v <= self.upper_bound))
    }
}
