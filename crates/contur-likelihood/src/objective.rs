//! Log-likelihood and objective builders.
//!
//! Both are thin borrows over the two sub-models and a selected dataset; the
//! objective is literally the negated log-likelihood, and its gradient comes
//! from forward-mode AD of that same expression.

use crate::constraint_model::ConstraintModel;
use crate::main_model::MainModel;
use contur_ad::forward;
use contur_ad::scalar::Scalar;
use contur_core::{Error, Expectation, Result};
use serde::Serialize;

/// Pick the baseline dataset for `expected`.
///
/// `APriori` substitutes the background-only yields for the observation;
/// `Observed` and `APosteriori` use the stored observation. An explicit `data`
/// always wins.
pub fn select_dataset<'a>(
    expected: Expectation,
    observed: &'a [f64],
    background: &'a [f64],
    data: Option<&'a [f64]>,
) -> &'a [f64] {
    match data {
        Some(d) => d,
        None if expected.uses_background_as_data() => background,
        None => observed,
    }
}

/// `pars ↦ log L(pars) = MainModel.log_prob + ConstraintModel.log_prob`.
#[derive(Debug, Clone, Copy)]
pub struct LogPdf<'a> {
    main: MainModel<'a>,
    constraint: ConstraintModel,
    data: &'a [f64],
}

impl<'a> LogPdf<'a> {
    /// `data` may carry trailing auxiliary entries; only the first `nbins`
    /// values are used.
    pub fn new(main: MainModel<'a>, constraint: ConstraintModel, data: &'a [f64]) -> Result<Self> {
        let nbins = main.nbins();
        if data.len() < nbins {
            return Err(Error::InvalidInput(format!(
                "Dataset too short: expected at least {} values, got {}",
                nbins,
                data.len()
            )));
        }
        Ok(Self { main, constraint, data: &data[..nbins] })
    }

    /// Main-bin dataset this function is conditioned on.
    pub fn data(&self) -> &[f64] {
        self.data
    }

    /// Log-likelihood for any [`Scalar`].
    pub fn log_prob<T: Scalar>(&self, pars: &[T]) -> Result<T> {
        Ok(self.main.log_prob(pars, self.data)? + self.constraint.log_prob(pars)?)
    }

    /// Log-likelihood at `pars`.
    pub fn eval(&self, pars: &[f64]) -> Result<f64> {
        self.log_prob(pars)
    }
}

/// Objective output: value, and gradient when requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectiveValue {
    /// `-log L`.
    pub value: f64,
    /// `∇(-log L)`, present when the objective was built with `do_grad`.
    pub gradient: Option<Vec<f64>>,
}

/// `pars ↦ -log L(pars)`, optionally with its gradient.
#[derive(Debug, Clone, Copy)]
pub struct Objective<'a> {
    logpdf: LogPdf<'a>,
    do_grad: bool,
}

impl<'a> Objective<'a> {
    /// Negate `logpdf`.
    pub fn new(logpdf: LogPdf<'a>, do_grad: bool) -> Self {
        Self { logpdf, do_grad }
    }

    /// Whether [`eval`](Objective::eval) returns a gradient.
    pub fn do_grad(&self) -> bool {
        self.do_grad
    }

    /// Underlying log-likelihood.
    pub fn logpdf(&self) -> &LogPdf<'a> {
        &self.logpdf
    }

    fn negative_loglikelihood<T: Scalar>(&self, pars: &[T]) -> Result<T> {
        Ok(-self.logpdf.log_prob(pars)?)
    }

    /// Objective value only.
    pub fn value(&self, pars: &[f64]) -> Result<f64> {
        self.negative_loglikelihood(pars)
    }

    /// Objective value and exact gradient.
    pub fn value_and_grad(&self, pars: &[f64]) -> Result<(f64, Vec<f64>)> {
        forward::value_and_gradient(pars, |p| self.negative_loglikelihood(p))
    }

    /// Value, plus gradient if this objective was built with `do_grad`.
    pub fn eval(&self, pars: &[f64]) -> Result<ObjectiveValue> {
        if self.do_grad {
            let (value, gradient) = self.value_and_grad(pars)?;
            Ok(ObjectiveValue { value, gradient: Some(gradient) })
        } else {
            Ok(ObjectiveValue { value: self.value(pars)?, gradient: None })
        }
    }
}
