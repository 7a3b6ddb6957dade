//! Constraint model: independent `N(0, 1)` priors on the nuisance slice
//! `pars[1..]`.

use contur_ad::scalar::Scalar;
use contur_core::{Error, Result};
use contur_prob::normal;
use rand::Rng;

/// Standard-normal priors over `dim` nuisance parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintModel {
    dim: usize,
}

impl ConstraintModel {
    /// Priors for `dim` nuisance parameters.
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    /// Number of constrained parameters.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// `Σ_j log N(pars[1 + j] | 0, 1)`. The POI at `pars[0]` is skipped.
    pub fn log_prob<T: Scalar>(&self, pars: &[T]) -> Result<T> {
        if pars.len() != self.dim + 1 {
            return Err(Error::InvalidInput(format!(
                "Parameter length mismatch: expected {}, got {}",
                self.dim + 1,
                pars.len()
            )));
        }
        Ok(pars[1..].iter().map(|&theta| normal::standard_logpdf(theta)).sum())
    }

    /// `n` rows of `dim` standard-normal auxiliary draws.
    ///
    /// The priors are centred at zero, so `nuisance_pars` only fixes the
    /// expected row width.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        nuisance_pars: &[f64],
        n: usize,
        rng: &mut R,
    ) -> Result<Vec<Vec<f64>>> {
        if nuisance_pars.len() != self.dim {
            return Err(Error::InvalidInput(format!(
                "Nuisance length mismatch: expected {}, got {}",
                self.dim,
                nuisance_pars.len()
            )));
        }
        let mut rows = Vec::with_capacity(n);
        for _ in 0..n {
            rows.push(normal::sample_standard(self.dim, rng));
        }
        Ok(rows)
    }

    /// Prior means: all zeros.
    pub fn expected_data(&self) -> Vec<f64> {
        vec![0.0; self.dim]
    }
}
