//! Main model: independent Poisson counts per bin with mean `lam(pars)`.

use crate::response::MeanResponse;
use contur_ad::scalar::Scalar;
use contur_core::{Error, Result};
use contur_prob::poisson;
use rand::Rng;

/// Poisson likelihood over the observed bins.
#[derive(Debug, Clone, Copy)]
pub struct MainModel<'a> {
    response: &'a MeanResponse,
}

impl<'a> MainModel<'a> {
    /// Wrap a mean response.
    pub fn new(response: &'a MeanResponse) -> Self {
        Self { response }
    }

    /// Number of bins.
    pub fn nbins(&self) -> usize {
        self.response.nbins()
    }

    /// `Σ_i log Poiss(observations_i | lam_i(pars))`.
    pub fn log_prob<T: Scalar>(&self, pars: &[T], observations: &[f64]) -> Result<T> {
        if observations.len() != self.nbins() {
            return Err(Error::InvalidInput(format!(
                "Observation length mismatch: expected {}, got {}",
                self.nbins(),
                observations.len()
            )));
        }
        let lam = self.response.lam(pars)?;
        let mut total = T::from_f64(0.0);
        for (&k, &l) in observations.iter().zip(lam.iter()) {
            total = total + poisson::logpmf_generic(k, l)?;
        }
        Ok(total)
    }

    /// `n` independent rows of Poisson counts with mean `lam(pars)`.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        pars: &[f64],
        n: usize,
        rng: &mut R,
    ) -> Result<Vec<Vec<f64>>> {
        let lam = self.response.lam(pars)?;
        let mut rows = Vec::with_capacity(n);
        for _ in 0..n {
            let mut row = Vec::with_capacity(lam.len());
            for &l in &lam {
                row.push(poisson::sample(l, rng)?);
            }
            rows.push(row);
        }
        Ok(rows)
    }

    /// The Poisson means themselves (Asimov counts).
    pub fn expected_data(&self, pars: &[f64]) -> Result<Vec<f64>> {
        self.response.lam(pars)
    }
}
