//! Sampling from the joint model at a fixed parameter point.
//!
//! Each row is one pseudo-experiment: `N` Poisson counts drawn around
//! `lam(pars)`, optionally followed by `3N` standard-normal auxiliary draws.

use crate::model::ConturLikelihood;
use contur_core::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Sampler bound to a model and a parameter vector.
#[derive(Debug, Clone)]
pub struct Sampler<'a> {
    model: &'a ConturLikelihood,
    pars: Vec<f64>,
}

impl<'a> Sampler<'a> {
    pub(crate) fn new(model: &'a ConturLikelihood, pars: &[f64]) -> Result<Self> {
        model.validate_params_len(pars.len())?;
        Ok(Self { model, pars: pars.to_vec() })
    }

    /// Parameter point the sampler draws at.
    pub fn pars(&self) -> &[f64] {
        &self.pars
    }

    /// Width of one sampled row.
    pub fn row_len(&self, include_auxiliary: bool) -> usize {
        let nbins = self.model.nbins();
        if include_auxiliary { nbins + self.model.constraint_model().dim() } else { nbins }
    }

    /// Draw `sample_size` rows using the caller's RNG.
    ///
    /// Main rows are drawn first, then auxiliary rows, and each auxiliary row is
    /// appended to the main row with the same index.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        sample_size: usize,
        include_auxiliary: bool,
        rng: &mut R,
    ) -> Result<Vec<Vec<f64>>> {
        let mut rows = self.model.main_model().sample(&self.pars, sample_size, rng)?;
        if include_auxiliary {
            let aux = self.model.constraint_model().sample(&self.pars[1..], sample_size, rng)?;
            for (row, extra) in rows.iter_mut().zip(aux) {
                row.extend(extra);
            }
        }
        Ok(rows)
    }

    /// Draw `sample_size` rows from a `StdRng` seeded with `seed`.
    pub fn sample_seeded(
        &self,
        sample_size: usize,
        include_auxiliary: bool,
        seed: u64,
    ) -> Result<Vec<Vec<f64>>> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.sample(sample_size, include_auxiliary, &mut rng)
    }

    /// Draw rows in parallel. Row `i` uses its own `StdRng` seeded with
    /// `seed + i`, so the output does not depend on the thread count.
    pub fn sample_parallel(
        &self,
        sample_size: usize,
        include_auxiliary: bool,
        seed: u64,
    ) -> Result<Vec<Vec<f64>>> {
        log::debug!("sampling {} rows in parallel (seed={})", sample_size, seed);
        (0..sample_size)
            .into_par_iter()
            .map(|i| {
                let mut rows = self.sample_seeded(1, include_auxiliary, seed.wrapping_add(i as u64))?;
                Ok(rows.pop().unwrap_or_default())
            })
            .collect()
    }
}
