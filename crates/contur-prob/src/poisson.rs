//! Poisson distribution utilities.
//!
//! Counts are taken as `f64` and the log-PMF uses the continuous extension
//! `k·ln(λ) - λ - lnΓ(k+1)`, so non-integer Asimov/expected data is accepted.

use contur_ad::scalar::Scalar;
use contur_core::{Error, Result};
use rand::Rng;
use rand_distr::{Distribution, Poisson};
use statrs::function::gamma::ln_gamma;

fn validate_count(k: f64) -> Result<()> {
    if !k.is_finite() || k < 0.0 {
        return Err(Error::InvalidInput(format!("Poisson count must be finite and >= 0, got {}", k)));
    }
    Ok(())
}

fn validate_rate(lambda: f64) -> Result<()> {
    if !lambda.is_finite() || lambda < 0.0 {
        return Err(Error::Computation(format!(
            "Poisson mean must be finite and >= 0, got {}",
            lambda
        )));
    }
    Ok(())
}

/// Log-PMF of `Poisson(k | lambda)`, generic over [`Scalar`] in `lambda`.
///
/// For `k = 0` the result is `-lambda` for every `lambda >= 0`, so the
/// derivative stays `-1` at `lambda = 0`. For `k > 0` and `lambda = 0` it is
/// `-inf`. Negative or non-finite means are an error.
pub fn logpmf_generic<T: Scalar>(k: f64, lambda: T) -> Result<T> {
    validate_count(k)?;
    validate_rate(lambda.value())?;

    if k == 0.0 {
        return Ok(-lambda);
    }
    if lambda.value() == 0.0 {
        return Ok(T::from_f64(f64::NEG_INFINITY));
    }
    Ok(T::from_f64(k) * lambda.ln() - lambda - T::from_f64(ln_gamma(k + 1.0)))
}

/// Log-PMF of `Poisson(k | lambda)`.
pub fn logpmf(k: f64, lambda: f64) -> Result<f64> {
    logpmf_generic(k, lambda)
}

/// Draw one Poisson count with mean `lambda`.
///
/// `lambda = 0` deterministically yields `0`.
pub fn sample<R: Rng + ?Sized>(lambda: f64, rng: &mut R) -> Result<f64> {
    validate_rate(lambda)?;
    if lambda == 0.0 {
        return Ok(0.0);
    }
    let dist = Poisson::new(lambda)
        .map_err(|e| Error::Computation(format!("Poisson(lambda={lambda}): {e}")))?;
    let k: f64 = dist.sample(rng);
    Ok(k)
}
