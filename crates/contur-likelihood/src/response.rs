//! Mean response and background constraint as immutable value objects.
//!
//! Both hold the nominal yields and precomputed per-bin standard deviations
//! and evaluate generically over [`Scalar`], so the same code produces values
//! and exact derivatives.

use contur_ad::scalar::Scalar;
use contur_core::{Error, Result};

/// Parameter-vector view: `μ` followed by the signal, background and data
/// nuisance blocks, each `nbins` long.
#[derive(Debug, Clone, Copy)]
pub struct ParameterBlocks<'a, T> {
    /// Parameter of interest.
    pub poi: T,
    /// `θ^(s)`.
    pub signal: &'a [T],
    /// `θ^(b)`.
    pub background: &'a [T],
    /// `θ^(d)`.
    pub data: &'a [T],
}

/// Number of fit parameters for `nbins` bins.
#[inline]
pub fn n_parameters(nbins: usize) -> usize {
    3 * nbins + 1
}

/// Check the parameter-vector length.
pub fn validate_params_len(nbins: usize, got: usize) -> Result<()> {
    let expected = n_parameters(nbins);
    if got != expected {
        return Err(Error::InvalidInput(format!(
            "Parameter length mismatch: expected {}, got {}",
            expected, got
        )));
    }
    Ok(())
}

/// Split `pars` into its POI and three nuisance blocks.
pub fn split_parameters<T: Copy>(pars: &[T], nbins: usize) -> Result<ParameterBlocks<'_, T>> {
    validate_params_len(nbins, pars.len())?;
    let (signal, rest) = pars[1..].split_at(nbins);
    let (background, data) = rest.split_at(nbins);
    Ok(ParameterBlocks { poi: pars[0], signal, background, data })
}

/// First-order expansion of the per-bin Poisson mean around the nominal yields.
#[derive(Debug, Clone, PartialEq)]
pub struct MeanResponse {
    signal: Vec<f64>,
    background: Vec<f64>,
    signal_sigma: Vec<f64>,
    background_sigma: Vec<f64>,
    data_sigma: Vec<f64>,
}

impl MeanResponse {
    /// All slices must have the same length.
    pub fn new(
        signal: Vec<f64>,
        background: Vec<f64>,
        signal_sigma: Vec<f64>,
        background_sigma: Vec<f64>,
        data_sigma: Vec<f64>,
    ) -> Result<Self> {
        let n = signal.len();
        if [background.len(), signal_sigma.len(), background_sigma.len(), data_sigma.len()]
            .iter()
            .any(|&l| l != n)
        {
            return Err(Error::InvalidInput(
                "mean response: yields and uncertainties must have the same length".to_string(),
            ));
        }
        Ok(Self { signal, background, signal_sigma, background_sigma, data_sigma })
    }

    /// Number of bins.
    pub fn nbins(&self) -> usize {
        self.signal.len()
    }

    /// Nominal signal yields.
    pub fn signal(&self) -> &[f64] {
        &self.signal
    }

    /// Nominal background yields.
    pub fn background(&self) -> &[f64] {
        &self.background
    }

    /// `lam_i = μ s_i + b_i + θs_i σs_i + θb_i σb_i + θd_i σd_i`
    pub fn lam<T: Scalar>(&self, pars: &[T]) -> Result<Vec<T>> {
        let p = split_parameters(pars, self.nbins())?;
        Ok((0..self.nbins())
            .map(|i| {
                p.poi * T::from_f64(self.signal[i])
                    + T::from_f64(self.background[i])
                    + p.signal[i] * T::from_f64(self.signal_sigma[i])
                    + p.background[i] * T::from_f64(self.background_sigma[i])
                    + p.data[i] * T::from_f64(self.data_sigma[i])
            })
            .collect())
    }
}

/// Background contribution under its own nuisance shift,
/// `b · (1 + θ^(b) · σb / b)`, which must stay non-negative.
///
/// Evaluated as `b + θ^(b) · σb` so bins with zero nominal background stay
/// well defined.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundConstraint {
    background: Vec<f64>,
    background_sigma: Vec<f64>,
}

impl BackgroundConstraint {
    /// `background` and `background_sigma` must have the same length.
    pub fn new(background: Vec<f64>, background_sigma: Vec<f64>) -> Result<Self> {
        if background.len() != background_sigma.len() {
            return Err(Error::InvalidInput(
                "background constraint: yields and uncertainties must have the same length"
                    .to_string(),
            ));
        }
        Ok(Self { background, background_sigma })
    }

    /// Number of bins (= number of constraint components).
    pub fn nbins(&self) -> usize {
        self.background.len()
    }

    /// Constraint values, one per bin.
    pub fn eval<T: Scalar>(&self, pars: &[T]) -> Result<Vec<T>> {
        let p = split_parameters(pars, self.nbins())?;
        Ok(self
            .background
            .iter()
            .zip(&self.background_sigma)
            .zip(p.background)
            .map(|((&b, &s), &theta)| T::from_f64(b) + theta * T::from_f64(s))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn response() -> MeanResponse {
        MeanResponse::new(
            vec![5.0, 10.0],
            vec![20.0, 30.0],
            vec![1.0, 2.0],
            vec![3.0, 4.0],
            vec![5.0, 6.0],
        )
        .unwrap()
    }

    #[test]
    fn test_split_parameters() {
        let pars = [9.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let p = split_parameters(&pars, 2).unwrap();
        assert_eq!(p.poi, 9.0);
        assert_eq!(p.signal, &[1.0, 2.0]);
        assert_eq!(p.background, &[3.0, 4.0]);
        assert_eq!(p.data, &[5.0, 6.0]);

        assert!(matches!(split_parameters(&pars[..6], 2), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_lam_nominal_is_exact() {
        let r = response();
        let lam = r.lam(&[2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(lam, vec![30.0, 50.0]);
    }

    #[test]
    fn test_lam_each_source_shifts_by_its_sigma() {
        let r = response();
        // one sigma up in every source of bin 1 only
        let lam = r.lam(&[1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0]).unwrap();
        assert_relative_eq!(lam[0], 25.0, epsilon = 1e-12);
        assert_relative_eq!(lam[1], 40.0 + 2.0 + 4.0 + 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_constraint_values() {
        let c = BackgroundConstraint::new(vec![20.0, 0.0], vec![2.0, 1.0]).unwrap();
        let v = c.eval(&[1.0, 0.0, 0.0, -1.5, 2.0, 0.0, 0.0]).unwrap();
        assert_eq!(v, vec![17.0, 2.0]);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        assert!(MeanResponse::new(vec![1.0], vec![1.0, 2.0], vec![1.0], vec![1.0], vec![1.0]).is_err());
        assert!(BackgroundConstraint::new(vec![1.0], vec![]).is_err());
    }
}
