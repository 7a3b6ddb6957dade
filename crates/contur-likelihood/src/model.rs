//! Model construction, validation and the public evaluator factories.

use crate::constraint::InequalityConstraint;
use crate::constraint_model::ConstraintModel;
use crate::covariance::CovarianceMatrix;
use crate::main_model::MainModel;
use crate::objective::{LogPdf, Objective, select_dataset};
use crate::response::{BackgroundConstraint, MeanResponse, n_parameters, validate_params_len};
use crate::sampler::Sampler;
use contur_core::traits::{LogDensityModel, PoiModel};
use contur_core::{Error, Expectation, ModelConfig, Result};

/// Default upper bound of the parameter of interest.
pub const DEFAULT_POI_UPPER_BOUND: f64 = 10.0;

const POI_INDEX: usize = 0;

/// The Contur full likelihood.
///
/// Immutable after construction. The yields live in the [`MeanResponse`] and
/// [`BackgroundConstraint`] value objects; evaluators borrow them.
#[derive(Debug, Clone)]
pub struct ConturLikelihood {
    data: Vec<f64>,
    signal_covariance: CovarianceMatrix,
    background_covariance: CovarianceMatrix,
    data_covariance: CovarianceMatrix,
    response: MeanResponse,
    background_constraint: BackgroundConstraint,
    constraint_model: ConstraintModel,
}

impl ConturLikelihood {
    /// Build from yields, observations and row-major covariance matrices.
    ///
    /// # Errors
    /// - [`Error::InvalidInput`] if the yield/data vectors differ in length,
    ///   if a covariance is ragged or not square, or if a covariance dimension
    ///   differs from the number of bins.
    /// - [`Error::Computation`] if a covariance diagonal entry is negative.
    pub fn new(
        signal_yields: Vec<f64>,
        background_yields: Vec<f64>,
        data: Vec<f64>,
        signal_covariance: Vec<Vec<f64>>,
        background_covariance: Vec<Vec<f64>>,
        data_covariance: Vec<Vec<f64>>,
    ) -> Result<Self> {
        check_yield_lengths(&signal_yields, &background_yields, &data)?;
        let data_covariance = CovarianceMatrix::from_rows(data_covariance)?;
        let signal_covariance = CovarianceMatrix::from_rows(signal_covariance)?;
        let background_covariance = CovarianceMatrix::from_rows(background_covariance)?;
        Self::from_matrices(
            signal_yields,
            background_yields,
            data,
            signal_covariance,
            background_covariance,
            data_covariance,
        )
    }

    /// Build from already validated covariance matrices.
    pub fn from_matrices(
        signal_yields: Vec<f64>,
        background_yields: Vec<f64>,
        data: Vec<f64>,
        signal_covariance: CovarianceMatrix,
        background_covariance: CovarianceMatrix,
        data_covariance: CovarianceMatrix,
    ) -> Result<Self> {
        check_yield_lengths(&signal_yields, &background_yields, &data)?;
        let nbins = data.len();
        if nbins == 0 {
            return Err(Error::InvalidInput("at least one bin is required".to_string()));
        }
        for (label, cov) in [
            ("data", &data_covariance),
            ("signal", &signal_covariance),
            ("background", &background_covariance),
        ] {
            if cov.dim() != nbins {
                return Err(Error::InvalidInput(format!(
                    "Covariance matrices size should match the number of yields: {} covariance is {}x{}, expected {}x{}",
                    label,
                    cov.dim(),
                    cov.dim(),
                    nbins,
                    nbins
                )));
            }
            if cov.has_correlations() {
                log::warn!(
                    "{} covariance has off-diagonal terms; only per-bin variances are used",
                    label
                );
            }
        }

        let signal_sigma = signal_covariance.standard_deviations()?;
        let background_sigma = background_covariance.standard_deviations()?;
        let data_sigma = data_covariance.standard_deviations()?;

        let response = MeanResponse::new(
            signal_yields,
            background_yields.clone(),
            signal_sigma,
            background_sigma.clone(),
            data_sigma,
        )?;
        let background_constraint = BackgroundConstraint::new(background_yields, background_sigma)?;
        let constraint_model = ConstraintModel::new(3 * nbins);

        let model = Self {
            data,
            signal_covariance,
            background_covariance,
            data_covariance,
            response,
            background_constraint,
            constraint_model,
        };
        log::debug!(
            "contur likelihood: {} bins, {} parameters, alive={}",
            nbins,
            model.n_params(),
            model.is_alive()
        );
        Ok(model)
    }

    /// Number of bins.
    pub fn nbins(&self) -> usize {
        self.data.len()
    }

    /// Number of fit parameters, `3N + 1`.
    pub fn n_params(&self) -> usize {
        n_parameters(self.nbins())
    }

    /// Signal yields.
    pub fn signal_yields(&self) -> &[f64] {
        self.response.signal()
    }

    /// Background yields.
    pub fn background_yields(&self) -> &[f64] {
        self.response.background()
    }

    /// Observed counts.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Signal covariance.
    pub fn signal_covariance(&self) -> &CovarianceMatrix {
        &self.signal_covariance
    }

    /// Background covariance.
    pub fn background_covariance(&self) -> &CovarianceMatrix {
        &self.background_covariance
    }

    /// Data covariance.
    pub fn data_covariance(&self) -> &CovarianceMatrix {
        &self.data_covariance
    }

    /// True if at least one bin has strictly positive signal.
    pub fn is_alive(&self) -> bool {
        self.signal_yields().iter().any(|&s| s > 0.0)
    }

    /// `-min(b_i / s_i)` over bins with `s_i > 0`.
    ///
    /// The most negative `μ` keeping every signal-bearing bin non-negative at
    /// zero nuisance shift. Fails with [`Error::Computation`] when no bin has
    /// positive signal.
    pub fn minimum_poi(&self) -> Result<f64> {
        self.signal_yields()
            .iter()
            .zip(self.background_yields())
            .filter(|&(&s, _)| s > 0.0)
            .map(|(&s, &b)| b / s)
            .min_by(|a, b| a.total_cmp(b))
            .map(|m| -m)
            .ok_or_else(|| {
                Error::Computation(
                    "POI lower bound is undefined: no bin has positive signal yield".to_string(),
                )
            })
    }

    /// Minimizer configuration.
    ///
    /// The POI is bounded by `[minimum_poi, poi_upper_bound]`, or
    /// `[0, poi_upper_bound]` when negative signal is not allowed; every
    /// nuisance parameter is unbounded. All parameters start at `1.0`.
    pub fn config(&self, allow_negative_signal: bool, poi_upper_bound: f64) -> Result<ModelConfig> {
        let min_poi = self.minimum_poi()?;
        let npar = self.n_params();
        let lower = if allow_negative_signal { min_poi } else { 0.0 };

        let mut bounds = Vec::with_capacity(npar);
        bounds.push((lower, poi_upper_bound));
        bounds.extend(std::iter::repeat_n((f64::NEG_INFINITY, f64::INFINITY), npar - 1));

        Ok(ModelConfig {
            poi_index: POI_INDEX,
            minimum_poi: min_poi,
            suggested_init: vec![1.0; npar],
            suggested_bounds: bounds,
        })
    }

    /// Parameter names: `mu`, then `theta_signal_i`, `theta_background_i`,
    /// `theta_data_i`.
    pub fn parameter_names(&self) -> Vec<String> {
        let n = self.nbins();
        let mut names = Vec::with_capacity(self.n_params());
        names.push("mu".to_string());
        for block in ["signal", "background", "data"] {
            names.extend((0..n).map(|i| format!("theta_{block}_{i}")));
        }
        names
    }

    /// Poisson main model.
    pub fn main_model(&self) -> MainModel<'_> {
        MainModel::new(&self.response)
    }

    /// Standard-normal nuisance priors.
    pub fn constraint_model(&self) -> ConstraintModel {
        self.constraint_model
    }

    /// Inequality constraints for a constrained minimizer: the background
    /// contribution of each bin stays in `[0, +∞)`.
    pub fn constraints(&self) -> Vec<InequalityConstraint<'_>> {
        vec![InequalityConstraint::non_negative(&self.background_constraint)]
    }

    /// `pars ↦ log L(pars)` conditioned on the dataset selected by `expected`.
    ///
    /// `data`, when given, overrides the stored observation; only its first
    /// `nbins` entries are used.
    pub fn get_logpdf_func<'a>(
        &'a self,
        expected: Expectation,
        data: Option<&'a [f64]>,
    ) -> Result<LogPdf<'a>> {
        let dataset = select_dataset(expected, &self.data, self.background_yields(), data);
        LogPdf::new(self.main_model(), self.constraint_model, dataset)
    }

    /// `pars ↦ -log L(pars)`, plus its gradient when `do_grad` is set.
    pub fn get_objective_function<'a>(
        &'a self,
        expected: Expectation,
        data: Option<&'a [f64]>,
        do_grad: bool,
    ) -> Result<Objective<'a>> {
        log::debug!("objective requested: expectation={:?}, do_grad={}", expected, do_grad);
        Ok(Objective::new(self.get_logpdf_func(expected, data)?, do_grad))
    }

    /// Sampler at fixed parameters.
    pub fn get_sampler(&self, pars: &[f64]) -> Result<Sampler<'_>> {
        Sampler::new(self, pars)
    }

    /// Main-model means, followed by the auxiliary prior means (zeros) when
    /// `include_auxiliary` is set.
    pub fn expected_data(&self, pars: &[f64], include_auxiliary: bool) -> Result<Vec<f64>> {
        let mut out = self.main_model().expected_data(pars)?;
        if include_auxiliary {
            out.extend(self.constraint_model.expected_data());
        }
        Ok(out)
    }

    /// Asimov main-bin counts at `pars`.
    pub fn asimov_data(&self, pars: &[f64]) -> Result<Vec<f64>> {
        self.expected_data(pars, false)
    }

    pub(crate) fn validate_params_len(&self, got: usize) -> Result<()> {
        validate_params_len(self.nbins(), got)
    }
}

fn check_yield_lengths(signal: &[f64], background: &[f64], data: &[f64]) -> Result<()> {
    if signal.len() != background.len() || signal.len() != data.len() {
        return Err(Error::InvalidInput(format!(
            "Arrays of yields must be the same length (signal={}, background={}, data={})",
            signal.len(),
            background.len(),
            data.len()
        )));
    }
    Ok(())
}

impl LogDensityModel for ConturLikelihood {
    fn dim(&self) -> usize {
        self.n_params()
    }

    fn parameter_names(&self) -> Vec<String> {
        ConturLikelihood::parameter_names(self)
    }

    fn parameter_bounds(&self) -> Vec<(f64, f64)> {
        match self.config(true, DEFAULT_POI_UPPER_BOUND) {
            Ok(cfg) => cfg.suggested_bounds,
            Err(e) => {
                log::warn!("{e}; restricting the POI to non-negative values");
                let mut bounds = vec![(f64::NEG_INFINITY, f64::INFINITY); self.n_params()];
                bounds[POI_INDEX] = (0.0, DEFAULT_POI_UPPER_BOUND);
                bounds
            }
        }
    }

    fn parameter_init(&self) -> Vec<f64> {
        vec![1.0; self.n_params()]
    }

    fn nll(&self, params: &[f64]) -> Result<f64> {
        self.get_objective_function(Expectation::Observed, None, false)?.value(params)
    }

    fn grad_nll(&self, params: &[f64]) -> Result<Vec<f64>> {
        let (_, grad) =
            self.get_objective_function(Expectation::Observed, None, true)?.value_and_grad(params)?;
        Ok(grad)
    }
}

impl PoiModel for ConturLikelihood {
    fn poi_index(&self) -> Option<usize> {
        Some(POI_INDEX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{diag, identity, three_bin_model, two_bin_model};
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_mismatched_yield_lengths() {
        let r = ConturLikelihood::new(
            vec![1.0, 2.0],
            vec![1.0],
            vec![1.0, 2.0],
            identity(2),
            identity(2),
            identity(2),
        );
        assert!(matches!(r, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_non_square_covariance() {
        let r = ConturLikelihood::new(
            vec![1.0, 2.0],
            vec![1.0, 2.0],
            vec![1.0, 2.0],
            vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]],
            identity(2),
            identity(2),
        );
        assert!(matches!(r, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_ragged_covariance() {
        let r = ConturLikelihood::new(
            vec![1.0, 2.0],
            vec![1.0, 2.0],
            vec![1.0, 2.0],
            identity(2),
            vec![vec![1.0, 0.0], vec![1.0]],
            identity(2),
        );
        assert!(matches!(r, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_mis_sized_covariance() {
        let r = ConturLikelihood::new(
            vec![1.0, 2.0],
            vec![1.0, 2.0],
            vec![1.0, 2.0],
            identity(2),
            identity(2),
            identity(3),
        );
        assert!(matches!(r, Err(Error::InvalidInput(_))));

        let r = ConturLikelihood::new(
            vec![1.0, 2.0],
            vec![1.0, 2.0],
            vec![1.0, 2.0],
            identity(1),
            identity(2),
            identity(2),
        );
        assert!(matches!(r, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_empty_model() {
        let r = ConturLikelihood::new(vec![], vec![], vec![], vec![], vec![], vec![]);
        assert!(matches!(r, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_negative_variance_is_computation_error() {
        let r = ConturLikelihood::new(
            vec![1.0],
            vec![1.0],
            vec![1.0],
            diag(&[1.0]),
            diag(&[-1.0]),
            diag(&[1.0]),
        );
        assert!(matches!(r, Err(Error::Computation(_))));
    }

    #[test]
    fn test_off_diagonal_terms_accepted() {
        let cov = vec![vec![1.0, 0.5], vec![0.5, 4.0]];
        let m = ConturLikelihood::new(
            vec![1.0, 1.0],
            vec![3.0, 4.0],
            vec![4.0, 5.0],
            cov.clone(),
            cov.clone(),
            cov,
        )
        .unwrap();
        assert!(m.signal_covariance().has_correlations());
        // Only the diagonal enters lam: theta_s_1 = 1 shifts bin 1 by sqrt(4) = 2
        let lam = m.asimov_data(&[1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(lam, vec![4.0, 7.0]);
    }

    #[test]
    fn test_nbins_and_n_params() {
        let m = two_bin_model();
        assert_eq!(m.nbins(), 2);
        assert_eq!(m.n_params(), 7);
        assert_eq!(m.parameter_names().len(), 7);
        assert_eq!(m.parameter_names()[0], "mu");
        assert_eq!(m.parameter_names()[3], "theta_background_0");
    }

    #[test]
    fn test_minimum_poi_negative_for_positive_yields() {
        let m = two_bin_model();
        // min(20/5, 30/10) = 3
        assert_relative_eq!(m.minimum_poi().unwrap(), -3.0, epsilon = 1e-12);

        let m = three_bin_model();
        let mp = m.minimum_poi().unwrap();
        assert!(mp < 0.0);
        assert_relative_eq!(mp, -(25.0 / 6.0), epsilon = 1e-12);
    }

    #[test]
    fn test_minimum_poi_skips_signal_free_bins() {
        let m = ConturLikelihood::new(
            vec![0.0, 4.0],
            vec![1.0, 40.0],
            vec![1.0, 44.0],
            identity(2),
            identity(2),
            identity(2),
        )
        .unwrap();
        assert_relative_eq!(m.minimum_poi().unwrap(), -10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_is_alive() {
        assert!(two_bin_model().is_alive());

        let dead = ConturLikelihood::new(
            vec![0.0, 0.0],
            vec![20.0, 30.0],
            vec![25.0, 40.0],
            identity(2),
            identity(2),
            identity(2),
        )
        .unwrap();
        assert!(!dead.is_alive());
        assert!(matches!(dead.minimum_poi(), Err(Error::Computation(_))));
        assert!(dead.config(true, 10.0).is_err());
        assert!(dead.config(false, 10.0).is_err());
        // The optimizer seam still gets usable bounds
        assert_eq!(LogDensityModel::parameter_bounds(&dead)[0], (0.0, DEFAULT_POI_UPPER_BOUND));
    }

    #[test]
    fn test_config() {
        let m = two_bin_model();
        let cfg = m.config(true, DEFAULT_POI_UPPER_BOUND).unwrap();
        assert_eq!(cfg.poi_index, 0);
        assert_relative_eq!(cfg.minimum_poi, -3.0, epsilon = 1e-12);
        assert_eq!(cfg.suggested_init, vec![1.0; 7]);
        assert_eq!(cfg.suggested_bounds.len(), 7);
        assert_eq!(cfg.suggested_bounds[0], (-3.0, 10.0));
        for &(lo, hi) in &cfg.suggested_bounds[1..] {
            assert!(lo == f64::NEG_INFINITY && hi == f64::INFINITY);
        }

        let cfg = m.config(false, 5.0).unwrap();
        assert_eq!(cfg.suggested_bounds[0], (0.0, 5.0));
        assert_eq!(cfg.minimum_poi, -3.0);
    }

    #[test]
    fn test_expected_data_nominal_is_exact() {
        let m = three_bin_model();
        let mu = 1.7;
        let mut pars = vec![0.0; m.n_params()];
        pars[0] = mu;
        let exp = m.main_model().expected_data(&pars).unwrap();
        for i in 0..m.nbins() {
            assert_eq!(exp[i], mu * m.signal_yields()[i] + m.background_yields()[i]);
        }
    }

    #[test]
    fn test_expected_data_with_auxiliary() {
        let m = two_bin_model();
        let pars = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let full = m.expected_data(&pars, true).unwrap();
        assert_eq!(full, vec![25.0, 40.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(m.expected_data(&pars, false).unwrap(), vec![25.0, 40.0]);
        assert!(m.expected_data(&pars[..5], true).is_err());
    }

    #[test]
    fn test_constraints_exposed() {
        let m = three_bin_model();
        let cs = m.constraints();
        assert_eq!(cs.len(), 1);
        let c = cs[0];
        assert_eq!(c.len(), 3);
        let mut pars = vec![1.0; m.n_params()];
        pars[4] = -2.0; // theta_background_0, sigma = 3
        let v = c.fun(&pars).unwrap();
        assert_relative_eq!(v[0], 40.0 - 6.0, epsilon = 1e-12);
        assert_relative_eq!(v[1], 25.0 + 2.0, epsilon = 1e-12);
        let jac = c.jac(&pars).unwrap();
        assert_eq!(jac.len(), 3);
        assert_eq!(jac[2][6], 1.0);
    }

    #[test]
    fn test_log_density_model_seam() {
        let m = two_bin_model();
        assert_eq!(m.dim(), 7);
        assert_eq!(m.poi_index(), Some(0));
        assert_eq!(m.parameter_init(), vec![1.0; 7]);
        let pars = [1.2, 0.1, -0.3, 0.2, 0.4, -0.1, 0.05];
        let nll = LogDensityModel::nll(&m, &pars).unwrap();
        let logpdf = m.get_logpdf_func(Expectation::Observed, None).unwrap().eval(&pars).unwrap();
        assert_relative_eq!(nll, -logpdf, epsilon = 1e-12);
        assert_eq!(m.grad_nll(&pars).unwrap().len(), 7);
    }

    #[test]
    fn test_model_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConturLikelihood>();
    }
}
