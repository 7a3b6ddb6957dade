//! Covariance matrices.
//!
//! Only the diagonal feeds the likelihood (as per-bin variances). The full
//! matrix is kept so callers can inspect what they supplied.

use contur_core::{Error, Result};

/// A validated square covariance matrix, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceMatrix {
    dim: usize,
    values: Vec<f64>,
}

impl CovarianceMatrix {
    /// Build from rows.
    ///
    /// Fails with [`Error::InvalidInput`] if the rows are ragged (not a 2D
    /// matrix) or the matrix is not square.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let dim = rows.len();
        let ncols = rows.first().map(|r| r.len()).unwrap_or(0);
        if rows.iter().any(|r| r.len() != ncols) {
            return Err(Error::InvalidInput("2D covariance matrix required".to_string()));
        }
        if ncols != dim {
            return Err(Error::InvalidInput(format!(
                "Covariance matrix must be square, got {}x{}",
                dim, ncols
            )));
        }
        Ok(Self { dim, values: rows.into_iter().flatten().collect() })
    }

    /// Number of rows (= columns).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Element `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.dim || j >= self.dim {
            return None;
        }
        Some(self.values[i * self.dim + j])
    }

    /// Per-bin variances.
    pub fn diagonal(&self) -> Vec<f64> {
        (0..self.dim).map(|i| self.values[i * self.dim + i]).collect()
    }

    /// Whether any off-diagonal element is non-zero.
    pub fn has_correlations(&self) -> bool {
        (0..self.dim).any(|i| (0..self.dim).any(|j| i != j && self.values[i * self.dim + j] != 0.0))
    }

    /// Per-bin standard deviations, `sqrt(diag)`.
    ///
    /// A negative or non-finite variance is a [`Error::Computation`]; nothing
    /// is clamped.
    pub fn standard_deviations(&self) -> Result<Vec<f64>> {
        self.diagonal()
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                if !v.is_finite() || v < 0.0 {
                    Err(Error::Computation(format!(
                        "cannot take square root of covariance diagonal entry {} = {}",
                        i, v
                    )))
                } else {
                    Ok(v.sqrt())
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_square() {
        let c = CovarianceMatrix::from_rows(vec![vec![4.0, 1.0], vec![1.0, 9.0]]).unwrap();
        assert_eq!(c.dim(), 2);
        assert_eq!(c.diagonal(), vec![4.0, 9.0]);
        assert_eq!(c.get(0, 1), Some(1.0));
        assert_eq!(c.get(2, 0), None);
        assert!(c.has_correlations());
        assert_eq!(c.standard_deviations().unwrap(), vec![2.0, 3.0]);
    }

    #[test]
    fn test_rejects_ragged_and_non_square() {
        let ragged = CovarianceMatrix::from_rows(vec![vec![1.0, 0.0], vec![1.0]]);
        assert!(matches!(ragged, Err(Error::InvalidInput(_))));

        let rect = CovarianceMatrix::from_rows(vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]]);
        assert!(matches!(rect, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_negative_variance_is_computation_error() {
        let c = CovarianceMatrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, -0.5]]).unwrap();
        assert!(!c.has_correlations());
        assert!(matches!(c.standard_deviations(), Err(Error::Computation(_))));
    }
}
