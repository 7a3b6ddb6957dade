//! JSON model description.

use crate::model::ConturLikelihood;
use contur_core::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything needed to build a [`ConturLikelihood`], in serializable form.
///
/// ```json
/// {
///   "signal_yields": [5.0, 10.0],
///   "background_yields": [20.0, 30.0],
///   "data": [25.0, 40.0],
///   "signal_covariance": [[1.0, 0.0], [0.0, 1.0]],
///   "background_covariance": [[1.0, 0.0], [0.0, 1.0]],
///   "data_covariance": [[1.0, 0.0], [0.0, 1.0]]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelInput {
    /// Expected signal count per bin at `μ = 1`.
    pub signal_yields: Vec<f64>,
    /// Expected background count per bin.
    pub background_yields: Vec<f64>,
    /// Observed count per bin.
    pub data: Vec<f64>,
    /// Signal covariance (`N × N`).
    pub signal_covariance: Vec<Vec<f64>>,
    /// Background covariance (`N × N`).
    pub background_covariance: Vec<Vec<f64>>,
    /// Data covariance (`N × N`).
    pub data_covariance: Vec<Vec<f64>>,
}

impl ModelInput {
    /// Parse from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Validate and build the model.
    pub fn into_model(self) -> Result<ConturLikelihood> {
        ConturLikelihood::new(
            self.signal_yields,
            self.background_yields,
            self.data,
            self.signal_covariance,
            self.background_covariance,
            self.data_covariance,
        )
    }
}

impl TryFrom<ModelInput> for ConturLikelihood {
    type Error = contur_core::Error;

    fn try_from(input: ModelInput) -> Result<Self> {
        input.into_model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contur_core::Error;

    const TWO_BIN: &str = include_str!("../../../tests/fixtures/two_bin.json");

    #[test]
    fn test_fixture_parses_and_builds() {
        let input = ModelInput::from_json_str(TWO_BIN).unwrap();
        assert_eq!(input.signal_yields, vec![5.0, 10.0]);
        let model = ConturLikelihood::try_from(input).unwrap();
        assert_eq!(model.nbins(), 2);
        assert_eq!(model.data(), &[25.0, 40.0]);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let json = r#"{
            "signal_yields": [1.0], "background_yields": [1.0], "data": [1.0],
            "signal_covariance": [[1.0]], "background_covariance": [[1.0]],
            "data_covariance": [[1.0]], "extra": true
        }"#;
        assert!(matches!(ModelInput::from_json_str(json), Err(Error::Json(_))));
    }

    #[test]
    fn test_missing_field_rejected() {
        let json = r#"{ "signal_yields": [1.0], "background_yields": [1.0] }"#;
        assert!(matches!(ModelInput::from_json_str(json), Err(Error::Json(_))));
    }

    #[test]
    fn test_validation_runs_on_build() {
        let mut input = ModelInput::from_json_str(TWO_BIN).unwrap();
        input.data.push(3.0);
        assert!(matches!(input.into_model(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ModelInput::from_path("/nonexistent/contur/model.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_serialize_roundtrip() {
        let input = ModelInput::from_json_str(TWO_BIN).unwrap();
        let text = serde_json::to_string(&input).unwrap();
        assert_eq!(ModelInput::from_json_str(&text).unwrap(), input);
    }
}
