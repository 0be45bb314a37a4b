//! Detection completeness as a function of magnitude
//!
//! For an n-sigma depth limit the completeness is modelled as
//!
//! ```text
//! completeness(m) = (eff/2) * (1 - erf((m - m50) / sqrt(2*w)))
//! ```
//!
//! where `eff` is the completeness for very bright objects, `w` sets the
//! width of the roll-off and `m50` is the magnitude at which the sample is
//! half as complete as at the bright end.
//!
//! The depth limit to `m50` calibration is fitted for the survey i-band and
//! is not valid for other bands.

use serde::{Deserialize, Serialize};

use crate::erf::erf;

/// Default roll-off width of the error function
pub const DEFAULT_WIDTH: f64 = 0.193;

/// Default completeness at the bright end
pub const DEFAULT_BRIGHT_END_EFFICIENCY: f64 = 0.97;

/// Anything that weights magnitudes by a detection probability.
///
/// The integrator consumes this trait, so selection functions other than
/// [`CompletenessModel`] can be integrated against the same N(m).
pub trait SelectionFunction {
    /// Detection probability at a single magnitude
    fn completeness(&self, mag: f64) -> f64;

    /// Detection probability at every magnitude in `mags`
    fn evaluate(&self, mags: &[f64]) -> Vec<f64> {
        mags.iter().map(|&m| self.completeness(m)).collect()
    }
}

/// Convert an n-sigma depth limit to the 50% completeness magnitude.
///
/// Calibrated for the survey i-band only.
pub fn maglim_to_mag50(depth_limit: f64) -> f64 {
    23.81 + 0.78 * (depth_limit - 23.0)
}

/// Error-function completeness model for a given depth limit.
///
/// The model is a value: `fifty_percent_mag` is derived from `depth_limit`
/// at construction, so the fields are private and a different depth limit
/// means a new model. Deserialization rederives it as well; a serialized
/// `fifty_percent_mag` is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ModelParameters")]
pub struct CompletenessModel {
    depth_limit: f64,
    width: f64,
    bright_end_efficiency: f64,
    fifty_percent_mag: f64,
}

/// Calibration inputs a model is deserialized from
#[derive(Deserialize)]
struct ModelParameters {
    depth_limit: f64,
    #[serde(default = "default_width")]
    width: f64,
    #[serde(default = "default_bright_end_efficiency")]
    bright_end_efficiency: f64,
}

fn default_width() -> f64 {
    DEFAULT_WIDTH
}

fn default_bright_end_efficiency() -> f64 {
    DEFAULT_BRIGHT_END_EFFICIENCY
}

impl From<ModelParameters> for CompletenessModel {
    fn from(params: ModelParameters) -> Self {
        Self::with_parameters(params.depth_limit, params.width, params.bright_end_efficiency)
    }
}

impl CompletenessModel {
    /// Model with the default width and bright-end efficiency
    pub fn new(depth_limit: f64) -> Self {
        Self::with_parameters(depth_limit, DEFAULT_WIDTH, DEFAULT_BRIGHT_END_EFFICIENCY)
    }

    /// Model with explicit calibration constants
    pub fn with_parameters(depth_limit: f64, width: f64, bright_end_efficiency: f64) -> Self {
        Self {
            depth_limit,
            width,
            bright_end_efficiency,
            fifty_percent_mag: maglim_to_mag50(depth_limit),
        }
    }

    /// The same calibration at a different depth limit
    pub fn with_depth_limit(&self, depth_limit: f64) -> Self {
        Self::with_parameters(depth_limit, self.width, self.bright_end_efficiency)
    }

    /// n-sigma depth limit the model was built for
    pub fn depth_limit(&self) -> f64 {
        self.depth_limit
    }

    /// Roll-off width
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Asymptotic completeness for bright objects
    pub fn bright_end_efficiency(&self) -> f64 {
        self.bright_end_efficiency
    }

    /// Magnitude at which completeness is half the bright-end efficiency
    pub fn fifty_percent_mag(&self) -> f64 {
        self.fifty_percent_mag
    }

    /// Completeness at a single magnitude
    pub fn at(&self, mag: f64) -> f64 {
        let scaled = (mag - self.fifty_percent_mag) / (2.0 * self.width).sqrt();
        0.5 * self.bright_end_efficiency * (1.0 - erf(scaled))
    }
}

impl SelectionFunction for CompletenessModel {
    fn completeness(&self, mag: f64) -> f64 {
        self.at(mag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mag50_calibration() {
        assert!((maglim_to_mag50(23.0) - 23.81).abs() < 1e-12);
        assert!((maglim_to_mag50(23.7) - 24.356).abs() < 1e-12);
    }

    #[test]
    fn test_half_efficiency_at_mag50() {
        let model = CompletenessModel::new(23.7);
        assert!((model.fifty_percent_mag() - 24.356).abs() < 1e-12);
        let value = model.at(24.356);
        assert!((value - 0.485).abs() < 1e-9, "got {value}");
    }

    #[test]
    fn test_asymptotes() {
        let model = CompletenessModel::new(23.0);
        assert!((model.at(10.0) - 0.97).abs() < 1e-12);
        assert_eq!(model.at(40.0), 0.0);
        assert_eq!(model.at(f64::NEG_INFINITY), 0.97);
        assert_eq!(model.at(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_nan_propagates() {
        let model = CompletenessModel::new(23.0);
        assert!(model.at(f64::NAN).is_nan());
    }

    #[test]
    fn test_evaluate_batch() {
        let model = CompletenessModel::new(23.7);
        let values = model.evaluate(&[18.0, 24.356, 30.0]);
        assert_eq!(values.len(), 3);
        assert!(values[0] > values[1]);
        assert!(values[1] > values[2]);
    }

    #[test]
    fn test_with_depth_limit_recomputes_mag50() {
        let model = CompletenessModel::with_parameters(23.0, 0.25, 0.9);
        let deeper = model.with_depth_limit(24.0);
        assert_eq!(deeper.width(), 0.25);
        assert_eq!(deeper.bright_end_efficiency(), 0.9);
        assert!((deeper.fifty_percent_mag() - 24.59).abs() < 1e-12);
    }

    #[test]
    fn test_custom_efficiency() {
        let model = CompletenessModel::with_parameters(23.0, DEFAULT_WIDTH, 1.0);
        assert!((model.at(model.fifty_percent_mag()) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_deserialize_rederives_mag50() {
        let json = r#"{"depth_limit":23.7,"width":0.193,"bright_end_efficiency":0.97,"fifty_percent_mag":10.0}"#;
        let model: CompletenessModel = serde_json::from_str(json).unwrap();
        assert!((model.fifty_percent_mag() - 24.356).abs() < 1e-12);
        assert!((model.at(24.356) - 0.485).abs() < 1e-9);
    }

    #[test]
    fn test_deserialize_defaults_and_roundtrip() {
        let model: CompletenessModel = serde_json::from_str(r#"{"depth_limit":23.0}"#).unwrap();
        assert_eq!(model, CompletenessModel::new(23.0));

        let custom = CompletenessModel::with_parameters(22.5, 0.25, 0.9);
        let json = serde_json::to_string(&custom).unwrap();
        let parsed: CompletenessModel = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, custom);
    }
}
