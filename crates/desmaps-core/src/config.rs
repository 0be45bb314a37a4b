//! Configuration for desmaps-core
//!
//! Named parameter records for each stage of the pipeline. Every record has
//! a `Default` carrying the standard values, and missing keys in a parameter
//! file fall back to those defaults.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::interp::linspace;

/// Full pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesmapsConfig {
    /// Histogram binning
    pub nofm: NofmConfig,
    /// Integration bounds and numerics for each table row
    pub tabulation: TabulationConfig,
    /// Depth limits to tabulate
    pub grid: DepthLimitGrid,
}

/// Binning of the N(m) histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NofmConfig {
    /// Number of bins
    pub nbin: usize,
    /// Lower edge of the first bin
    pub min_mag: f64,
    /// Upper edge of the last bin
    pub max_mag: f64,
}

impl Default for NofmConfig {
    fn default() -> Self {
        Self {
            nbin: 200,
            min_mag: 14.0,
            max_mag: 30.0,
        }
    }
}

/// Numerical resolution of a single effective-density integral
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationConfig {
    /// Points at which N(m) is interpolated and completeness evaluated
    pub interp_points: usize,
    /// Order of the Gauss-Legendre rule
    pub quadrature_order: usize,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            interp_points: 200,
            quadrature_order: 100,
        }
    }
}

/// Per-row settings for depth-limit tabulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabulationConfig {
    /// Lower integration bound used when none is given per row
    pub min_integration_mag: f64,
    /// Integration numerics
    pub integration: IntegrationConfig,
}

impl Default for TabulationConfig {
    fn default() -> Self {
        Self {
            min_integration_mag: 16.0,
            integration: IntegrationConfig::default(),
        }
    }
}

/// Evenly spaced depth limits, inclusive of both ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthLimitGrid {
    /// Shallowest depth limit
    pub min: f64,
    /// Deepest depth limit
    pub max: f64,
    /// Number of depth limits
    pub count: usize,
}

impl Default for DepthLimitGrid {
    fn default() -> Self {
        Self {
            min: 19.0,
            max: 24.5,
            count: 100,
        }
    }
}

impl DepthLimitGrid {
    /// The depth limits, ascending
    pub fn values(&self) -> Vec<f64> {
        linspace(self.min, self.max, self.count)
    }
}

impl NofmConfig {
    /// Validate binning values
    pub fn validate(&self) -> CoreResult<()> {
        if self.nbin == 0 {
            return Err(CoreError::InvalidBinning {
                message: "nbin must be at least 1".to_string(),
            });
        }
        if !(self.min_mag < self.max_mag) {
            return Err(CoreError::InvalidBinning {
                message: format!(
                    "min_mag {} must be less than max_mag {}",
                    self.min_mag, self.max_mag
                ),
            });
        }
        Ok(())
    }
}

impl IntegrationConfig {
    /// Validate integration resolution
    pub fn validate(&self) -> CoreResult<()> {
        if self.interp_points < 2 {
            return Err(CoreError::InvalidConfig(
                "interp_points must be at least 2".to_string(),
            ));
        }
        if self.quadrature_order == 0 {
            return Err(CoreError::InvalidConfig(
                "quadrature_order must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl DepthLimitGrid {
    /// Validate grid bounds
    pub fn validate(&self) -> CoreResult<()> {
        if self.count == 0 {
            return Err(CoreError::InvalidConfig(
                "grid count must be at least 1".to_string(),
            ));
        }
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(CoreError::InvalidConfig(format!(
                "grid min {} must not exceed max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

impl DesmapsConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    #[cfg(feature = "toml-config")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Serialize configuration to TOML
    #[cfg(feature = "toml-config")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Validate every section
    pub fn validate(&self) -> CoreResult<()> {
        self.nofm.validate()?;
        self.tabulation.integration.validate()?;
        if !self.tabulation.min_integration_mag.is_finite() {
            return Err(CoreError::InvalidConfig(
                "min_integration_mag must be finite".to_string(),
            ));
        }
        self.grid.validate()?;
        Ok(())
    }

    /// Parameters as `(key, value)` pairs, for file headers
    pub fn header_entries(&self) -> Vec<(String, String)> {
        vec![
            ("nofm_nbin".to_string(), self.nofm.nbin.to_string()),
            ("nofm_min_mag".to_string(), self.nofm.min_mag.to_string()),
            ("nofm_max_mag".to_string(), self.nofm.max_mag.to_string()),
            ("maglim_min".to_string(), self.grid.min.to_string()),
            ("maglim_max".to_string(), self.grid.max.to_string()),
            ("nmaglim".to_string(), self.grid.count.to_string()),
            (
                "min_int_mag".to_string(),
                self.tabulation.min_integration_mag.to_string(),
            ),
            (
                "ninterp".to_string(),
                self.tabulation.integration.interp_points.to_string(),
            ),
            (
                "nint".to_string(),
                self.tabulation.integration.quadrature_order.to_string(),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DesmapsConfig::default();
        assert_eq!(config.nofm.nbin, 200);
        assert_eq!(config.nofm.min_mag, 14.0);
        assert_eq!(config.nofm.max_mag, 30.0);
        assert_eq!(config.tabulation.min_integration_mag, 16.0);
        assert_eq!(config.tabulation.integration.interp_points, 200);
        assert_eq!(config.tabulation.integration.quadrature_order, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = DesmapsConfig::default();
        let json = config.to_json().unwrap();
        let parsed = DesmapsConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let parsed = DesmapsConfig::from_json(r#"{"nofm": {"nbin": 100}}"#).unwrap();
        assert_eq!(parsed.nofm.nbin, 100);
        assert_eq!(parsed.nofm.max_mag, 30.0);
        assert_eq!(parsed.grid.count, 100);
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_toml_roundtrip() {
        let config = DesmapsConfig::default();
        let text = config.to_toml().unwrap();
        let parsed = DesmapsConfig::from_toml(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validation_failures() {
        let mut config = DesmapsConfig::default();
        config.tabulation.integration.interp_points = 1;
        assert!(config.validate().is_err());

        let mut config = DesmapsConfig::default();
        config.nofm.min_mag = 31.0;
        assert!(config.validate().is_err());

        let mut config = DesmapsConfig::default();
        config.grid.count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_grid_values() {
        let grid = DepthLimitGrid {
            min: 19.0,
            max: 24.5,
            count: 12,
        };
        let values = grid.values();
        assert_eq!(values.len(), 12);
        assert_eq!(values[0], 19.0);
        assert_eq!(values[11], 24.5);
        assert!((values[1] - 19.5).abs() < 1e-12);
    }

    #[test]
    fn test_header_entries() {
        let entries = DesmapsConfig::default().header_entries();
        assert!(entries.contains(&("nofm_nbin".to_string(), "200".to_string())));
        assert!(entries.contains(&("nint".to_string(), "100".to_string())));
    }
}
