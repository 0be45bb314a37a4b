//! Effective number tabulated against depth limit
//!
//! Each row integrates N(m) against a fresh [`CompletenessModel`] built for
//! that row's depth limit. The table is a parallel array in caller order:
//! downstream map interpolation indexes it by position, so rows are never
//! sorted or deduplicated.

use serde::{Deserialize, Serialize};
use tracing::info;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::completeness::CompletenessModel;
use crate::config::TabulationConfig;
use crate::error::{validation, CoreResult};
use crate::neff::EffectiveDensityIntegrator;
use crate::nofm::MagnitudeHistogram;

/// One depth limit and its effective number.
///
/// Serialized field names follow the neff-vs-maglim file layout
/// (`maglim`, `neff`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthLimitRow {
    #[serde(rename = "maglim")]
    pub depth_limit: f64,
    #[serde(rename = "neff")]
    pub effective_density: f64,
}

/// Rows in the order of the depth limits they were computed from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepthLimitTable {
    rows: Vec<DepthLimitRow>,
}

impl DepthLimitTable {
    /// Wrap rows, keeping their order
    pub fn from_rows(rows: Vec<DepthLimitRow>) -> Self {
        Self { rows }
    }

    /// All rows
    pub fn rows(&self) -> &[DepthLimitRow] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Depth limits, index-aligned with [`effective_densities`](Self::effective_densities)
    pub fn depth_limits(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.depth_limit).collect()
    }

    /// Effective numbers, index-aligned with [`depth_limits`](Self::depth_limits)
    pub fn effective_densities(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.effective_density).collect()
    }

    /// Iterate over rows
    pub fn iter(&self) -> std::slice::Iter<'_, DepthLimitRow> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a DepthLimitTable {
    type Item = &'a DepthLimitRow;
    type IntoIter = std::slice::Iter<'a, DepthLimitRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Builds [`DepthLimitTable`]s with a fixed configuration
#[derive(Debug, Clone)]
pub struct Tabulator {
    config: TabulationConfig,
    integrator: EffectiveDensityIntegrator,
}

impl Tabulator {
    /// Tabulator for the given configuration
    pub fn new(config: TabulationConfig) -> CoreResult<Self> {
        let integrator = EffectiveDensityIntegrator::new(config.integration)?;
        Ok(Self { config, integrator })
    }

    /// Configuration in use
    pub fn config(&self) -> &TabulationConfig {
        &self.config
    }

    /// Effective number for every depth limit.
    ///
    /// Without `min_int_mags` every row integrates from
    /// `config.min_integration_mag`; without `max_int_mags` every row
    /// integrates up to its own depth limit. Given bound arrays must match
    /// `depth_limits` in length, which is checked before any row is computed.
    /// A row with an invalid range fails the whole call.
    pub fn tabulate(
        &self,
        histogram: &MagnitudeHistogram,
        depth_limits: &[f64],
        min_int_mags: Option<&[f64]>,
        max_int_mags: Option<&[f64]>,
    ) -> CoreResult<DepthLimitTable> {
        let n = depth_limits.len();
        if let Some(mins) = min_int_mags {
            validation::validate_length("min_int_mags", n, mins.len())?;
        }
        if let Some(maxs) = max_int_mags {
            validation::validate_length("max_int_mags", n, maxs.len())?;
        }

        let bounds: Vec<(f64, f64, f64)> = depth_limits
            .iter()
            .enumerate()
            .map(|(i, &depth_limit)| {
                let min = min_int_mags.map_or(self.config.min_integration_mag, |m| m[i]);
                let max = max_int_mags.map_or(depth_limit, |m| m[i]);
                (depth_limit, min, max)
            })
            .collect();

        info!(rows = n, "tabulating effective number against depth limit");

        let rows = self.compute_rows(histogram, &bounds)?;
        Ok(DepthLimitTable { rows })
    }

    fn compute_rows(
        &self,
        histogram: &MagnitudeHistogram,
        bounds: &[(f64, f64, f64)],
    ) -> CoreResult<Vec<DepthLimitRow>> {
        #[cfg(feature = "parallel")]
        return self.parallel_rows(histogram, bounds);

        #[cfg(not(feature = "parallel"))]
        self.serial_rows(histogram, bounds)
    }

    #[cfg_attr(feature = "parallel", allow(dead_code))]
    fn serial_rows(
        &self,
        histogram: &MagnitudeHistogram,
        bounds: &[(f64, f64, f64)],
    ) -> CoreResult<Vec<DepthLimitRow>> {
        bounds
            .iter()
            .map(|&(depth_limit, min, max)| self.row(histogram, depth_limit, min, max))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn parallel_rows(
        &self,
        histogram: &MagnitudeHistogram,
        bounds: &[(f64, f64, f64)],
    ) -> CoreResult<Vec<DepthLimitRow>> {
        bounds
            .par_iter()
            .map(|&(depth_limit, min, max)| self.row(histogram, depth_limit, min, max))
            .collect()
    }

    fn row(
        &self,
        histogram: &MagnitudeHistogram,
        depth_limit: f64,
        min: f64,
        max: f64,
    ) -> CoreResult<DepthLimitRow> {
        let model = CompletenessModel::new(depth_limit);
        let effective_density = self.integrator.integrate(histogram, &model, min, max)?;
        Ok(DepthLimitRow {
            depth_limit,
            effective_density,
        })
    }
}

impl Default for Tabulator {
    fn default() -> Self {
        Self {
            config: TabulationConfig::default(),
            integrator: EffectiveDensityIntegrator::with_defaults(),
        }
    }
}

/// Tabulate with the default configuration
pub fn tabulate_neff(
    histogram: &MagnitudeHistogram,
    depth_limits: &[f64],
    min_int_mags: Option<&[f64]>,
    max_int_mags: Option<&[f64]>,
) -> CoreResult<DepthLimitTable> {
    Tabulator::default().tabulate(histogram, depth_limits, min_int_mags, max_int_mags)
}
