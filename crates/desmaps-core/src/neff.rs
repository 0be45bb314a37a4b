//! Effective number of objects under a completeness curve
//!
//! N(m) is interpolated from the histogram bin centers onto an even grid
//! over the integration bounds, the completeness is evaluated on the same
//! grid, and both `N(m)` and `N(m) * completeness(m)` are integrated with a
//! fixed-order Gauss-Legendre rule.
//!
//! The effective number is the weighted integral itself, not its ratio to
//! the unweighted one. [`NeffIntegral::fraction`] gives the ratio for
//! callers who want it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::completeness::SelectionFunction;
use crate::config::IntegrationConfig;
use crate::error::{validation, CoreResult};
use crate::interp::{interp_batch, linspace};
use crate::nofm::MagnitudeHistogram;
use crate::quadrature::GaussLegendre;

/// Both integrals over the same bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeffIntegral {
    /// Integral of the interpolated N(m)
    pub total: f64,
    /// Integral of N(m) weighted by completeness
    pub effective: f64,
}

impl NeffIntegral {
    /// `effective / total`; NaN when the histogram is empty over the bounds
    pub fn fraction(&self) -> f64 {
        self.effective / self.total
    }
}

/// Integrates N(m) against a selection function.
///
/// The quadrature rule is built once, so one integrator can be reused for
/// every row of a table.
#[derive(Debug, Clone)]
pub struct EffectiveDensityIntegrator {
    config: IntegrationConfig,
    quadrature: GaussLegendre,
}

impl EffectiveDensityIntegrator {
    /// Integrator with the given resolution
    pub fn new(config: IntegrationConfig) -> CoreResult<Self> {
        config.validate()?;
        let quadrature = GaussLegendre::new(config.quadrature_order)?;
        Ok(Self { config, quadrature })
    }

    /// Integrator with the default resolution (200 samples, order 100)
    pub fn with_defaults() -> Self {
        let config = IntegrationConfig::default();
        Self {
            config,
            quadrature: GaussLegendre::compute(config.quadrature_order),
        }
    }

    /// Resolution settings
    pub fn config(&self) -> &IntegrationConfig {
        &self.config
    }

    /// Completeness-weighted integral of N(m) over `[min_mag, max_mag]`.
    ///
    /// Fails when the bounds are empty, reversed or NaN.
    pub fn integrate<S>(
        &self,
        histogram: &MagnitudeHistogram,
        selection: &S,
        min_mag: f64,
        max_mag: f64,
    ) -> CoreResult<f64>
    where
        S: SelectionFunction + ?Sized,
    {
        Ok(self
            .integrate_detailed(histogram, selection, min_mag, max_mag)?
            .effective)
    }

    /// Weighted and unweighted integrals over `[min_mag, max_mag]`
    pub fn integrate_detailed<S>(
        &self,
        histogram: &MagnitudeHistogram,
        selection: &S,
        min_mag: f64,
        max_mag: f64,
    ) -> CoreResult<NeffIntegral>
    where
        S: SelectionFunction + ?Sized,
    {
        validation::validate_range(min_mag, max_mag)?;

        let interp_mag = linspace(min_mag, max_mag, self.config.interp_points);
        let nofm_interp = interp_batch(&interp_mag, &histogram.centers(), &histogram.counts_f64());
        let completeness = selection.evaluate(&interp_mag);

        let weighted: Vec<f64> = nofm_interp
            .iter()
            .zip(&completeness)
            .map(|(n, c)| n * c)
            .collect();

        let total = self.quadrature.integrate_samples(&interp_mag, &nofm_interp);
        let effective = self.quadrature.integrate_samples(&interp_mag, &weighted);

        debug!(min_mag, max_mag, total, effective, "integrated N(m)");

        Ok(NeffIntegral { total, effective })
    }
}

impl Default for EffectiveDensityIntegrator {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Effective number with the default integrator
pub fn get_neff<S>(
    histogram: &MagnitudeHistogram,
    selection: &S,
    min_mag: f64,
    max_mag: f64,
) -> CoreResult<f64>
where
    S: SelectionFunction + ?Sized,
{
    EffectiveDensityIntegrator::with_defaults().integrate(histogram, selection, min_mag, max_mag)
}
