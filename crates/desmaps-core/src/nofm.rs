//! Binned magnitude distribution N(m)
//!
//! Bins are contiguous, equal width and ascending in magnitude, covering
//! `[min_mag, max_mag)` exactly `nbin` times. Magnitudes outside the range
//! are dropped without error, except that a magnitude equal to `max_mag` is
//! counted in the last bin so the closing edge is not silently lost.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::NofmConfig;
use crate::error::{CoreError, CoreResult};

/// Relative tolerance used when validating persisted bin edges
const EDGE_TOLERANCE: f64 = 1e-9;

/// A single magnitude bin.
///
/// Serialized field names follow the N(m) file layout
/// (`center`, `low`, `high`, `num`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagnitudeBin {
    /// Midpoint of `[low, high)`
    pub center: f64,
    /// Lower edge, inclusive
    pub low: f64,
    /// Upper edge, exclusive
    pub high: f64,
    /// Number of magnitudes that fell in the bin
    #[serde(rename = "num")]
    pub count: u64,
}

/// Histogram of magnitudes.
///
/// Deserialization goes through [`MagnitudeHistogram::from_bins`], so a
/// deserialized histogram always has at least one valid bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HistogramRecord", into = "HistogramRecord")]
pub struct MagnitudeHistogram {
    bins: Vec<MagnitudeBin>,
}

/// Serialized form of [`MagnitudeHistogram`]
#[derive(Clone, Serialize, Deserialize)]
struct HistogramRecord {
    bins: Vec<MagnitudeBin>,
}

impl TryFrom<HistogramRecord> for MagnitudeHistogram {
    type Error = CoreError;

    fn try_from(record: HistogramRecord) -> CoreResult<Self> {
        Self::from_bins(record.bins)
    }
}

impl From<MagnitudeHistogram> for HistogramRecord {
    fn from(histogram: MagnitudeHistogram) -> Self {
        Self {
            bins: histogram.bins,
        }
    }
}

impl MagnitudeHistogram {
    /// Bin `magnitudes` into `nbin` equal bins over `[min_mag, max_mag)`.
    ///
    /// Fails for `nbin == 0` or a range that is empty, reversed or not
    /// finite. NaN magnitudes never match a bin and are dropped.
    pub fn build(magnitudes: &[f64], nbin: usize, min_mag: f64, max_mag: f64) -> CoreResult<Self> {
        if nbin == 0 {
            return Err(CoreError::InvalidBinning {
                message: "nbin must be at least 1".to_string(),
            });
        }
        if !min_mag.is_finite() || !max_mag.is_finite() || min_mag >= max_mag {
            return Err(CoreError::InvalidBinning {
                message: format!("min_mag {min_mag} must be less than max_mag {max_mag}"),
            });
        }

        let width = (max_mag - min_mag) / nbin as f64;
        let edge = |i: usize| {
            if i == nbin {
                max_mag
            } else {
                min_mag + i as f64 * width
            }
        };

        let mut counts = vec![0u64; nbin];
        let mut dropped = 0usize;

        for &mag in magnitudes {
            if !(mag >= min_mag && mag <= max_mag) {
                dropped += 1;
                continue;
            }
            // The floor can land one bin off the stored edges; the edges win
            let mut index = (((mag - min_mag) / width).floor() as usize).min(nbin - 1);
            if mag < edge(index) {
                index -= 1;
            } else if index + 1 < nbin && mag >= edge(index + 1) {
                index += 1;
            }
            counts[index] += 1;
        }

        debug!(
            nbin,
            min_mag,
            max_mag,
            input = magnitudes.len(),
            dropped,
            "built magnitude histogram"
        );

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| {
                let low = edge(i);
                let high = edge(i + 1);
                MagnitudeBin {
                    center: 0.5 * (low + high),
                    low,
                    high,
                    count,
                }
            })
            .collect();

        Ok(Self { bins })
    }

    /// Bin `magnitudes` with the binning from `config`
    pub fn from_config(magnitudes: &[f64], config: &NofmConfig) -> CoreResult<Self> {
        Self::build(magnitudes, config.nbin, config.min_mag, config.max_mag)
    }

    /// Rebuild a histogram from persisted bins.
    ///
    /// The bins must be non-empty, ascending, contiguous and of equal width,
    /// with each center at the midpoint of its edges.
    pub fn from_bins(bins: Vec<MagnitudeBin>) -> CoreResult<Self> {
        let first = bins.first().ok_or_else(|| CoreError::InvalidHistogram {
            message: "no bins".to_string(),
        })?;
        let width = first.high - first.low;
        if !(width > 0.0) || !width.is_finite() {
            return Err(CoreError::InvalidHistogram {
                message: format!("bin 0 has non-positive width {width}"),
            });
        }
        let tolerance = EDGE_TOLERANCE * width.max(first.high.abs());

        for (i, bin) in bins.iter().enumerate() {
            if ((bin.high - bin.low) - width).abs() > tolerance {
                return Err(CoreError::InvalidHistogram {
                    message: format!("bin {i} width {} differs from {width}", bin.high - bin.low),
                });
            }
            if (bin.center - 0.5 * (bin.low + bin.high)).abs() > tolerance {
                return Err(CoreError::InvalidHistogram {
                    message: format!("bin {i} center {} is not the midpoint", bin.center),
                });
            }
            if i > 0 && (bin.low - bins[i - 1].high).abs() > tolerance {
                return Err(CoreError::InvalidHistogram {
                    message: format!("bin {i} does not start where bin {} ends", i - 1),
                });
            }
        }

        Ok(Self { bins })
    }

    /// All bins, ascending in magnitude
    pub fn bins(&self) -> &[MagnitudeBin] {
        &self.bins
    }

    /// Number of bins
    pub fn nbin(&self) -> usize {
        self.bins.len()
    }

    /// Common bin width
    pub fn bin_width(&self) -> f64 {
        self.bins[0].high - self.bins[0].low
    }

    /// Lower edge of the first bin
    pub fn min_mag(&self) -> f64 {
        self.bins[0].low
    }

    /// Upper edge of the last bin
    pub fn max_mag(&self) -> f64 {
        self.bins[self.bins.len() - 1].high
    }

    /// Bin centers, the abscissae of N(m)
    pub fn centers(&self) -> Vec<f64> {
        self.bins.iter().map(|b| b.center).collect()
    }

    /// Bin counts
    pub fn counts(&self) -> Vec<u64> {
        self.bins.iter().map(|b| b.count).collect()
    }

    /// Bin counts as floats, the ordinates of N(m)
    pub fn counts_f64(&self) -> Vec<f64> {
        self.bins.iter().map(|b| b.count as f64).collect()
    }

    /// Total number of binned magnitudes
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|b| b.count).sum()
    }

    /// Consume the histogram, returning its bins
    pub fn into_bins(self) -> Vec<MagnitudeBin> {
        self.bins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_basic() {
        let mags = [14.5, 15.5, 15.6, 29.9];
        let hist = MagnitudeHistogram::build(&mags, 16, 14.0, 30.0).unwrap();

        assert_eq!(hist.nbin(), 16);
        assert_eq!(hist.bins()[0].count, 1);
        assert_eq!(hist.bins()[1].count, 2);
        assert_eq!(hist.bins()[15].count, 1);
        assert_eq!(hist.total(), 4);
    }

    #[test]
    fn test_edges_and_centers() {
        let hist = MagnitudeHistogram::build(&[], 4, 0.0, 2.0).unwrap();
        let bin = hist.bins()[1];
        assert_eq!(bin.low, 0.5);
        assert_eq!(bin.high, 1.0);
        assert_eq!(bin.center, 0.75);
        assert_eq!(hist.min_mag(), 0.0);
        assert_eq!(hist.max_mag(), 2.0);
        assert_eq!(hist.bin_width(), 0.5);
    }

    #[test]
    fn test_out_of_range_dropped() {
        let mags = [10.0, 13.999, 30.001, 45.0, f64::NAN, 20.0];
        let hist = MagnitudeHistogram::build(&mags, 10, 14.0, 30.0).unwrap();
        assert_eq!(hist.total(), 1);
    }

    #[test]
    fn test_upper_edge_in_last_bin() {
        let hist = MagnitudeHistogram::build(&[30.0], 10, 14.0, 30.0).unwrap();
        assert_eq!(hist.bins()[9].count, 1);
        assert_eq!(hist.total(), 1);
    }

    #[test]
    fn test_lower_edge_in_first_bin() {
        let hist = MagnitudeHistogram::build(&[14.0], 10, 14.0, 30.0).unwrap();
        assert_eq!(hist.bins()[0].count, 1);
    }

    #[test]
    fn test_interior_edge_goes_up() {
        // 0.5 is the low edge of bin 1
        let hist = MagnitudeHistogram::build(&[0.5], 4, 0.0, 2.0).unwrap();
        assert_eq!(hist.bins()[0].count, 0);
        assert_eq!(hist.bins()[1].count, 1);
    }

    fn assert_edges_land_in_own_bin(nbin: usize, min_mag: f64, max_mag: f64) {
        let edges = MagnitudeHistogram::build(&[], nbin, min_mag, max_mag).unwrap();
        let lows: Vec<f64> = edges.bins().iter().map(|b| b.low).collect();
        let hist = MagnitudeHistogram::build(&lows, nbin, min_mag, max_mag).unwrap();
        for (i, bin) in hist.bins().iter().enumerate() {
            assert_eq!(bin.count, 1, "low edge {} of bin {i} landed elsewhere", bin.low);
        }
    }

    #[test]
    fn test_stored_low_edges_land_in_own_bin() {
        assert_edges_land_in_own_bin(20, 14.0, 30.0);
        assert_edges_land_in_own_bin(200, 14.0, 30.0);
        assert_edges_land_in_own_bin(7, 16.3, 27.1);
        assert_edges_land_in_own_bin(55, 18.0, 25.0);
    }

    #[test]
    fn test_inexact_edge_goes_up() {
        // 20.4 is the low edge of bin 8 but not exact in binary
        let hist = MagnitudeHistogram::build(&[20.4], 20, 14.0, 30.0).unwrap();
        assert_eq!(hist.bins()[8].low, 20.4);
        assert_eq!(hist.bins()[7].count, 0);
        assert_eq!(hist.bins()[8].count, 1);
    }

    #[test]
    fn test_values_just_below_edge_stay_down() {
        let hist = MagnitudeHistogram::build(&[], 20, 14.0, 30.0).unwrap();
        let below: Vec<f64> = hist.bins()[1..]
            .iter()
            .map(|b| b.low - b.low * f64::EPSILON)
            .collect();
        let binned = MagnitudeHistogram::build(&below, 20, 14.0, 30.0).unwrap();
        for i in 0..19 {
            assert_eq!(binned.bins()[i].count, 1, "bin {i}");
        }
        assert_eq!(binned.bins()[19].count, 0);
    }

    #[test]
    fn test_deserialize_validates_bins() {
        let empty = serde_json::from_str::<MagnitudeHistogram>(r#"{"bins":[]}"#);
        assert!(empty.is_err());

        let gap = r#"{"bins":[
            {"center":0.5,"low":0.0,"high":1.0,"num":1},
            {"center":2.5,"low":2.0,"high":3.0,"num":1}]}"#;
        assert!(serde_json::from_str::<MagnitudeHistogram>(gap).is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let hist = MagnitudeHistogram::build(&[15.0, 21.3, 21.4], 20, 14.0, 30.0).unwrap();
        let json = serde_json::to_string(&hist).unwrap();
        assert!(json.starts_with(r#"{"bins":["#));
        let parsed: MagnitudeHistogram = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, hist);
    }

    #[test]
    fn test_invalid_binning() {
        assert!(MagnitudeHistogram::build(&[], 0, 14.0, 30.0).is_err());
        assert!(MagnitudeHistogram::build(&[], 10, 30.0, 14.0).is_err());
        assert!(MagnitudeHistogram::build(&[], 10, 14.0, 14.0).is_err());
        assert!(MagnitudeHistogram::build(&[], 10, f64::NAN, 14.0).is_err());
    }

    #[test]
    fn test_empty_input_all_zero() {
        let hist = MagnitudeHistogram::build(&[], 5, 14.0, 30.0).unwrap();
        assert!(hist.counts().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_from_config_defaults() {
        let hist = MagnitudeHistogram::from_config(&[20.0], &NofmConfig::default()).unwrap();
        assert_eq!(hist.nbin(), 200);
        assert_eq!(hist.min_mag(), 14.0);
        assert_eq!(hist.max_mag(), 30.0);
    }

    #[test]
    fn test_from_bins_roundtrip() {
        let hist = MagnitudeHistogram::build(&[15.0, 16.2, 16.3], 8, 14.0, 30.0).unwrap();
        let rebuilt = MagnitudeHistogram::from_bins(hist.bins().to_vec()).unwrap();
        assert_eq!(rebuilt, hist);
    }

    #[test]
    fn test_from_bins_rejects_gaps() {
        let bins = vec![
            MagnitudeBin { center: 0.5, low: 0.0, high: 1.0, count: 1 },
            MagnitudeBin { center: 2.5, low: 2.0, high: 3.0, count: 1 },
        ];
        assert!(matches!(
            MagnitudeHistogram::from_bins(bins),
            Err(CoreError::InvalidHistogram { .. })
        ));
    }

    #[test]
    fn test_from_bins_rejects_unequal_width() {
        let bins = vec![
            MagnitudeBin { center: 0.5, low: 0.0, high: 1.0, count: 1 },
            MagnitudeBin { center: 2.0, low: 1.0, high: 3.0, count: 1 },
        ];
        assert!(MagnitudeHistogram::from_bins(bins).is_err());
    }

    #[test]
    fn test_from_bins_rejects_empty() {
        assert!(MagnitudeHistogram::from_bins(Vec::new()).is_err());
    }

    #[test]
    fn test_serialized_field_names() {
        let bin = MagnitudeBin { center: 0.5, low: 0.0, high: 1.0, count: 3 };
        let json = serde_json::to_string(&bin).unwrap();
        assert!(json.contains("\"num\":3"));
    }
}
