//! desmaps-core - Completeness-corrected number densities for survey maps
//!
//! A raw object count overstates how many objects a survey reliably detects
//! near its depth limit. This crate corrects for that by weighting the
//! empirical magnitude distribution N(m) by a completeness curve and
//! integrating:
//!
//! - **completeness**: error-function completeness model for a depth limit
//! - **nofm**: binned magnitude histogram N(m)
//! - **neff**: completeness-weighted integral of N(m)
//! - **table**: effective number tabulated against depth limit
//!
//! The numerics are self-contained: a Gauss error function ([`erf`]), linear
//! interpolation with edge clamping ([`interp`]) and fixed-order
//! Gauss-Legendre quadrature ([`quadrature`]).
//!
//! # Example
//!
//! ```
//! use desmaps_core::{tabulate_neff, MagnitudeHistogram};
//!
//! let mags: Vec<f64> = (0..1000).map(|i| 18.0 + 6.0 * i as f64 / 1000.0).collect();
//! let nofm = MagnitudeHistogram::build(&mags, 200, 14.0, 30.0).unwrap();
//! let table = tabulate_neff(&nofm, &[22.0, 23.0, 24.0], None, None).unwrap();
//! assert_eq!(table.depth_limits(), vec![22.0, 23.0, 24.0]);
//! ```

pub mod completeness;
pub mod config;
pub mod erf;
pub mod error;
pub mod interp;
pub mod neff;
pub mod nofm;
pub mod quadrature;
pub mod table;

pub use completeness::*;
pub use config::*;
pub use error::{CoreError, CoreResult};
pub use neff::*;
pub use nofm::*;
pub use quadrature::GaussLegendre;
pub use table::*;
