//! Stationarity diagnostics for ARIMA order selection.
//!
//! - [`recommended_differencing`] applies the augmented Dickey-Fuller test
//!   to successive differences and returns the smallest order that looks
//!   stationary.
//! - [`correlogram`] computes ACF and PACF profiles used to eyeball AR and
//!   MA orders.
//!
//! # Example
//!
//! ```
//! use augur_diagnostics::{correlogram, DEFAULT_MAX_LAG};
//!
//! let data: Vec<f64> = (0..60).map(|t| ((t * 7) % 13) as f64).collect();
//! let c = correlogram(&data, DEFAULT_MAX_LAG, 0).unwrap();
//! assert_eq!(c.acf().len(), DEFAULT_MAX_LAG + 1);
//! ```

pub mod adf;
mod correlogram;
mod differencing;
mod error;

pub use adf::{AdfResult, adf_test};
pub use correlogram::{Correlogram, DEFAULT_MAX_LAG, correlogram};
pub use differencing::{DifferencingConfig, recommended_differencing};
pub use error::DiagnosticsError;
