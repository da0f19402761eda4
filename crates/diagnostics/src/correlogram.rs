//! Autocorrelation and partial autocorrelation profiles.

use augur_stats::{autocovariance, difference_n, is_constant};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::DiagnosticsError;

/// Default number of lags in a correlogram.
pub const DEFAULT_MAX_LAG: usize = 25;

/// ACF and PACF of a (possibly differenced) series.
///
/// Both vectors have `max_lag + 1` entries and start with `1.0` at lag 0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Correlogram {
    acf: Vec<f64>,
    pacf: Vec<f64>,
    diff_order: usize,
    n_obs: usize,
}

impl Correlogram {
    /// Autocorrelations for lags `0..=max_lag`.
    pub fn acf(&self) -> &[f64] {
        &self.acf
    }

    /// Partial autocorrelations for lags `0..=max_lag`.
    pub fn pacf(&self) -> &[f64] {
        &self.pacf
    }

    /// Highest lag computed.
    pub fn max_lag(&self) -> usize {
        self.acf.len() - 1
    }

    /// Number of differences applied before computing the profiles.
    pub fn diff_order(&self) -> usize {
        self.diff_order
    }

    /// Number of observations after differencing.
    pub fn n_obs(&self) -> usize {
        self.n_obs
    }

    /// Half-width `z(1 - alpha/2) / sqrt(n)` of the white-noise band.
    ///
    /// # Errors
    ///
    /// Returns [`DiagnosticsError::InvalidConfig`] unless `0 < alpha < 1`.
    pub fn significance_bound(&self, alpha: f64) -> Result<f64, DiagnosticsError> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(DiagnosticsError::InvalidConfig {
                reason: format!("alpha must be in (0, 1), got {alpha}"),
            });
        }
        let normal = Normal::new(0.0, 1.0).map_err(|e| DiagnosticsError::InvalidConfig {
            reason: e.to_string(),
        })?;
        Ok(normal.inverse_cdf(1.0 - alpha / 2.0) / (self.n_obs as f64).sqrt())
    }
}

/// Computes the ACF and PACF of `data` after `diff_order` first differences.
///
/// # Errors
///
/// - [`DiagnosticsError::EmptyData`] / [`DiagnosticsError::NonFiniteData`].
/// - [`DiagnosticsError::InsufficientData`] when `data` has fewer than
///   `max_lag + diff_order + 1` observations.
/// - [`DiagnosticsError::ConstantData`] when the differenced series has zero
///   variance.
pub fn correlogram(
    data: &[f64],
    max_lag: usize,
    diff_order: usize,
) -> Result<Correlogram, DiagnosticsError> {
    if data.is_empty() {
        return Err(DiagnosticsError::EmptyData);
    }
    if data.iter().any(|v| !v.is_finite()) {
        return Err(DiagnosticsError::NonFiniteData);
    }
    let min = max_lag + diff_order + 1;
    if data.len() < min {
        return Err(DiagnosticsError::InsufficientData {
            n: data.len(),
            min,
        });
    }

    let x = difference_n(data, diff_order);
    if is_constant(&x) {
        return Err(DiagnosticsError::ConstantData);
    }

    let gamma = autocovariance(&x, max_lag);
    let acf: Vec<f64> = gamma.iter().map(|g| g / gamma[0]).collect();
    let pacf = durbin_levinson(&acf);

    Ok(Correlogram {
        acf,
        pacf,
        diff_order,
        n_obs: x.len(),
    })
}

/// Partial autocorrelations from autocorrelations `rho[0..=m]`.
///
/// If the recursion degenerates (perfect linear prediction), the remaining
/// lags are reported as zero.
fn durbin_levinson(rho: &[f64]) -> Vec<f64> {
    let m = rho.len() - 1;
    let mut pacf = vec![0.0; m + 1];
    pacf[0] = 1.0;
    if m == 0 {
        return pacf;
    }

    let mut phi = vec![0.0; m + 1];
    let mut prev = vec![0.0; m + 1];
    let mut v: f64 = 1.0;

    for k in 1..=m {
        let num = rho[k] - (1..k).map(|j| prev[j] * rho[k - j]).sum::<f64>();
        if v.abs() < 1e-12 {
            break;
        }
        let phi_kk = num / v;
        phi[k] = phi_kk;
        for j in 1..k {
            phi[j] = prev[j] - phi_kk * prev[k - j];
        }
        pacf[k] = phi_kk;
        v *= 1.0 - phi_kk * phi_kk;
        prev[..=k].copy_from_slice(&phi[..=k]);
    }

    pacf
}
