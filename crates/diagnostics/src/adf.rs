//! Augmented Dickey-Fuller unit-root test.
//!
//! The test regression includes a constant and a linear trend:
//!
//! ```text
//! dy[t] = a + b*t + g*y[t-1] + sum_{j=1}^{k-1} c_j * dy[t-j] + e[t]
//! ```
//!
//! The statistic is the t-ratio of `g`. Its p-value is interpolated from the
//! Dickey-Fuller critical values (Banerjee et al. 1993, Table 4.2), first
//! across sample sizes and then across significance levels, and clamped to
//! `[0.01, 0.99]`. A small p-value rejects the unit root.

use augur_stats::ols;
use serde::{Deserialize, Serialize};

use crate::DiagnosticsError;

/// Sample sizes indexing the rows of [`CRITICAL_VALUES`].
const TABLE_SIZES: [f64; 6] = [25.0, 50.0, 100.0, 250.0, 500.0, 100_000.0];

/// Significance levels indexing the columns of [`CRITICAL_VALUES`].
const TABLE_P: [f64; 8] = [0.01, 0.025, 0.05, 0.10, 0.90, 0.95, 0.975, 0.99];

/// Critical values of the trend-and-constant statistic, one column per
/// significance level, one row per sample size.
const CRITICAL_VALUES: [[f64; 6]; 8] = [
    [-4.38, -4.15, -4.04, -3.99, -3.98, -3.96],
    [-3.95, -3.80, -3.73, -3.69, -3.68, -3.66],
    [-3.60, -3.50, -3.45, -3.43, -3.42, -3.41],
    [-3.24, -3.18, -3.15, -3.13, -3.13, -3.12],
    [-1.14, -1.19, -1.22, -1.23, -1.24, -1.25],
    [-0.80, -0.87, -0.90, -0.92, -0.93, -0.94],
    [-0.50, -0.58, -0.62, -0.64, -0.65, -0.66],
    [-0.15, -0.24, -0.28, -0.31, -0.32, -0.33],
];

/// Outcome of an ADF test.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdfResult {
    /// t-ratio of the lagged level coefficient.
    pub statistic: f64,
    /// Interpolated p-value in `[0.01, 0.99]`.
    pub p_value: f64,
    /// Number of lagged differences in the regression.
    pub lags: usize,
}

impl AdfResult {
    /// `true` when the unit root is *not* rejected at `alpha`, i.e. the
    /// series should be differenced.
    pub fn should_difference(&self, alpha: f64) -> bool {
        self.p_value > alpha
    }
}

/// Default lag order: `trunc((n - 1)^(1/3))`.
pub fn default_lags(n: usize) -> usize {
    if n < 2 {
        return 0;
    }
    ((n - 1) as f64).cbrt().trunc() as usize
}

/// Runs the ADF test with the default lag order.
///
/// # Errors
///
/// See [`adf_test_with_lags`].
pub fn adf_test(data: &[f64]) -> Result<AdfResult, DiagnosticsError> {
    adf_test_with_lags(data, default_lags(data.len()))
}

/// Runs the ADF test with `lags` lagged differences.
///
/// # Errors
///
/// - [`DiagnosticsError::EmptyData`] / [`DiagnosticsError::NonFiniteData`]
///   for invalid input.
/// - [`DiagnosticsError::InsufficientData`] when the regression would have
///   no residual degrees of freedom.
/// - [`DiagnosticsError::SingularRegression`] when the design matrix is
///   rank deficient (e.g. a constant series).
pub fn adf_test_with_lags(data: &[f64], lags: usize) -> Result<AdfResult, DiagnosticsError> {
    if data.is_empty() {
        return Err(DiagnosticsError::EmptyData);
    }
    if data.iter().any(|v| !v.is_finite()) {
        return Err(DiagnosticsError::NonFiniteData);
    }

    // k counts the current difference plus `lags` lagged ones.
    let k = lags + 1;
    let dy = augur_stats::difference(data, 1);
    let n = dy.len();
    // Regressors: level, constant, trend, k-1 lagged differences.
    let n_reg = k + 2;
    let min = k + n_reg + 1;
    if data.len() < min {
        return Err(DiagnosticsError::InsufficientData {
            n: data.len(),
            min,
        });
    }
    let rows = n - k + 1;

    let y: Vec<f64> = (0..rows).map(|j| dy[j + k - 1]).collect();
    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(n_reg);
    columns.push((0..rows).map(|j| data[j + k - 1]).collect());
    columns.push(vec![1.0; rows]);
    columns.push((0..rows).map(|j| (j + k) as f64).collect());
    for lag in 1..k {
        columns.push((0..rows).map(|j| dy[j + k - 1 - lag]).collect());
    }

    let fit = ols(&y, &columns).ok_or(DiagnosticsError::SingularRegression)?;
    let se = fit.std_errors[0];
    if !se.is_finite() || se <= 0.0 {
        return Err(DiagnosticsError::SingularRegression);
    }
    let statistic = fit.coefficients[0] / se;

    Ok(AdfResult {
        statistic,
        p_value: p_value(statistic, n),
        lags,
    })
}

/// Interpolates the p-value of `statistic` for a regression on `n`
/// differenced observations.
fn p_value(statistic: f64, n: usize) -> f64 {
    let critical: Vec<f64> = CRITICAL_VALUES
        .iter()
        .map(|row| interpolate(&TABLE_SIZES, row, n as f64))
        .collect();
    interpolate(&critical, &TABLE_P, statistic)
}

/// Piecewise-linear interpolation with constant extrapolation beyond the
/// ends. `xs` must be non-decreasing.
fn interpolate(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    let last = xs.len() - 1;
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[last] {
        return ys[last];
    }
    let i = xs.partition_point(|&v| v <= x).saturating_sub(1).min(last - 1);
    let (x0, x1) = (xs[i], xs[i + 1]);
    if x1 == x0 {
        return ys[i];
    }
    ys[i] + (ys[i + 1] - ys[i]) * (x - x0) / (x1 - x0)
}
