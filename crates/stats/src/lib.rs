//! Statistical helper functions shared by the augur crates.
//!
//! Everything here works on plain `&[f64]` slices and is infallible:
//! degenerate input yields `0.0`, an empty vector, or `None`.

/// Arithmetic mean of a slice. Returns 0.0 if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Sample variance with N-1 denominator.
/// Returns 0.0 if fewer than 2 elements.
pub fn variance(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let nf = n as f64;
    let mean = data.iter().sum::<f64>() / nf;
    data.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / (nf - 1.0)
}

/// Sample standard deviation with N-1 denominator.
/// Returns 0.0 if fewer than 2 elements.
pub fn sd(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Returns `true` when every element equals the first one (within machine
/// epsilon of the range). An empty slice counts as constant.
pub fn is_constant(data: &[f64]) -> bool {
    let min_val = data.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_val = data.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    data.is_empty() || (max_val - min_val).abs() < f64::EPSILON
}

/// Lag-`lag` difference: `x[t] - x[t - lag]` for `t >= lag`.
///
/// The result is `lag` elements shorter than the input (empty when the input
/// is not longer than `lag`). A lag of zero returns a copy of the input.
pub fn difference(data: &[f64], lag: usize) -> Vec<f64> {
    if lag == 0 {
        return data.to_vec();
    }
    if data.len() <= lag {
        return Vec::new();
    }
    (lag..data.len()).map(|t| data[t] - data[t - lag]).collect()
}

/// Applies first differencing `order` times.
pub fn difference_n(data: &[f64], order: usize) -> Vec<f64> {
    let mut out = data.to_vec();
    for _ in 0..order {
        out = difference(&out, 1);
    }
    out
}

/// Biased sample autocovariances `gamma[0..=max_lag]`.
///
/// Uses the `1/n` denominator at every lag, which keeps the implied
/// autocovariance matrix positive semi-definite. Lags at or beyond the
/// series length are omitted.
pub fn autocovariance(data: &[f64], max_lag: usize) -> Vec<f64> {
    let n = data.len();
    if n == 0 {
        return Vec::new();
    }
    let m = mean(data);
    let nf = n as f64;
    (0..=max_lag.min(n - 1))
        .map(|k| {
            (k..n)
                .map(|t| (data[t] - m) * (data[t - k] - m))
                .sum::<f64>()
                / nf
        })
        .collect()
}

/// Ordinary least squares estimates with classical standard errors.
#[derive(Clone, Debug, PartialEq)]
pub struct OlsFit {
    /// Estimated coefficients, one per design column.
    pub coefficients: Vec<f64>,
    /// Standard errors of the coefficients.
    pub std_errors: Vec<f64>,
    /// Residual sum of squares.
    pub rss: f64,
    /// Residual degrees of freedom (`n - k`).
    pub df: usize,
}

/// Regresses `y` on the given design columns (each of length `y.len()`).
///
/// Solves the normal equations by Gauss-Jordan inversion of `X'X`.
/// Returns `None` when a column length disagrees with `y`, there are no
/// residual degrees of freedom, or `X'X` is numerically singular.
pub fn ols(y: &[f64], columns: &[Vec<f64>]) -> Option<OlsFit> {
    let n = y.len();
    let k = columns.len();
    if k == 0 || n <= k || columns.iter().any(|c| c.len() != n) {
        return None;
    }

    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for i in 0..k {
        for j in i..k {
            let s: f64 = columns[i].iter().zip(&columns[j]).map(|(a, b)| a * b).sum();
            xtx[i][j] = s;
            xtx[j][i] = s;
        }
        xty[i] = columns[i].iter().zip(y).map(|(a, b)| a * b).sum();
    }

    let inv = invert(xtx)?;
    let coefficients: Vec<f64> = (0..k)
        .map(|i| (0..k).map(|j| inv[i][j] * xty[j]).sum())
        .collect();

    let rss: f64 = (0..n)
        .map(|t| {
            let fitted: f64 = (0..k).map(|j| columns[j][t] * coefficients[j]).sum();
            (y[t] - fitted).powi(2)
        })
        .sum();
    let df = n - k;
    let s2 = rss / df as f64;
    let std_errors: Vec<f64> = (0..k).map(|i| (s2 * inv[i][i]).max(0.0).sqrt()).collect();

    Some(OlsFit {
        coefficients,
        std_errors,
        rss,
        df,
    })
}

/// Inverts a square matrix by Gauss-Jordan elimination with partial pivoting.
fn invert(mut a: Vec<Vec<f64>>) -> Option<Vec<Vec<f64>>> {
    let k = a.len();
    let scale = a
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return None;
    }
    let tol = scale * 1e-12;

    let mut inv: Vec<Vec<f64>> = (0..k)
        .map(|i| (0..k).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for col in 0..k {
        let pivot_row = (col..k).max_by(|&r1, &r2| {
            a[r1][col]
                .abs()
                .partial_cmp(&a[r2][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if a[pivot_row][col].abs() <= tol {
            return None;
        }
        a.swap(col, pivot_row);
        inv.swap(col, pivot_row);

        let pivot = a[col][col];
        for j in 0..k {
            a[col][j] /= pivot;
            inv[col][j] /= pivot;
        }
        for row in 0..k {
            if row == col {
                continue;
            }
            let factor = a[row][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..k {
                a[row][j] -= factor * a[col][j];
                inv[row][j] -= factor * inv[col][j];
            }
        }
    }

    Some(inv)
}
