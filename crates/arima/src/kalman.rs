//! Kalman filter for ARMA likelihood evaluation.
//!
//! Implements a univariate Kalman filter operating on the state-space
//! representation from [`crate::state_space`], started from the stationary
//! state covariance. The exact Gaussian log-likelihood follows from the
//! prediction error decomposition; the innovation variance is concentrated
//! out:
//!
//! ```text
//! sigma2 = (1/n) * sum v_t^2 / F_t
//! loglik = -n/2 * (ln(2*pi*sigma2) + 1) - 1/2 * sum ln F_t
//! ```
//!
//! Once the prediction covariance stops changing the filter switches to its
//! steady state and only propagates the state mean.
//!
//! **Not part of the public API.**

use ndarray::{Array1, Array2};

use crate::error::ArimaError;
use crate::state_space::{StateSpace, max_abs_diff};

/// Prediction variances below this (per unit innovation variance) are
/// treated as singular. The exact filter keeps `F_t >= 1`.
const MIN_PREDICTION_VARIANCE: f64 = 1e-8;

/// Covariance change below which the filter is considered steady.
const STEADY_STATE_TOL: f64 = 1e-10;

/// Result of a full filter pass.
#[derive(Clone, Debug)]
pub(crate) struct KalmanOutput {
    pub(crate) sigma2: f64,
    pub(crate) log_likelihood: f64,
    /// One-step-ahead prediction errors `v_t`.
    pub(crate) residuals: Vec<f64>,
    /// Predicted state for the first period after the data.
    pub(crate) state: Vec<f64>,
}

struct Pass {
    ssq: f64,
    sum_log_f: f64,
    residuals: Vec<f64>,
    state: Array1<f64>,
}

/// Concentrated log-likelihood of zero-mean `data`.
pub(crate) fn concentrated_loglik(ss: &StateSpace, data: &[f64]) -> Result<f64, ArimaError> {
    let pass = filter(ss, data, false)?;
    Ok(loglik(&pass, data.len()).1)
}

/// Full filter pass returning sigma2, log-likelihood, residuals and the
/// final predicted state.
pub(crate) fn kalman_full(ss: &StateSpace, data: &[f64]) -> Result<KalmanOutput, ArimaError> {
    let pass = filter(ss, data, true)?;
    let (sigma2, log_likelihood) = loglik(&pass, data.len());
    if !sigma2.is_finite() || sigma2 <= 0.0 {
        return Err(ArimaError::Singular);
    }
    Ok(KalmanOutput {
        sigma2,
        log_likelihood,
        residuals: pass.residuals,
        state: pass.state.to_vec(),
    })
}

fn loglik(pass: &Pass, n: usize) -> (f64, f64) {
    let n = n as f64;
    let sigma2 = pass.ssq / n;
    let ll = -0.5 * n * ((2.0 * std::f64::consts::PI * sigma2).ln() + 1.0) - 0.5 * pass.sum_log_f;
    (sigma2, ll)
}

fn filter(ss: &StateSpace, data: &[f64], keep_residuals: bool) -> Result<Pass, ArimaError> {
    let r = ss.r();
    let mut a: Array1<f64> = Array1::zeros(r);
    let mut p: Array2<f64> = ss.initial_covariance()?;
    let mut steady = false;
    let mut f = p[[0, 0]];
    let mut gain: Array1<f64> = p.column(0).to_owned() / f;

    let mut ssq = 0.0;
    let mut sum_log_f = 0.0;
    let mut residuals = Vec::with_capacity(if keep_residuals { data.len() } else { 0 });

    for &y in data {
        if !steady {
            f = p[[0, 0]];
            if !f.is_finite() || f < MIN_PREDICTION_VARIANCE {
                return Err(ArimaError::Singular);
            }
            gain = p.column(0).to_owned() / f;
        }

        let v = y - a[0];
        ssq += v * v / f;
        sum_log_f += f.ln();
        if keep_residuals {
            residuals.push(v);
        }

        let updated = &a + &(&gain * v);
        a = ss.transition(&updated);

        if !steady {
            let col = p.column(0).to_owned();
            let mut p_upd = p.clone();
            for i in 0..r {
                for j in 0..r {
                    p_upd[[i, j]] -= col[i] * col[j] / f;
                }
            }
            let next = ss.propagate(&p_upd);
            let change = max_abs_diff(&next, &p);
            p = next;
            if change < STEADY_STATE_TOL {
                steady = true;
                f = p[[0, 0]];
                gain = p.column(0).to_owned() / f;
            }
        }
    }

    if !ssq.is_finite() {
        return Err(ArimaError::Singular);
    }

    Ok(Pass {
        ssq,
        sum_log_f,
        residuals,
        state: a,
    })
}
