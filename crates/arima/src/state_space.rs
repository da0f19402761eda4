//! ARMA state-space representation.
//!
//! Converts expanded ARMA coefficients into the companion (Harvey) form:
//!
//! ```text
//! x[t+1] = T * x[t] + R * e[t]     (state transition)
//! y[t]   = Z' * x[t]                (observation, Z = e_1)
//! ```
//!
//! where `T` carries the AR coefficients in its first column and ones on the
//! super-diagonal, `R = [1, theta_1, ..., theta_{r-1}]`, and
//! `e[t] ~ N(0, sigma2)`. Seasonal models use the multiplied-out
//! polynomials, so the state dimension is `max(p + P*m, q + Q*m + 1)`.
//!
//! **Not part of the public API.**

use ndarray::{Array1, Array2, Axis};

use crate::error::ArimaError;

/// Doubling steps allowed when solving for the initial covariance; step k
/// accounts for `2^k` transition powers.
const MAX_DOUBLING: usize = 64;

/// Relative change below which the doubling recursion has converged.
const DOUBLING_TOL: f64 = 1e-12;

/// State-space representation of an ARMA model.
///
/// Holds the transition matrix `T` and the precomputed `R·Rᵀ` for the
/// Kalman filter.
#[derive(Clone, Debug)]
pub(crate) struct StateSpace {
    r: usize,
    phi: Vec<f64>,
    t: Array2<f64>,
    rrt: Array2<f64>,
}

impl StateSpace {
    /// Builds a state-space representation from expanded AR (`1 - sum`) and
    /// MA (`1 + sum`) coefficients.
    pub(crate) fn new(ar: &[f64], ma: &[f64]) -> Self {
        let p = ar.len();
        let q = ma.len();
        let r = p.max(q + 1).max(1);

        let mut phi = vec![0.0; r];
        phi[..p].copy_from_slice(ar);

        let mut t = Array2::zeros((r, r));
        for i in 0..p {
            t[[i, 0]] = ar[i];
        }
        for i in 0..r.saturating_sub(1) {
            t[[i, i + 1]] = 1.0;
        }

        let mut r_vec = Array1::zeros(r);
        r_vec[0] = 1.0;
        for j in 0..q {
            r_vec[j + 1] = ma[j];
        }

        let r_col = r_vec.view().insert_axis(Axis(1)); // (r, 1)
        let r_row = r_vec.view().insert_axis(Axis(0)); // (1, r)
        let rrt = r_col.dot(&r_row);

        Self { r, phi, t, rrt }
    }

    /// State dimension `r = max(p, q+1)`, minimum 1.
    pub(crate) fn r(&self) -> usize {
        self.r
    }

    /// `T * a`, using the companion structure (O(r)).
    pub(crate) fn transition(&self, a: &Array1<f64>) -> Array1<f64> {
        let r = self.r;
        Array1::from_shape_fn(r, |i| {
            let shifted = if i + 1 < r { a[i + 1] } else { 0.0 };
            self.phi[i] * a[0] + shifted
        })
    }

    /// `T * P * Tᵀ + R·Rᵀ`, using the companion structure (O(r²)).
    pub(crate) fn propagate(&self, p: &Array2<f64>) -> Array2<f64> {
        let r = self.r;
        // M = T P
        let m = Array2::from_shape_fn((r, r), |(i, j)| {
            let shifted = if i + 1 < r { p[[i + 1, j]] } else { 0.0 };
            self.phi[i] * p[[0, j]] + shifted
        });
        // M Tᵀ + RRᵀ
        Array2::from_shape_fn((r, r), |(i, j)| {
            let shifted = if j + 1 < r { m[[i, j + 1]] } else { 0.0 };
            self.phi[j] * m[[i, 0]] + shifted + self.rrt[[i, j]]
        })
    }

    /// Unconditional state covariance (per unit innovation variance), the
    /// solution of `P = T P Tᵀ + R·Rᵀ`.
    ///
    /// Uses the doubling recursion `Q ← Q + A Q Aᵀ`, `A ← A²`, which sums
    /// `Σ T^k R·Rᵀ (Tᵀ)^k` in `log2` steps.
    ///
    /// # Errors
    ///
    /// Returns [`ArimaError::NonStationary`] when the sum diverges or does
    /// not settle within the step budget.
    pub(crate) fn initial_covariance(&self) -> Result<Array2<f64>, ArimaError> {
        let mut a = self.t.clone();
        let mut q = self.rrt.clone();

        for _ in 0..MAX_DOUBLING {
            let next = &q + &a.dot(&q).dot(&a.t());
            if next.iter().any(|v| !v.is_finite()) {
                return Err(ArimaError::NonStationary);
            }
            let delta = max_abs_diff(&next, &q);
            let scale = next.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
            q = next;
            if delta <= DOUBLING_TOL * scale.max(1.0) {
                return Ok(q);
            }
            a = a.dot(&a);
        }

        Err(ArimaError::NonStationary)
    }
}

/// Largest absolute element-wise difference.
pub(crate) fn max_abs_diff(a: &Array2<f64>, b: &Array2<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .fold(0.0_f64, |acc, (x, y)| acc.max((x - y).abs()))
}
