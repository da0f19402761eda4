//! Unconstrained parameterisation of SARIMA coefficients.
//!
//! The optimiser works on an unconstrained vector laid out as
//!
//! ```text
//! [ ar (p) | ma (q) | seasonal ar (P) | seasonal ma (Q) | mean (0 or 1) ]
//! ```
//!
//! Each polynomial block goes through the PACF transform below, which
//! keeps AR parts stationary and MA parts invertible for any input. The mean
//! is stored standardised against the differenced data.
//!
//! **Not part of the public API.**

use crate::spec::OrderSpec;

/// Partial autocorrelations are clamped to this magnitude before `atanh`.
const MAX_PACF: f64 = 1.0 - 1e-10;

/// Maps unconstrained parameters to stationary coefficients via the PACF
/// parametrization (Jones 1980, Monahan 1984).
///
/// Step 1: `r_k = tanh(alpha_k)` maps each parameter to (-1, 1).
/// Step 2: Levinson-Durbin recursion converts partial autocorrelations
///         to polynomial coefficients of `1 - phi_1 B - ... - phi_p B^p`.
pub(crate) fn unconstrained_to_coeffs(alpha: &[f64]) -> Vec<f64> {
    let p = alpha.len();
    if p == 0 {
        return Vec::new();
    }

    let r: Vec<f64> = alpha.iter().map(|a| a.tanh()).collect();

    let mut phi = vec![0.0; p];
    let mut prev = vec![0.0; p];

    phi[0] = r[0];

    for k in 1..p {
        prev[..p].copy_from_slice(&phi[..p]);

        phi[k] = r[k];
        for j in 0..k {
            phi[j] = prev[j] - r[k] * prev[k - 1 - j];
        }
    }

    phi
}

/// Inverse of [`unconstrained_to_coeffs`].
///
/// Returns `None` when `phi` is not strictly stationary (some partial
/// autocorrelation has magnitude >= 1).
pub(crate) fn coeffs_to_unconstrained(phi: &[f64]) -> Option<Vec<f64>> {
    let p = phi.len();
    let mut cur = phi.to_vec();
    let mut r = vec![0.0; p];

    for k in (0..p).rev() {
        let rk = cur[k];
        if !rk.is_finite() || rk.abs() >= 1.0 {
            return None;
        }
        r[k] = rk;
        let denom = 1.0 - rk * rk;
        let prev: Vec<f64> = (0..k)
            .map(|j| (cur[j] + rk * cur[k - 1 - j]) / denom)
            .collect();
        cur[..k].copy_from_slice(&prev);
    }

    Some(
        r.iter()
            .map(|v| v.clamp(-MAX_PACF, MAX_PACF).atanh())
            .collect(),
    )
}

/// Coefficients decoded from an unconstrained vector.
///
/// MA blocks use the `1 + theta_1 B + ...` sign convention.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Coefficients {
    pub(crate) ar: Vec<f64>,
    pub(crate) ma: Vec<f64>,
    pub(crate) seasonal_ar: Vec<f64>,
    pub(crate) seasonal_ma: Vec<f64>,
    pub(crate) mean: f64,
}

/// Block sizes of the unconstrained vector plus the mean standardisation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Layout {
    p: usize,
    q: usize,
    sp: usize,
    sq: usize,
    constant: bool,
    center: f64,
    scale: f64,
}

impl Layout {
    pub(crate) fn new(order: &OrderSpec, constant: bool, center: f64, scale: f64) -> Self {
        Self {
            p: order.p(),
            q: order.q(),
            sp: order.seasonal_p(),
            sq: order.seasonal_q(),
            constant,
            center,
            scale: if scale > 0.0 { scale } else { 1.0 },
        }
    }

    /// Number of ARMA coefficients.
    pub(crate) fn n_arma(&self) -> usize {
        self.p + self.q + self.sp + self.sq
    }

    /// Length of the unconstrained vector.
    pub(crate) fn dim(&self) -> usize {
        self.n_arma() + usize::from(self.constant)
    }

    pub(crate) fn decode(&self, x: &[f64]) -> Coefficients {
        let (ar, rest) = x.split_at(self.p);
        let (ma, rest) = rest.split_at(self.q);
        let (sar, rest) = rest.split_at(self.sp);
        let (sma, rest) = rest.split_at(self.sq);
        let mean = if self.constant {
            self.center + self.scale * rest[0]
        } else {
            0.0
        };
        Coefficients {
            ar: unconstrained_to_coeffs(ar),
            ma: negated(unconstrained_to_coeffs(ma)),
            seasonal_ar: unconstrained_to_coeffs(sar),
            seasonal_ma: negated(unconstrained_to_coeffs(sma)),
            mean,
        }
    }

    /// Encodes coefficients back into the unconstrained space.
    ///
    /// Returns `None` when a block has the wrong length or lies on or
    /// outside the stationarity/invertibility boundary.
    pub(crate) fn encode(&self, c: &Coefficients) -> Option<Vec<f64>> {
        if c.ar.len() != self.p
            || c.ma.len() != self.q
            || c.seasonal_ar.len() != self.sp
            || c.seasonal_ma.len() != self.sq
        {
            return None;
        }
        let mut x = Vec::with_capacity(self.dim());
        x.extend(coeffs_to_unconstrained(&c.ar)?);
        x.extend(coeffs_to_unconstrained(&negated(c.ma.clone()))?);
        x.extend(coeffs_to_unconstrained(&c.seasonal_ar)?);
        x.extend(coeffs_to_unconstrained(&negated(c.seasonal_ma.clone()))?);
        if self.constant {
            x.push((c.mean - self.center) / self.scale);
        }
        x.iter().all(|v| v.is_finite()).then_some(x)
    }
}

fn negated(mut v: Vec<f64>) -> Vec<f64> {
    v.iter_mut().for_each(|x| *x = -*x);
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn empty_input() {
        assert!(unconstrained_to_coeffs(&[]).is_empty());
        assert_eq!(coeffs_to_unconstrained(&[]), Some(vec![]));
    }

    #[test]
    fn single_large_positive() {
        let result = unconstrained_to_coeffs(&[10.0]);
        assert_abs_diff_eq!(result[0], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn two_coefficients() {
        let result = unconstrained_to_coeffs(&[0.5, 0.3]);
        let expected_0 = 0.5_f64.tanh() - 0.3_f64.tanh() * 0.5_f64.tanh();
        let expected_1 = 0.3_f64.tanh();
        assert_abs_diff_eq!(result[0], expected_0, epsilon = 1e-12);
        assert_abs_diff_eq!(result[1], expected_1, epsilon = 1e-12);
    }

    #[test]
    fn ar2_stationarity_triangle() {
        for alpha in [[1.0, -2.0], [-3.0, 2.0], [0.1, 0.2], [2.5, 2.5]] {
            let phi = unconstrained_to_coeffs(&alpha);
            assert!(phi[1].abs() < 1.0);
            assert!(phi[1] + phi[0] < 1.0);
            assert!(phi[1] - phi[0] < 1.0);
        }
    }

    #[test]
    fn inverse_recovers_parameters() {
        for alpha in [vec![0.3], vec![0.5, -0.2], vec![1.0, -0.7, 0.4], vec![-1.2, 0.1, 0.9, 0.3]] {
            let phi = unconstrained_to_coeffs(&alpha);
            let back = coeffs_to_unconstrained(&phi).unwrap();
            for (a, b) in alpha.iter().zip(&back) {
                assert_abs_diff_eq!(a, b, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn inverse_rejects_non_stationary() {
        assert!(coeffs_to_unconstrained(&[1.2]).is_none());
        // 1 - 0.5B - 0.6B^2 has a root inside the unit circle.
        assert!(coeffs_to_unconstrained(&[0.5, 0.6]).is_none());
    }

    #[test]
    fn layout_dimensions() {
        let order = OrderSpec::new(2, 1, 1).with_seasonal(1, 0, 1, 4);
        let with_mean = Layout::new(&order, true, 0.0, 1.0);
        assert_eq!(with_mean.n_arma(), 5);
        assert_eq!(with_mean.dim(), 6);
        assert_eq!(Layout::new(&order, false, 0.0, 1.0).dim(), 5);
    }

    #[test]
    fn decode_signs_and_mean() {
        let order = OrderSpec::new(1, 0, 1);
        let layout = Layout::new(&order, true, 10.0, 2.0);
        let c = layout.decode(&[0.5, 0.5, 0.25]);
        assert_abs_diff_eq!(c.ar[0], 0.5_f64.tanh(), epsilon = 1e-12);
        assert_abs_diff_eq!(c.ma[0], -(0.5_f64.tanh()), epsilon = 1e-12);
        assert_abs_diff_eq!(c.mean, 10.5, epsilon = 1e-12);
    }

    #[test]
    fn encode_decode_round_trip() {
        let order = OrderSpec::new(2, 0, 1).with_seasonal(1, 0, 1, 4);
        let layout = Layout::new(&order, true, 3.0, 0.5);
        let x = vec![0.4, -0.3, 0.8, 0.2, -0.6, 1.5];
        let c = layout.decode(&x);
        let back = layout.encode(&c).unwrap();
        for (a, b) in x.iter().zip(&back) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn encode_rejects_wrong_lengths() {
        let layout = Layout::new(&OrderSpec::new(1, 0, 0), false, 0.0, 1.0);
        let c = Coefficients {
            ar: vec![],
            ma: vec![],
            seasonal_ar: vec![],
            seasonal_ma: vec![],
            mean: 0.0,
        };
        assert!(layout.encode(&c).is_none());
    }
}
