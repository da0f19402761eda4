//! Lag-polynomial helpers.
//!
//! Polynomials are dense coefficient vectors in powers of the backshift
//! operator `B`, lowest power first, with the leading `1` included.
//!
//! **Not part of the public API.**

/// Product of two polynomials.
pub(crate) fn multiply(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        if x == 0.0 {
            continue;
        }
        for (j, &y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// `1 - c_1 B^s - c_2 B^{2s} - ...`
fn ar_operator(coeffs: &[f64], step: usize) -> Vec<f64> {
    let mut out = vec![0.0; coeffs.len() * step + 1];
    out[0] = 1.0;
    for (i, &c) in coeffs.iter().enumerate() {
        out[(i + 1) * step] = -c;
    }
    out
}

/// `1 + c_1 B^s + c_2 B^{2s} + ...`
fn ma_operator(coeffs: &[f64], step: usize) -> Vec<f64> {
    let mut out = vec![0.0; coeffs.len() * step + 1];
    out[0] = 1.0;
    for (i, &c) in coeffs.iter().enumerate() {
        out[(i + 1) * step] = c;
    }
    out
}

/// Expanded AR coefficients `phi` of `(1 - ar(B)) (1 - sar(B^m))`, such that
/// the product equals `1 - sum phi_k B^k`.
pub(crate) fn expand_ar(ar: &[f64], seasonal_ar: &[f64], period: usize) -> Vec<f64> {
    let prod = multiply(&ar_operator(ar, 1), &ar_operator(seasonal_ar, period.max(1)));
    prod[1..].iter().map(|c| -c).collect()
}

/// Expanded MA coefficients `theta` of `(1 + ma(B)) (1 + sma(B^m))`, such
/// that the product equals `1 + sum theta_k B^k`.
pub(crate) fn expand_ma(ma: &[f64], seasonal_ma: &[f64], period: usize) -> Vec<f64> {
    let prod = multiply(&ma_operator(ma, 1), &ma_operator(seasonal_ma, period.max(1)));
    prod[1..].to_vec()
}

/// Differencing operator `(1 - B)^d (1 - B^m)^D`, leading `1` included.
pub(crate) fn differencing(d: usize, seasonal_d: usize, period: usize) -> Vec<f64> {
    let mut out = vec![1.0];
    for _ in 0..d {
        out = multiply(&out, &[1.0, -1.0]);
    }
    if period >= 2 {
        let mut seasonal = vec![0.0; period + 1];
        seasonal[0] = 1.0;
        seasonal[period] = -1.0;
        for _ in 0..seasonal_d {
            out = multiply(&out, &seasonal);
        }
    }
    out
}

/// AR coefficients of the integrated model `phi(B) * delta(B)`, in the same
/// `1 - sum` convention as [`expand_ar`].
pub(crate) fn integrate_ar(phi: &[f64], delta: &[f64]) -> Vec<f64> {
    let prod = multiply(&ar_operator(phi, 1), delta);
    prod[1..].iter().map(|c| -c).collect()
}

/// First `n` psi-weights of the MA(inf) representation of
/// `(1 - sum phi_k B^k) y = (1 + sum theta_k B^k) e`.
pub(crate) fn psi_weights(phi: &[f64], theta: &[f64], n: usize) -> Vec<f64> {
    let mut psi = vec![0.0; n];
    if n == 0 {
        return psi;
    }
    psi[0] = 1.0;
    for j in 1..n {
        let mut v = theta.get(j - 1).copied().unwrap_or(0.0);
        for i in 1..=phi.len().min(j) {
            v += phi[i - 1] * psi[j - i];
        }
        psi[j] = v;
    }
    psi
}

/// Applies `(1 - B)^d (1 - B^m)^D` to `data`, dropping the undefined
/// leading values.
pub(crate) fn difference(data: &[f64], d: usize, seasonal_d: usize, period: usize) -> Vec<f64> {
    let mut w = augur_stats::difference_n(data, d);
    if period >= 2 {
        for _ in 0..seasonal_d {
            w = augur_stats::difference(&w, period);
        }
    }
    w
}

/// Inverts differencing: extends `history` (raw observations, at least
/// `delta.len() - 1` long) with the values whose differences are `w`.
pub(crate) fn integrate(history: &[f64], w: &[f64], delta: &[f64]) -> Vec<f64> {
    let span = delta.len() - 1;
    let mut buf = history.to_vec();
    let mut out = Vec::with_capacity(w.len());
    for &wt in w {
        let len = buf.len();
        let mut y = wt;
        for k in 1..=span {
            y -= delta[k] * buf[len - k];
        }
        buf.push(y);
        out.push(y);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_vec_eq(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len(), "{a:?} vs {b:?}");
        for (x, y) in a.iter().zip(b) {
            assert_abs_diff_eq!(x, y, epsilon = 1e-12);
        }
    }

    #[test]
    fn multiply_simple() {
        assert_vec_eq(&multiply(&[1.0, 1.0], &[1.0, -1.0]), &[1.0, 0.0, -1.0]);
    }

    #[test]
    fn expand_ar_non_seasonal_is_identity() {
        assert_vec_eq(&expand_ar(&[0.5, -0.2], &[], 0), &[0.5, -0.2]);
        assert!(expand_ar(&[], &[], 12).is_empty());
    }

    #[test]
    fn expand_ar_seasonal_cross_term() {
        // (1 - 0.5B)(1 - 0.3B^4) = 1 - 0.5B - 0.3B^4 + 0.15B^5
        let phi = expand_ar(&[0.5], &[0.3], 4);
        assert_vec_eq(&phi, &[0.5, 0.0, 0.0, 0.3, -0.15]);
    }

    #[test]
    fn expand_ma_seasonal_cross_term() {
        // (1 + 0.4B)(1 + 0.5B^2) = 1 + 0.4B + 0.5B^2 + 0.2B^3
        let theta = expand_ma(&[0.4], &[0.5], 2);
        assert_vec_eq(&theta, &[0.4, 0.5, 0.2]);
    }

    #[test]
    fn differencing_operator() {
        assert_vec_eq(&differencing(0, 0, 0), &[1.0]);
        assert_vec_eq(&differencing(2, 0, 0), &[1.0, -2.0, 1.0]);
        // (1 - B)(1 - B^3) = 1 - B - B^3 + B^4
        assert_vec_eq(&differencing(1, 1, 3), &[1.0, -1.0, 0.0, -1.0, 1.0]);
        // seasonal order ignored without a period
        assert_vec_eq(&differencing(1, 1, 1), &[1.0, -1.0]);
    }

    #[test]
    fn psi_weights_ar1() {
        let psi = psi_weights(&[0.5], &[], 4);
        assert_vec_eq(&psi, &[1.0, 0.5, 0.25, 0.125]);
    }

    #[test]
    fn psi_weights_ma1() {
        let psi = psi_weights(&[], &[0.4], 3);
        assert_vec_eq(&psi, &[1.0, 0.4, 0.0]);
    }

    #[test]
    fn psi_weights_random_walk() {
        let phi = integrate_ar(&[], &differencing(1, 0, 0));
        assert_vec_eq(&phi, &[1.0]);
        assert_vec_eq(&psi_weights(&phi, &[], 4), &[1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn difference_then_integrate() {
        let y = [3.0, 5.0, 4.0, 8.0, 9.0, 7.0, 12.0, 15.0];
        let delta = differencing(1, 1, 2);
        let w = difference(&y, 1, 1, 2);
        assert_eq!(w.len(), y.len() - 3);
        let rebuilt = integrate(&y[..3], &w, &delta);
        assert_vec_eq(&rebuilt, &y[3..]);
    }

    #[test]
    fn integrate_without_differencing_is_identity() {
        let out = integrate(&[], &[1.0, 2.0], &[1.0]);
        assert_vec_eq(&out, &[1.0, 2.0]);
    }
}
