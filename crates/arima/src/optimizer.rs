//! Nelder-Mead optimiser for SARIMA maximum-likelihood estimation.
//!
//! Wraps the `argmin` crate to minimise the negative concentrated
//! log-likelihood over the unconstrained parameters of [`crate::params`].

use argmin::core::{CostFunction, Executor, TerminationReason, TerminationStatus};
use argmin::solver::neldermead::NelderMead;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ArimaError;
use crate::fit::FittedModel;
use crate::kalman;
use crate::params::{Coefficients, Layout};
use crate::poly;
use crate::spec::OrderSpec;
use crate::state_space::StateSpace;

/// Whether the model includes a constant (mean of the differenced series).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intercept {
    /// Include a constant when `d + D < 2`.
    #[default]
    Auto,
    /// Always include a constant.
    Include,
    /// Never include a constant.
    Exclude,
}

impl Intercept {
    /// Resolves the policy for a given total differencing order `d + D`.
    pub fn resolve(self, total_differencing: usize) -> bool {
        match self {
            Intercept::Auto => total_differencing < 2,
            Intercept::Include => true,
            Intercept::Exclude => false,
        }
    }
}

/// Options controlling a single model fit.
///
/// # Example
///
/// ```
/// use augur_arima::{FitOptions, Intercept};
///
/// let options = FitOptions::default()
///     .with_intercept(Intercept::Exclude)
///     .with_max_iters(500);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FitOptions {
    intercept: Intercept,
    max_iters: u64,
    tolerance: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            intercept: Intercept::Auto,
            max_iters: 2000,
            tolerance: 1e-8,
        }
    }
}

impl FitOptions {
    /// Sets the constant-term policy.
    pub fn with_intercept(mut self, intercept: Intercept) -> Self {
        self.intercept = intercept;
        self
    }

    /// Sets the Nelder-Mead iteration budget.
    pub fn with_max_iters(mut self, max_iters: u64) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Sets the simplex cost standard-deviation tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Returns the constant-term policy.
    pub fn intercept(&self) -> Intercept {
        self.intercept
    }

    /// Returns the iteration budget.
    pub fn max_iters(&self) -> u64 {
        self.max_iters
    }

    /// Returns the convergence tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Validates this configuration.
    ///
    /// Returns an error if `max_iters` is zero or the tolerance is not a
    /// positive finite number.
    pub fn validate(&self) -> Result<(), ArimaError> {
        if self.max_iters == 0 {
            return Err(ArimaError::InvalidConfig {
                reason: "max_iters must be at least 1".to_string(),
            });
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(ArimaError::InvalidConfig {
                reason: format!("tolerance must be positive, got {}", self.tolerance),
            });
        }
        Ok(())
    }
}

/// Fits a SARIMA order to data via exact MLE.
///
/// This is the full pipeline:
/// 1. Validate order and data
/// 2. Difference and standardise
/// 3. Optimise the concentrated log-likelihood via Nelder-Mead, starting
///    from `warm` when given
/// 4. Extract final parameters via a full Kalman pass
#[tracing::instrument(level = "debug", skip_all, fields(order = %order, n = data.len()))]
pub(crate) fn fit_sarima(
    order: OrderSpec,
    data: &[f64],
    options: &FitOptions,
    warm: Option<&FittedModel>,
) -> Result<FittedModel, ArimaError> {
    // 1. Validate
    order.validate()?;
    options.validate()?;
    if data.is_empty() {
        return Err(ArimaError::EmptyData);
    }
    if data.iter().any(|x| !x.is_finite()) {
        return Err(ArimaError::NonFiniteData);
    }
    let span = order.differencing_span();
    if span >= data.len() {
        return Err(ArimaError::InvalidOrder {
            reason: format!(
                "differencing span {span} leaves no observations from {}",
                data.len()
            ),
        });
    }
    let constant = options.intercept().resolve(order.d() + order.seasonal_d());
    if order.n_coefficients() + order.d() + order.seasonal_d() == 0 && !constant {
        return Err(ArimaError::InvalidOrder {
            reason: "model has no terms and no constant".to_string(),
        });
    }
    if augur_stats::is_constant(data) {
        return Err(ArimaError::ConstantData);
    }

    // 2. Difference and standardise
    let w = poly::difference(data, order.d(), order.seasonal_d(), order.period());
    if augur_stats::is_constant(&w) {
        return Err(ArimaError::ConstantData);
    }
    let center = augur_stats::mean(&w);
    let scale = augur_stats::sd(&w);
    // A drift is the mean of the differenced series and is not optimised.
    let drift = constant && order.d() + order.seasonal_d() > 0;
    let layout = Layout::new(&order, constant && !drift, center, scale);
    let w = if drift {
        w.iter().map(|x| x - center).collect()
    } else {
        w
    };
    let state_dim = order.ar_degree().max(order.ma_degree() + 1);
    let min_len = (layout.n_arma() + usize::from(constant) + 2).max(state_dim + 1);
    if w.len() < min_len {
        return Err(ArimaError::InsufficientData {
            n: w.len(),
            min: min_len,
        });
    }

    // 3. Optimise
    let coefficients = if layout.n_arma() == 0 {
        // White noise around a fixed mean: closed form.
        Coefficients {
            ar: vec![],
            ma: vec![],
            seasonal_ar: vec![],
            seasonal_ma: vec![],
            mean: if constant && !drift { center } else { 0.0 },
        }
    } else {
        let start = warm
            .and_then(|m| layout.encode(&m.coefficients()))
            .unwrap_or_else(|| vec![0.0; layout.dim()]);
        let best = optimise(&layout, &order, &w, &start, options)?;
        layout.decode(&best)
    };
    let offset = if drift { center } else { 0.0 };
    let coefficients = Coefficients {
        mean: coefficients.mean + offset,
        ..coefficients
    };

    // 4. Extract final fit
    let phi = poly::expand_ar(&coefficients.ar, &coefficients.seasonal_ar, order.period());
    let theta = poly::expand_ma(&coefficients.ma, &coefficients.seasonal_ma, order.period());
    let ss = StateSpace::new(&phi, &theta);
    let z: Vec<f64> = w.iter().map(|x| x + offset - coefficients.mean).collect();
    let output = kalman::kalman_full(&ss, &z)?;
    if !output.log_likelihood.is_finite() {
        return Err(ArimaError::Singular);
    }

    debug!(
        sigma2 = output.sigma2,
        log_likelihood = output.log_likelihood,
        "fit complete"
    );

    Ok(FittedModel::new(
        order,
        coefficients,
        constant,
        output,
        data.len(),
        data[data.len() - span..].to_vec(),
    ))
}

fn optimise(
    layout: &Layout,
    order: &OrderSpec,
    w: &[f64],
    start: &[f64],
    options: &FitOptions,
) -> Result<Vec<f64>, ArimaError> {
    let dim = layout.dim();
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dim + 1);
    simplex.push(start.to_vec());
    for i in 0..dim {
        let mut vertex = start.to_vec();
        vertex[i] += 0.5;
        simplex.push(vertex);
    }

    let cost = SarimaCost {
        layout,
        period: order.period(),
        data: w,
    };

    let solver = NelderMead::new(simplex)
        .with_sd_tolerance(options.tolerance())
        .map_err(|e| ArimaError::InvalidConfig {
            reason: e.to_string(),
        })?;
    let result = Executor::new(cost, solver)
        .configure(|state| state.max_iters(options.max_iters()))
        .run()
        .map_err(|_| ArimaError::NonConvergence {
            iterations: options.max_iters(),
        })?;

    let state = result.state();
    if matches!(
        state.termination_status,
        TerminationStatus::Terminated(TerminationReason::MaxItersReached)
    ) {
        return Err(ArimaError::NonConvergence {
            iterations: state.iter,
        });
    }
    if !state.best_cost.is_finite() || state.best_cost >= f64::MAX {
        return Err(ArimaError::NonStationary);
    }

    state
        .best_param
        .clone()
        .ok_or(ArimaError::NonConvergence {
            iterations: state.iter,
        })
}

/// Cost function for argmin: negative concentrated log-likelihood.
struct SarimaCost<'a> {
    layout: &'a Layout,
    period: usize,
    data: &'a [f64],
}

impl CostFunction for SarimaCost<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, params: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        let c = self.layout.decode(params);
        let phi = poly::expand_ar(&c.ar, &c.seasonal_ar, self.period);
        let theta = poly::expand_ma(&c.ma, &c.seasonal_ma, self.period);
        let ss = StateSpace::new(&phi, &theta);
        let z: Vec<f64> = self.data.iter().map(|x| x - c.mean).collect();

        match kalman::concentrated_loglik(&ss, &z) {
            Ok(loglik) if loglik.is_finite() => Ok(-loglik),
            _ => Ok(f64::MAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    fn ar1(phi: f64, n: usize, seed: u64) -> Vec<f64> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let normal = Normal::new(0.0, 1.0).unwrap();
        let mut data = vec![0.0; n];
        for t in 1..n {
            data[t] = phi * data[t - 1] + normal.sample(&mut rng);
        }
        data
    }

    fn fit(order: OrderSpec, data: &[f64]) -> Result<FittedModel, ArimaError> {
        fit_sarima(order, data, &FitOptions::default(), None)
    }

    #[test]
    fn intercept_resolution() {
        assert!(Intercept::Auto.resolve(0));
        assert!(Intercept::Auto.resolve(1));
        assert!(!Intercept::Auto.resolve(2));
        assert!(Intercept::Include.resolve(2));
        assert!(!Intercept::Exclude.resolve(0));
    }

    #[test]
    fn options_validate() {
        assert!(FitOptions::default().validate().is_ok());
        assert!(FitOptions::default().with_max_iters(0).validate().is_err());
        assert!(FitOptions::default().with_tolerance(-1.0).validate().is_err());
    }

    #[test]
    fn validation_empty() {
        let result = fit(OrderSpec::new(1, 0, 0), &[]);
        assert!(matches!(result, Err(ArimaError::EmptyData)));
    }

    #[test]
    fn validation_non_finite() {
        let result = fit(OrderSpec::new(1, 0, 0), &[1.0, f64::NAN, 3.0]);
        assert!(matches!(result, Err(ArimaError::NonFiniteData)));
    }

    #[test]
    fn validation_constant() {
        let result = fit(OrderSpec::new(1, 0, 0), &[5.0; 8]);
        assert!(matches!(result, Err(ArimaError::ConstantData)));
    }

    #[test]
    fn validation_constant_after_differencing() {
        let data: Vec<f64> = (0..20).map(|t| 2.0 * t as f64).collect();
        let result = fit(OrderSpec::new(1, 1, 0), &data);
        assert!(matches!(result, Err(ArimaError::ConstantData)));
    }

    #[test]
    fn validation_differencing_exceeds_length() {
        let data = [1.0, 2.0, 4.0];
        let result = fit(OrderSpec::new(0, 3, 0), &data);
        assert!(matches!(result, Err(ArimaError::InvalidOrder { .. })));
    }

    #[test]
    fn validation_degenerate_order() {
        let data = [1.0, 2.0, 0.5, 3.0, 2.5];
        let options = FitOptions::default().with_intercept(Intercept::Exclude);
        let result = fit_sarima(OrderSpec::new(0, 0, 0), &data, &options, None);
        assert!(matches!(result, Err(ArimaError::InvalidOrder { .. })));
    }

    #[test]
    fn validation_insufficient() {
        let result = fit(OrderSpec::new(2, 0, 1), &[1.0, 2.0, 0.5, 3.0]);
        assert!(matches!(result, Err(ArimaError::InsufficientData { .. })));
    }

    #[test]
    fn white_noise_mean_only() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let normal = Normal::new(3.0, 1.0).unwrap();
        let data: Vec<f64> = (0..500).map(|_| normal.sample(&mut rng)).collect();
        let m = fit(OrderSpec::new(0, 0, 0), &data).unwrap();
        assert!((m.mean() - 3.0).abs() < 0.2, "mean = {}", m.mean());
        assert!(m.sigma2() > 0.8 && m.sigma2() < 1.2, "sigma2 = {}", m.sigma2());
        assert!(m.has_constant());
    }

    #[test]
    fn drift_is_mean_of_differences() {
        let data: Vec<f64> = (0..60)
            .map(|t| 5.0 + 0.3 * t as f64 + ((t * 13) % 7) as f64 * 0.2)
            .collect();
        let expected = (data[59] - data[0]) / 59.0;
        for order in [OrderSpec::new(0, 1, 0), OrderSpec::new(1, 1, 0), OrderSpec::new(1, 1, 1)] {
            let m = fit(order, &data).unwrap();
            assert!(m.has_constant());
            assert!(
                (m.mean() - expected).abs() < 1e-12,
                "{order}: drift {} vs {expected}",
                m.mean()
            );
        }
    }

    #[test]
    fn ar1_coefficient_recovery() {
        let data = ar1(0.7, 1000, 123);
        let m = fit(OrderSpec::new(1, 0, 0), &data).unwrap();
        assert!(
            (m.ar()[0] - 0.7).abs() < 0.1,
            "AR(1) phi: expected ~0.7, got {}",
            m.ar()[0]
        );
    }

    #[test]
    fn ma1_recovery() {
        let theta = 0.5;
        let mut rng = rand::rngs::StdRng::seed_from_u64(456);
        let normal = Normal::new(0.0, 1.0).unwrap();
        let eps: Vec<f64> = (0..1000).map(|_| normal.sample(&mut rng)).collect();
        let data: Vec<f64> = (0..1000)
            .map(|t| eps[t] + if t > 0 { theta * eps[t - 1] } else { 0.0 })
            .collect();
        let m = fit(OrderSpec::new(0, 0, 1), &data).unwrap();
        assert!(
            (m.ma()[0] - theta).abs() < 0.1,
            "MA(1) theta: expected ~{theta}, got {}",
            m.ma()[0]
        );
    }

    #[test]
    fn warm_start_reaches_same_optimum() {
        let data = ar1(0.5, 400, 9);
        let order = OrderSpec::new(1, 0, 1);
        let cold = fit(order, &data).unwrap();
        let warm = fit_sarima(order, &data, &FitOptions::default(), Some(&cold)).unwrap();
        assert!((warm.log_likelihood() - cold.log_likelihood()).abs() < 1e-3);
    }

    #[test]
    fn tiny_iteration_budget_does_not_converge() {
        let data = ar1(0.5, 200, 3);
        let options = FitOptions::default().with_max_iters(2);
        let result = fit_sarima(OrderSpec::new(2, 0, 1), &data, &options, None);
        assert!(matches!(result, Err(ArimaError::NonConvergence { .. })));
    }
}
