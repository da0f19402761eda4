//! Fitted SARIMA model results.

use serde::{Deserialize, Serialize};

use crate::error::ArimaError;
use crate::forecast::{self, ForecastResult};
use crate::kalman::KalmanOutput;
use crate::optimizer::{FitOptions, Intercept};
use crate::params::Coefficients;
use crate::spec::OrderSpec;

/// A fitted SARIMA model produced by [`OrderSpec::fit()`] or an order search.
///
/// Contains estimated AR/MA coefficients (seasonal and non-seasonal), the
/// mean of the differenced series, innovation variance, residuals, and the
/// filter state needed to forecast past the end of the data.
///
/// ```mermaid
/// graph LR
///     B["FittedModel"] --> C[".ar() / .ma(): coefficients"]
///     B --> E[".sigma2(): innovation variance"]
///     B --> F[".aic(): Akaike Information Criterion"]
///     B --> G[".forecast(n, alpha)"]
///     B --> H[".refit(&data, &options)"]
/// ```
///
/// MA coefficients follow the `1 + theta_1 B + ...` sign convention.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    order: OrderSpec,
    ar: Vec<f64>,
    ma: Vec<f64>,
    seasonal_ar: Vec<f64>,
    seasonal_ma: Vec<f64>,
    mean: f64,
    constant: bool,
    sigma2: f64,
    log_likelihood: f64,
    residuals: Vec<f64>,
    nobs: usize,
    /// Last `d + D*m` raw observations, oldest first.
    tail: Vec<f64>,
    /// Predicted ARMA state for the first period after the data.
    state: Vec<f64>,
}

impl FittedModel {
    pub(crate) fn new(
        order: OrderSpec,
        coefficients: Coefficients,
        constant: bool,
        output: KalmanOutput,
        nobs: usize,
        tail: Vec<f64>,
    ) -> Self {
        Self {
            order,
            ar: coefficients.ar,
            ma: coefficients.ma,
            seasonal_ar: coefficients.seasonal_ar,
            seasonal_ma: coefficients.seasonal_ma,
            mean: coefficients.mean,
            constant,
            sigma2: output.sigma2,
            log_likelihood: output.log_likelihood,
            residuals: output.residuals,
            nobs,
            tail,
            state: output.state,
        }
    }

    /// Returns the fitted order.
    pub fn order(&self) -> OrderSpec {
        self.order
    }

    /// Returns the non-seasonal AR coefficients.
    pub fn ar(&self) -> &[f64] {
        &self.ar
    }

    /// Returns the non-seasonal MA coefficients.
    pub fn ma(&self) -> &[f64] {
        &self.ma
    }

    /// Returns the seasonal AR coefficients.
    pub fn seasonal_ar(&self) -> &[f64] {
        &self.seasonal_ar
    }

    /// Returns the seasonal MA coefficients.
    pub fn seasonal_ma(&self) -> &[f64] {
        &self.seasonal_ma
    }

    /// Returns the mean of the differenced series (a drift when `d + D = 1`);
    /// zero when the model has no constant.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Returns `true` when a constant term was estimated.
    pub fn has_constant(&self) -> bool {
        self.constant
    }

    /// Returns the innovation variance (`sigma2`).
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Returns the maximised exact log-likelihood.
    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    /// Returns the one-step-ahead prediction errors of the differenced series.
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Returns the number of raw observations the model was fitted to.
    pub fn nobs(&self) -> usize {
        self.nobs
    }

    /// Number of free parameters `p + q + P + Q` plus one for the constant.
    pub fn n_params(&self) -> usize {
        self.order.n_coefficients() + usize::from(self.constant)
    }

    /// Computes the Akaike Information Criterion (AIC) for this fit.
    ///
    /// AIC = 2k - 2 * log_likelihood, where k = [`FittedModel::n_params()`].
    /// Lower AIC indicates a better trade-off between fit and complexity.
    pub fn aic(&self) -> f64 {
        2.0 * self.n_params() as f64 - 2.0 * self.log_likelihood
    }

    /// Forecasts `periods` steps past the end of the data.
    ///
    /// With `alpha = Some(a)`, each step carries a `(1 - a)` normal
    /// prediction interval.
    ///
    /// # Errors
    ///
    /// [`ArimaError::InvalidHorizon`] when `periods == 0`,
    /// [`ArimaError::InvalidAlpha`] unless `0 < a < 1`.
    pub fn forecast(&self, periods: usize, alpha: Option<f64>) -> Result<ForecastResult, ArimaError> {
        forecast::forecast(self, periods, alpha)
    }

    /// Re-estimates the same order on `data`, starting the optimiser from
    /// the current coefficients.
    ///
    /// The constant-term policy of `options` is replaced by the one this
    /// model was fitted with.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`OrderSpec::fit()`].
    pub fn refit(&self, data: &[f64], options: &FitOptions) -> Result<FittedModel, ArimaError> {
        let intercept = if self.constant {
            Intercept::Include
        } else {
            Intercept::Exclude
        };
        let options = options.clone().with_intercept(intercept);
        crate::optimizer::fit_sarima(self.order, data, &options, Some(self))
    }

    pub(crate) fn coefficients(&self) -> Coefficients {
        Coefficients {
            ar: self.ar.clone(),
            ma: self.ma.clone(),
            seasonal_ar: self.seasonal_ar.clone(),
            seasonal_ma: self.seasonal_ma.clone(),
            mean: self.mean,
        }
    }

    pub(crate) fn tail(&self) -> &[f64] {
        &self.tail
    }

    pub(crate) fn state(&self) -> &[f64] {
        &self.state
    }

    /// Checks internal consistency of a model that did not come from a fit
    /// (e.g. one read back from storage).
    pub(crate) fn validate(&self) -> Result<(), String> {
        let o = &self.order;
        o.validate().map_err(|e| e.to_string())?;

        let counts = [
            ("ar", self.ar.len(), o.p()),
            ("ma", self.ma.len(), o.q()),
            ("seasonal_ar", self.seasonal_ar.len(), o.seasonal_p()),
            ("seasonal_ma", self.seasonal_ma.len(), o.seasonal_q()),
            ("tail", self.tail.len(), o.differencing_span()),
            ("state", self.state.len(), o.ar_degree().max(o.ma_degree() + 1)),
        ];
        for (name, got, expected) in counts {
            if got != expected {
                return Err(format!("{name} has {got} values, {o} needs {expected}"));
            }
        }

        let all_finite = [
            &self.ar,
            &self.ma,
            &self.seasonal_ar,
            &self.seasonal_ma,
            &self.residuals,
            &self.tail,
            &self.state,
        ]
        .iter()
        .all(|v| v.iter().all(|x| x.is_finite()));
        if !all_finite || !self.mean.is_finite() || !self.log_likelihood.is_finite() {
            return Err("non-finite value".to_string());
        }
        if !self.sigma2.is_finite() || self.sigma2 <= 0.0 {
            return Err(format!("sigma2 must be positive, got {}", self.sigma2));
        }
        if !self.constant && self.mean != 0.0 {
            return Err("mean is set but the model has no constant".to_string());
        }
        if self.nobs <= self.tail.len() {
            return Err(format!(
                "{} observations cannot support a differencing span of {}",
                self.nobs,
                self.tail.len()
            ));
        }
        Ok(())
    }
}
