//! Forecast model bound to one order, with an explicit fit state.

use crate::error::ArimaError;
use crate::fit::FittedModel;
use crate::forecast::ForecastResult;
use crate::optimizer::{FitOptions, Intercept};
use crate::spec::OrderSpec;

/// A SARIMA model for one [`OrderSpec`].
///
/// Starts `Unfitted`; a successful [`fit`](Self::fit) moves it to `Fitted`,
/// and [`refit`](Self::refit) replaces the coefficients in place. A failed
/// fit or refit leaves the previous state untouched.
///
/// # Example
///
/// ```
/// use augur_arima::{ArimaError, ArimaModel, FitOptions, OrderSpec};
///
/// let mut model = ArimaModel::new(OrderSpec::new(1, 0, 0), FitOptions::default());
/// assert!(matches!(model.forecast(3, None), Err(ArimaError::ModelNotFitted)));
///
/// let data: Vec<f64> = (0..60).map(|i| ((i * 37) % 11) as f64).collect();
/// model.fit(&data).unwrap();
/// assert_eq!(model.forecast(3, None).unwrap().len(), 3);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ArimaModel {
    order: OrderSpec,
    options: FitOptions,
    fitted: Option<FittedModel>,
}

impl ArimaModel {
    /// Creates an unfitted model.
    pub fn new(order: OrderSpec, options: FitOptions) -> Self {
        Self {
            order,
            options,
            fitted: None,
        }
    }

    /// Wraps an existing fit (from a search or a store) as a fitted model.
    ///
    /// The intercept policy is pinned to the one the fit used, so later
    /// refits estimate the same parameter set.
    pub fn from_fitted(fitted: FittedModel) -> Self {
        let intercept = if fitted.has_constant() {
            Intercept::Include
        } else {
            Intercept::Exclude
        };
        Self {
            order: fitted.order(),
            options: FitOptions::default().with_intercept(intercept),
            fitted: Some(fitted),
        }
    }

    /// Replaces the fit options used by later fits.
    pub fn with_options(mut self, options: FitOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the model order.
    pub fn order(&self) -> OrderSpec {
        self.order
    }

    /// Returns the fit options.
    pub fn options(&self) -> &FitOptions {
        &self.options
    }

    /// `true` once a fit has succeeded.
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Returns the current fit.
    ///
    /// # Errors
    ///
    /// [`ArimaError::ModelNotFitted`] before the first successful fit.
    pub fn fitted(&self) -> Result<&FittedModel, ArimaError> {
        self.fitted.as_ref().ok_or(ArimaError::ModelNotFitted)
    }

    /// Consumes the model and returns its fit.
    ///
    /// # Errors
    ///
    /// [`ArimaError::ModelNotFitted`] before the first successful fit.
    pub fn into_fitted(self) -> Result<FittedModel, ArimaError> {
        self.fitted.ok_or(ArimaError::ModelNotFitted)
    }

    /// Estimates coefficients from `data` with a cold start.
    ///
    /// # Errors
    ///
    /// Any error from [`OrderSpec::fit()`]; the model keeps its previous state.
    pub fn fit(&mut self, data: &[f64]) -> Result<&FittedModel, ArimaError> {
        let fitted = self.order.fit(data, &self.options)?;
        Ok(&*self.fitted.insert(fitted))
    }

    /// Re-estimates coefficients from new or extended `data`, starting from
    /// the current ones.
    ///
    /// # Errors
    ///
    /// [`ArimaError::ModelNotFitted`] when unfitted, otherwise any error from
    /// [`FittedModel::refit()`]; the model keeps its previous state.
    pub fn refit(&mut self, data: &[f64]) -> Result<&FittedModel, ArimaError> {
        let fitted = self.fitted()?.refit(data, &self.options)?;
        Ok(&*self.fitted.insert(fitted))
    }

    /// Forecasts `periods` steps ahead of the last fitted observation.
    ///
    /// # Errors
    ///
    /// [`ArimaError::ModelNotFitted`] when unfitted, otherwise any error from
    /// [`FittedModel::forecast()`].
    pub fn forecast(&self, periods: usize, alpha: Option<f64>) -> Result<ForecastResult, ArimaError> {
        self.fitted()?.forecast(periods, alpha)
    }
}
