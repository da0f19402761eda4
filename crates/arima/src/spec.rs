//! SARIMA order specification (unfitted).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ArimaError;
use crate::fit::FittedModel;
use crate::optimizer::FitOptions;

/// An unfitted SARIMA(p,d,q)(P,D,Q)[m] order.
///
/// A period `m` of 0 or 1 means non-seasonal; the seasonal orders must then
/// be zero. Create an order with [`OrderSpec::new()`], optionally add a
/// seasonal part with [`OrderSpec::with_seasonal()`], then call
/// [`OrderSpec::fit()`] to obtain a [`FittedModel`].
///
/// ```mermaid
/// graph LR
///     A["OrderSpec::new(p, d, q)"] -->|".with_seasonal(P, D, Q, m)"| A
///     A -->|".fit(&data, &options)?"| B["FittedModel"]
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderSpec {
    p: usize,
    d: usize,
    q: usize,
    seasonal_p: usize,
    seasonal_d: usize,
    seasonal_q: usize,
    period: usize,
}

impl OrderSpec {
    /// Creates a non-seasonal ARIMA(p,d,q) order.
    ///
    /// # Example
    ///
    /// ```
    /// use augur_arima::OrderSpec;
    ///
    /// let order = OrderSpec::new(2, 1, 1);
    /// assert_eq!(order.p(), 2);
    /// assert_eq!(order.to_string(), "ARIMA(2,1,1)");
    /// ```
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self {
            p,
            d,
            q,
            ..Self::default()
        }
    }

    /// Adds a seasonal (P,D,Q)[m] part.
    pub fn with_seasonal(mut self, p: usize, d: usize, q: usize, period: usize) -> Self {
        self.seasonal_p = p;
        self.seasonal_d = d;
        self.seasonal_q = q;
        self.period = period;
        self
    }

    /// Returns a copy with different ARMA orders, keeping differencing and
    /// period.
    pub(crate) fn with_arma(self, p: usize, q: usize, seasonal_p: usize, seasonal_q: usize) -> Self {
        Self {
            p,
            q,
            seasonal_p,
            seasonal_q,
            ..self
        }
    }

    /// Non-seasonal AR order.
    pub fn p(&self) -> usize {
        self.p
    }

    /// Non-seasonal differencing order.
    pub fn d(&self) -> usize {
        self.d
    }

    /// Non-seasonal MA order.
    pub fn q(&self) -> usize {
        self.q
    }

    /// Seasonal AR order (P).
    pub fn seasonal_p(&self) -> usize {
        self.seasonal_p
    }

    /// Seasonal differencing order (D).
    pub fn seasonal_d(&self) -> usize {
        self.seasonal_d
    }

    /// Seasonal MA order (Q).
    pub fn seasonal_q(&self) -> usize {
        self.seasonal_q
    }

    /// Seasonal period (m); 0 or 1 when non-seasonal.
    pub fn period(&self) -> usize {
        self.period
    }

    /// `true` when the period is at least 2.
    pub fn is_seasonal(&self) -> bool {
        self.period >= 2
    }

    /// Number of estimated ARMA coefficients, `p + q + P + Q`.
    pub fn n_coefficients(&self) -> usize {
        self.p + self.q + self.seasonal_p + self.seasonal_q
    }

    /// Observations lost to differencing, `d + D*m`.
    pub fn differencing_span(&self) -> usize {
        self.d + self.seasonal_d * self.period
    }

    /// Degree of the expanded AR polynomial, `p + P*m`.
    pub fn ar_degree(&self) -> usize {
        self.p + self.seasonal_p * self.period
    }

    /// Degree of the expanded MA polynomial, `q + Q*m`.
    pub fn ma_degree(&self) -> usize {
        self.q + self.seasonal_q * self.period
    }

    /// Checks that seasonal orders are only used with a period of at least 2.
    pub fn validate(&self) -> Result<(), ArimaError> {
        let seasonal_terms = self.seasonal_p + self.seasonal_d + self.seasonal_q;
        if !self.is_seasonal() && seasonal_terms > 0 {
            return Err(ArimaError::InvalidOrder {
                reason: format!(
                    "seasonal orders ({},{},{}) need a period >= 2, got {}",
                    self.seasonal_p, self.seasonal_d, self.seasonal_q, self.period
                ),
            });
        }
        Ok(())
    }

    /// Fits this order to `data` by exact maximum likelihood.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`ArimaError::EmptyData`] | `data` is empty |
    /// | [`ArimaError::NonFiniteData`] | any element is NaN or infinite |
    /// | [`ArimaError::InvalidOrder`] | differencing consumes the series, or the model has no terms and no constant |
    /// | [`ArimaError::ConstantData`] | the (differenced) data is constant |
    /// | [`ArimaError::InsufficientData`] | too few differenced observations for the parameter count |
    /// | [`ArimaError::NonStationary`] / [`ArimaError::Singular`] | numerical breakdown at the optimum |
    /// | [`ArimaError::NonConvergence`] | optimiser hit `max_iters` |
    pub fn fit(&self, data: &[f64], options: &FitOptions) -> Result<FittedModel, ArimaError> {
        crate::optimizer::fit_sarima(*self, data, options, None)
    }
}

impl fmt::Display for OrderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)?;
        if self.is_seasonal() {
            write!(
                f,
                "({},{},{})[{}]",
                self.seasonal_p, self.seasonal_d, self.seasonal_q, self.period
            )?;
        }
        Ok(())
    }
}
