//! Point forecasts and prediction intervals.
//!
//! The ARMA part is projected forward from the filter's final predicted
//! state, the mean is added back, and the result is integrated through
//! `(1 - B)^d (1 - B^m)^D` starting from the last raw observations.
//! Interval half-widths use the psi-weights of the integrated model:
//!
//! ```text
//! Var(h) = sigma2 * sum_{j<h} psi_j^2
//! ```

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::ArimaError;
use crate::fit::FittedModel;
use crate::poly;
use crate::state_space::StateSpace;

/// Lower and upper bound of one prediction interval.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    /// Lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
}

/// Forecast values, optionally paired with prediction intervals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alpha: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    intervals: Option<Vec<ConfidenceInterval>>,
}

impl ForecastResult {
    /// Point forecasts, one per period.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Prediction intervals, when requested.
    pub fn intervals(&self) -> Option<&[ConfidenceInterval]> {
        self.intervals.as_deref()
    }

    /// Significance level of the intervals.
    pub fn alpha(&self) -> Option<f64> {
        self.alpha
    }

    /// Forecast horizon.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` when the horizon is zero (never produced by a model).
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consumes the result and returns the point forecasts.
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

pub(crate) fn forecast(
    model: &FittedModel,
    periods: usize,
    alpha: Option<f64>,
) -> Result<ForecastResult, ArimaError> {
    if periods == 0 {
        return Err(ArimaError::InvalidHorizon { periods });
    }
    if let Some(a) = alpha
        && !(a > 0.0 && a < 1.0)
    {
        return Err(ArimaError::InvalidAlpha { alpha: a });
    }

    let order = model.order();
    let phi = poly::expand_ar(model.ar(), model.seasonal_ar(), order.period());
    let theta = poly::expand_ma(model.ma(), model.seasonal_ma(), order.period());
    let ss = StateSpace::new(&phi, &theta);

    let mut a = Array1::from(model.state().to_vec());
    let mut w = Vec::with_capacity(periods);
    for _ in 0..periods {
        w.push(model.mean() + a[0]);
        a = ss.transition(&a);
    }

    let delta = poly::differencing(order.d(), order.seasonal_d(), order.period());
    let values = poly::integrate(model.tail(), &w, &delta);

    let intervals = match alpha {
        Some(a) => {
            let normal = Normal::new(0.0, 1.0).map_err(|e| ArimaError::InvalidConfig {
                reason: e.to_string(),
            })?;
            let z = normal.inverse_cdf(1.0 - a / 2.0);
            let phi_int = poly::integrate_ar(&phi, &delta);
            let psi = poly::psi_weights(&phi_int, &theta, periods);
            let mut cum = 0.0;
            let bounds = values
                .iter()
                .zip(&psi)
                .map(|(&y, &p)| {
                    cum += p * p;
                    let half = z * (model.sigma2() * cum).sqrt();
                    ConfidenceInterval {
                        lower: y - half,
                        upper: y + half,
                    }
                })
                .collect();
            Some(bounds)
        }
        None => None,
    };

    Ok(ForecastResult {
        values,
        alpha,
        intervals,
    })
}
