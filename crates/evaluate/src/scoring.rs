//! Forecast error metrics.

use serde::Serialize;

use crate::error::EvaluateError;

fn check(forecast: &[f64], test: &[f64]) -> Result<(), EvaluateError> {
    if forecast.len() != test.len() {
        return Err(EvaluateError::LengthMismatch {
            forecast: forecast.len(),
            test: test.len(),
        });
    }
    if let Some(index) = forecast
        .iter()
        .zip(test)
        .position(|(f, t)| !f.is_finite() || !t.is_finite())
    {
        return Err(EvaluateError::NonFinite { index });
    }
    Ok(())
}

/// Root-mean-squared error `sqrt(mean((forecast_i - test_i)^2))`.
///
/// Two empty slices score 0.0.
///
/// # Errors
///
/// [`EvaluateError::LengthMismatch`] when the lengths differ,
/// [`EvaluateError::NonFinite`] when either side holds NaN or infinity.
pub fn rmse(forecast: &[f64], test: &[f64]) -> Result<f64, EvaluateError> {
    check(forecast, test)?;
    if forecast.is_empty() {
        return Ok(0.0);
    }
    let sse: f64 = forecast
        .iter()
        .zip(test)
        .map(|(f, t)| (f - t) * (f - t))
        .sum();
    Ok((sse / forecast.len() as f64).sqrt())
}

/// Mean absolute error. Two empty slices score 0.0.
///
/// # Errors
///
/// Same as [`rmse`].
pub fn mae(forecast: &[f64], test: &[f64]) -> Result<f64, EvaluateError> {
    check(forecast, test)?;
    if forecast.is_empty() {
        return Ok(0.0);
    }
    let sae: f64 = forecast.iter().zip(test).map(|(f, t)| (f - t).abs()).sum();
    Ok(sae / forecast.len() as f64)
}

/// The pipeline's score: RMSE of the forecast against held-out data.
///
/// # Errors
///
/// Same as [`rmse`].
pub fn score(forecast: &[f64], test: &[f64]) -> Result<f64, EvaluateError> {
    rmse(forecast, test)
}

/// RMSE and MAE of one forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Accuracy {
    pub rmse: f64,
    pub mae: f64,
    pub n: usize,
}

impl Accuracy {
    /// Scores `forecast` against `test`.
    ///
    /// # Errors
    ///
    /// Same as [`rmse`].
    pub fn compute(forecast: &[f64], test: &[f64]) -> Result<Self, EvaluateError> {
        Ok(Self {
            rmse: rmse(forecast, test)?,
            mae: mae(forecast, test)?,
            n: forecast.len(),
        })
    }
}
