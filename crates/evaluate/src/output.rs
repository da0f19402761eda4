//! JSON report structures written by the pipeline commands.

use augur_arima::{CandidateOutcome, FittedModel, ForecastResult, OrderSpec};
use augur_diagnostics::Correlogram;
use serde::Serialize;

use crate::error::EvaluateError;
use crate::scoring::Accuracy;

/// Fitted model parameters as reported to the user.
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    /// Order in `ARIMA(p,d,q)(P,D,Q)[m]` notation.
    pub label: String,
    pub order: OrderSpec,
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    pub seasonal_ar: Vec<f64>,
    pub seasonal_ma: Vec<f64>,
    pub mean: f64,
    pub sigma2: f64,
    pub log_likelihood: f64,
    pub aic: f64,
    pub nobs: usize,
}

impl From<&FittedModel> for ModelSummary {
    fn from(model: &FittedModel) -> Self {
        Self {
            label: model.order().to_string(),
            order: model.order(),
            ar: model.ar().to_vec(),
            ma: model.ma().to_vec(),
            seasonal_ar: model.seasonal_ar().to_vec(),
            seasonal_ma: model.seasonal_ma().to_vec(),
            mean: model.mean(),
            sigma2: model.sigma2(),
            log_likelihood: model.log_likelihood(),
            aic: model.aic(),
            nobs: model.nobs(),
        }
    }
}

/// Where the differencing order used by a search came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DifferencingSource {
    /// Set explicitly in the configuration.
    Config,
    /// Chosen by the stationarity test.
    Diagnostics,
}

/// Output of `augur train`.
#[derive(Debug, Clone, Serialize)]
pub struct TrainReport {
    pub model: ModelSummary,
    pub d: usize,
    pub d_source: DifferencingSource,
    pub n_train: usize,
    pub n_test: usize,
    /// Forecast over the held-out horizon (empty when nothing was held out).
    pub forecast: Vec<f64>,
    pub test: Vec<f64>,
    pub accuracy: Option<Accuracy>,
    /// Every order the search evaluated.
    pub search: Vec<CandidateOutcome>,
    pub model_path: String,
}

/// Output of `augur predict`.
#[derive(Debug, Clone, Serialize)]
pub struct PredictReport {
    pub model: ModelSummary,
    pub periods: usize,
    pub forecast: ForecastResult,
}

/// Output of `augur analyse`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub n_obs: usize,
    pub recommended_d: usize,
    /// Significance level of each ADF test behind `recommended_d`.
    pub adf_alpha: f64,
    /// Significance level of the correlogram band.
    pub alpha: f64,
    /// Half-width of the `1 - alpha` white-noise band around zero.
    pub significance_bound: f64,
    pub correlogram: Correlogram,
}

/// Serialize a report to a pretty-printed JSON string.
pub fn to_json<T: Serialize>(report: &T) -> Result<String, EvaluateError> {
    serde_json::to_string_pretty(report).map_err(|e| EvaluateError::Serialization {
        reason: e.to_string(),
    })
}
