use std::path::PathBuf;

use serde::Deserialize;

/// Top-level augur configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AugurConfig {
    /// File locations and input format.
    #[serde(default)]
    pub io: IoToml,

    /// Order search settings.
    #[serde(default)]
    pub search: SearchToml,

    /// Train/test split and forecast settings.
    #[serde(default)]
    pub train: TrainToml,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    pub input: Option<PathBuf>,
    pub model: Option<PathBuf>,
    pub result: Option<PathBuf>,
    /// Header name of the value column; defaults to the last column.
    #[serde(default)]
    pub column: Option<String>,
    /// Single-character field separator; detected when unset.
    #[serde(default)]
    pub delimiter: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchToml {
    #[serde(default)]
    pub p_start: usize,
    #[serde(default = "default_max_order")]
    pub p_max: usize,
    #[serde(default)]
    pub q_start: usize,
    #[serde(default = "default_max_order")]
    pub q_max: usize,
    /// Differencing order; chosen by the ADF test when unset.
    #[serde(default)]
    pub d: Option<usize>,
    #[serde(default)]
    pub seasonal: bool,
    #[serde(default = "default_period")]
    pub period: usize,
    /// Seasonal differencing order; follows `d` when unset.
    #[serde(default)]
    pub seasonal_d: Option<usize>,
    #[serde(default = "default_seasonal_max")]
    pub seasonal_p_max: usize,
    #[serde(default = "default_seasonal_max")]
    pub seasonal_q_max: usize,
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    #[serde(default = "default_true")]
    pub stepwise: bool,
    #[serde(default = "default_intercept")]
    pub intercept: String,
}

impl Default for SearchToml {
    fn default() -> Self {
        Self {
            p_start: 0,
            p_max: default_max_order(),
            q_start: 0,
            q_max: default_max_order(),
            d: None,
            seasonal: false,
            period: default_period(),
            seasonal_d: None,
            seasonal_p_max: default_seasonal_max(),
            seasonal_q_max: default_seasonal_max(),
            max_steps: default_max_steps(),
            stepwise: true,
            intercept: default_intercept(),
        }
    }
}

fn default_max_order() -> usize {
    3
}
fn default_period() -> usize {
    12
}
fn default_seasonal_max() -> usize {
    2
}
fn default_max_steps() -> usize {
    100
}
fn default_true() -> bool {
    true
}
fn default_intercept() -> String {
    "auto".to_string()
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrainToml {
    /// Trailing observations held out for scoring.
    #[serde(default)]
    pub held_out: usize,
    /// Significance level of forecast intervals; none when unset.
    #[serde(default)]
    pub alpha: Option<f64>,
}
