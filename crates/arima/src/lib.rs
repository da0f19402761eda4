//! # augur-arima
//!
//! SARIMA(p,d,q)(P,D,Q)[m] fitting via state-space maximum likelihood
//! (Kalman filter), AIC-driven order search, forecasting with prediction
//! intervals, and model persistence.
//!
//! ## Workflow
//!
//! ```mermaid
//! graph LR
//!     A["OrderSpec::new(p, d, q)"] -->|".fit(&data, &options)?"| B["FittedModel"]
//!     H["select_order(&data, &config)?"] -->|"stepwise / exhaustive"| B
//!     B --> G[".forecast(n, alpha)"]
//!     B --> R[".refit(&data, &options)"]
//!     B -->|"ModelStore::save"| S[("blob")]
//!     S -->|"ModelStore::load"| B
//!     M["ArimaModel"] -->|"Unfitted → Fitted"| B
//! ```
//!
//! **Direct fit** (known orders):
//! ```ignore
//! let fit = OrderSpec::new(1, 1, 1).fit(&data, &FitOptions::default())?;
//! let fc = fit.forecast(12, Some(0.05))?;
//! ```
//!
//! **Stepwise search** (unknown orders):
//! ```ignore
//! let result = select_order(&data, &SearchConfig::default().with_d(1))?;
//! println!("{} AIC = {}", result.order(), result.model().aic());
//! ```
//!
//! ## Mathematical Glossary
//!
//! | Symbol | Accessor | Meaning |
//! |--------|----------|---------|
//! | phi | [`FittedModel::ar()`] | AR coefficients: weights on past observations |
//! | theta | [`FittedModel::ma()`] | MA coefficients: weights on past forecast errors |
//! | Phi, Theta | [`FittedModel::seasonal_ar()`], [`FittedModel::seasonal_ma()`] | Seasonal coefficients at lags that are multiples of `m` |
//! | mu | [`FittedModel::mean()`] | Mean of the differenced series (drift when `d + D = 1`) |
//! | sigma2 | [`FittedModel::sigma2()`] | Innovation (white-noise) variance |
//! | AIC | [`FittedModel::aic()`] | Akaike Information Criterion (lower = better) |

mod error;
mod fit;
mod forecast;
mod model;
mod selection;
mod spec;
mod store;

pub(crate) mod kalman;
pub(crate) mod optimizer;
pub(crate) mod params;
pub(crate) mod poly;
pub(crate) mod state_space;

pub use error::ArimaError;
pub use fit::FittedModel;
pub use forecast::{ConfidenceInterval, ForecastResult};
pub use model::ArimaModel;
pub use optimizer::{FitOptions, Intercept};
pub use selection::{
    CandidateOutcome, SearchConfig, SearchResult, SeasonalSearch, Strategy, select_order,
};
pub use spec::OrderSpec;
pub use store::{FileStore, MemoryStore, ModelStore, decode, encode};
