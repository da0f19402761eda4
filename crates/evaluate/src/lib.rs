//! Forecast accuracy scoring and the JSON reports written by the pipeline.
//!
//! # Example
//!
//! ```
//! use augur_evaluate::{EvaluateError, score};
//!
//! assert_eq!(score(&[1.0, 2.0], &[1.0, 2.0]).unwrap(), 0.0);
//! assert!(matches!(
//!     score(&[1.0], &[1.0, 2.0]),
//!     Err(EvaluateError::LengthMismatch { .. })
//! ));
//! ```

mod error;
mod output;
mod scoring;

pub use error::EvaluateError;
pub use output::{
    AnalysisReport, DifferencingSource, ModelSummary, PredictReport, TrainReport, to_json,
};
pub use scoring::{Accuracy, mae, rmse, score};
