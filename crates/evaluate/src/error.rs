//! Evaluation error types.

/// Errors that can occur during evaluation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluateError {
    /// Forecast and test series differ in length.
    #[error("length mismatch: forecast has {forecast} values, test has {test}")]
    LengthMismatch { forecast: usize, test: usize },

    /// A forecast or test value is NaN or infinite.
    #[error("non-finite value at index {index}")]
    NonFinite { index: usize },

    /// JSON serialization failed.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}
