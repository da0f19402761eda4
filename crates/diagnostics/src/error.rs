//! Error types for augur-diagnostics.

/// Error type for all fallible operations in the augur-diagnostics crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DiagnosticsError {
    /// Returned when the input series is empty.
    #[error("input data is empty")]
    EmptyData,

    /// Returned when the input series contains NaN or infinite values.
    #[error("input data contains non-finite values")]
    NonFiniteData,

    /// Returned when the series is too short for the requested lags and
    /// differencing.
    #[error("insufficient data: got {n} observations, need at least {min}")]
    InsufficientData {
        /// Number of observations provided.
        n: usize,
        /// Minimum number of observations required.
        min: usize,
    },

    /// Returned when the (differenced) series has zero variance, so
    /// correlations are undefined.
    #[error("input data is constant (zero variance)")]
    ConstantData,

    /// Returned when the test regression cannot be solved.
    #[error("singular test regression")]
    SingularRegression,

    /// Returned when a configuration value is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the invalid setting.
        reason: String,
    },
}
