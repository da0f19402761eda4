//! Error types for augur-series.

/// Error type for all fallible operations in the augur-series crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    /// Returned when a series has no observations.
    #[error("series is empty")]
    Empty,

    /// Returned when an observation is NaN or infinite.
    #[error("non-finite observation at index {index}")]
    NonFinite {
        /// Zero-based position of the offending observation.
        index: usize,
    },

    /// Returned when a series is too short for the requested operation.
    #[error("insufficient data: got {n} observations, need at least {min}")]
    InsufficientData {
        /// Number of observations available.
        n: usize,
        /// Minimum number of observations required.
        min: usize,
    },
}
