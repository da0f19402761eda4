//! Error types for the augur-arima crate.

/// Error type for all fallible operations in the augur-arima crate.
///
/// This enum covers input validation, numerical failures during fitting,
/// order-search exhaustion, forecasting misuse, and model persistence.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArimaError {
    /// Returned when the input data is empty.
    #[error("input data is empty")]
    EmptyData,

    /// Returned when the input data has fewer observations than required.
    #[error("insufficient data: got {n} observations, need at least {min}")]
    InsufficientData {
        /// Number of observations provided.
        n: usize,
        /// Minimum number of observations required.
        min: usize,
    },

    /// Returned when the input data contains non-finite values (NaN or infinity).
    #[error("input data contains non-finite values")]
    NonFiniteData,

    /// Returned when the (differenced) data has zero variance.
    #[error("input data is constant (zero variance)")]
    ConstantData,

    /// Returned when an order is degenerate or inconsistent with the data.
    #[error("invalid order: {reason}")]
    InvalidOrder {
        /// Why the order was rejected.
        reason: String,
    },

    /// Returned when a search or fit configuration is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the invalid setting.
        reason: String,
    },

    /// Returned when the AR part has no stationary initial state.
    #[error("fitted model is non-stationary")]
    NonStationary,

    /// Returned when the Kalman filter hits a degenerate prediction variance.
    #[error("singular prediction variance")]
    Singular,

    /// Returned when the optimiser exhausts its iteration budget.
    #[error("optimisation did not converge within {iterations} iterations")]
    NonConvergence {
        /// Iterations performed.
        iterations: u64,
    },

    /// Returned when every candidate of an order search failed to fit.
    #[error("no viable model: all {tried} candidate orders failed to fit")]
    NoViableModel {
        /// Number of candidate orders attempted.
        tried: usize,
    },

    /// Returned when forecasting or refitting a model that was never fitted.
    #[error("model has not been fitted")]
    ModelNotFitted,

    /// Returned when a forecast horizon of zero is requested.
    #[error("forecast horizon must be at least 1, got {periods}")]
    InvalidHorizon {
        /// Requested number of periods.
        periods: usize,
    },

    /// Returned when a confidence level is outside (0, 1).
    #[error("alpha must be in (0, 1), got {alpha}")]
    InvalidAlpha {
        /// Requested significance level.
        alpha: f64,
    },

    /// Returned when a model store has nothing under the given handle.
    #[error("no model stored at '{handle}'")]
    NotFound {
        /// Handle that was looked up.
        handle: String,
    },

    /// Returned when a stored blob cannot be parsed or fails validation.
    #[error("corrupt model data: {reason}")]
    CorruptData {
        /// Description of the problem.
        reason: String,
    },

    /// Wraps a filesystem error raised by a model store.
    #[error("i/o error: {reason}")]
    Io {
        /// Description of the underlying failure.
        reason: String,
    },
}

impl From<std::io::Error> for ArimaError {
    fn from(e: std::io::Error) -> Self {
        ArimaError::Io {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_empty_data() {
        assert_eq!(ArimaError::EmptyData.to_string(), "input data is empty");
    }

    #[test]
    fn error_insufficient_data() {
        let err = ArimaError::InsufficientData { n: 5, min: 10 };
        assert_eq!(
            err.to_string(),
            "insufficient data: got 5 observations, need at least 10"
        );
    }

    #[test]
    fn error_invalid_order() {
        let err = ArimaError::InvalidOrder {
            reason: "differencing span 12 exceeds series length 10".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid order: differencing span 12 exceeds series length 10"
        );
    }

    #[test]
    fn error_non_convergence() {
        let err = ArimaError::NonConvergence { iterations: 2000 };
        assert_eq!(
            err.to_string(),
            "optimisation did not converge within 2000 iterations"
        );
    }

    #[test]
    fn error_no_viable_model() {
        let err = ArimaError::NoViableModel { tried: 16 };
        assert_eq!(
            err.to_string(),
            "no viable model: all 16 candidate orders failed to fit"
        );
    }

    #[test]
    fn error_model_not_fitted() {
        assert_eq!(
            ArimaError::ModelNotFitted.to_string(),
            "model has not been fitted"
        );
    }

    #[test]
    fn error_horizon_and_alpha() {
        assert_eq!(
            ArimaError::InvalidHorizon { periods: 0 }.to_string(),
            "forecast horizon must be at least 1, got 0"
        );
        assert_eq!(
            ArimaError::InvalidAlpha { alpha: 1.5 }.to_string(),
            "alpha must be in (0, 1), got 1.5"
        );
    }

    #[test]
    fn error_persistence() {
        let err = ArimaError::NotFound {
            handle: "models/a.json".to_string(),
        };
        assert_eq!(err.to_string(), "no model stored at 'models/a.json'");
        let err = ArimaError::CorruptData {
            reason: "unknown format".to_string(),
        };
        assert_eq!(err.to_string(), "corrupt model data: unknown format");
    }

    #[test]
    fn from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ArimaError = io.into();
        assert!(matches!(err, ArimaError::Io { .. }));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<ArimaError>();
    }
}
