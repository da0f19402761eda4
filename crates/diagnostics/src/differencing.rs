//! Recommended differencing order from repeated ADF tests.

use augur_stats::{difference, is_constant};
use tracing::{debug, warn};

use crate::DiagnosticsError;
use crate::adf::adf_test;

/// Configuration for [`recommended_differencing`].
///
/// # Example
///
/// ```
/// use augur_diagnostics::DifferencingConfig;
///
/// let config = DifferencingConfig::default().with_alpha(0.01).with_max_d(1);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DifferencingConfig {
    alpha: f64,
    max_d: usize,
}

impl Default for DifferencingConfig {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            max_d: 2,
        }
    }
}

impl DifferencingConfig {
    /// Sets the significance level of each ADF test.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the maximum differencing order returned.
    pub fn with_max_d(mut self, max_d: usize) -> Self {
        self.max_d = max_d;
        self
    }

    /// Returns the significance level.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Returns the maximum differencing order.
    pub fn max_d(&self) -> usize {
        self.max_d
    }

    /// Validates this configuration.
    ///
    /// Returns an error if alpha is not strictly between 0 and 1.
    pub fn validate(&self) -> Result<(), DiagnosticsError> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(DiagnosticsError::InvalidConfig {
                reason: format!("alpha must be in (0, 1), got {}", self.alpha),
            });
        }
        Ok(())
    }
}

/// Smallest number of first differences after which the ADF test rejects a
/// unit root, capped at `config.max_d()`.
///
/// A constant series needs no differencing, and differencing stops as soon as
/// it produces a constant series. When a test cannot be carried out (too few
/// observations left, singular regression) the order reached before that test
/// is returned.
///
/// # Errors
///
/// Returns an error for an invalid configuration, an empty series or
/// non-finite values. Test failures on the differenced series are not errors.
#[tracing::instrument(skip_all, fields(n = data.len()))]
pub fn recommended_differencing(
    data: &[f64],
    config: &DifferencingConfig,
) -> Result<usize, DiagnosticsError> {
    config.validate()?;
    if data.is_empty() {
        return Err(DiagnosticsError::EmptyData);
    }
    if data.iter().any(|v| !v.is_finite()) {
        return Err(DiagnosticsError::NonFiniteData);
    }
    if is_constant(data) {
        debug!("constant series, no differencing needed");
        return Ok(0);
    }

    let mut d = 0;
    let mut x = data.to_vec();
    let mut needs_diff = match adf_test(&x) {
        Ok(res) => {
            debug!(d, statistic = res.statistic, p_value = res.p_value, "adf test");
            res.should_difference(config.alpha())
        }
        Err(e) => {
            warn!(error = %e, "adf test failed on the raw series");
            return Ok(0);
        }
    };

    while needs_diff && d < config.max_d() {
        d += 1;
        x = difference(&x, 1);
        if is_constant(&x) {
            debug!(d, "differenced series is constant");
            return Ok(d);
        }
        needs_diff = match adf_test(&x) {
            Ok(res) => {
                debug!(d, statistic = res.statistic, p_value = res.p_value, "adf test");
                res.should_difference(config.alpha())
            }
            Err(e) => {
                warn!(d, error = %e, "adf test failed, keeping previous order");
                return Ok(d - 1);
            }
        };
    }

    debug!(d, "recommended differencing order");
    Ok(d)
}
