//! The [`Series`] and [`Split`] types.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::SeriesError;

/// An ordered, non-empty sequence of finite observations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Series {
    values: Vec<f64>,
}

impl Series {
    /// Builds a series from raw observations.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::Empty`] for an empty input and
    /// [`SeriesError::NonFinite`] for the first NaN or infinite value.
    pub fn new(values: Vec<f64>) -> Result<Self, SeriesError> {
        if values.is_empty() {
            return Err(SeriesError::Empty);
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(SeriesError::NonFinite { index });
        }
        Ok(Self { values })
    }

    /// Builds a series, replacing missing (NaN) observations with the
    /// previous observation.
    ///
    /// Leading missing values have nothing to carry forward and are dropped.
    /// Infinite values are still rejected.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::Empty`] when no observation is present and
    /// [`SeriesError::NonFinite`] for an infinite value (index into the input).
    pub fn forward_filled(values: &[f64]) -> Result<Self, SeriesError> {
        let mut out = Vec::with_capacity(values.len());
        let mut last: Option<f64> = None;
        let mut filled = 0usize;
        let mut dropped = 0usize;

        for (index, &v) in values.iter().enumerate() {
            if v.is_nan() {
                match last {
                    Some(prev) => {
                        out.push(prev);
                        filled += 1;
                    }
                    None => dropped += 1,
                }
                continue;
            }
            if v.is_infinite() {
                return Err(SeriesError::NonFinite { index });
            }
            out.push(v);
            last = Some(v);
        }

        if filled > 0 || dropped > 0 {
            debug!(filled, dropped, "forward-filled missing observations");
        }
        Self::new(out)
    }

    /// Observations as a slice.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consumes the series and returns the observations.
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Fails unless the series has at least `min` observations.
    pub fn require_len(&self, min: usize) -> Result<(), SeriesError> {
        if self.len() < min {
            return Err(SeriesError::InsufficientData { n: self.len(), min });
        }
        Ok(())
    }

    /// Fails unless the series covers at least two full seasonal cycles.
    pub fn require_seasonal(&self, period: usize) -> Result<(), SeriesError> {
        self.require_len(2 * period)
    }

    /// Splits off the trailing `n_test` observations as the test set.
    ///
    /// `n_test == 0` produces an empty test set (pure-forecast mode).
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::InsufficientData`] when no training observation
    /// would remain.
    pub fn split_holdout(&self, n_test: usize) -> Result<Split, SeriesError> {
        if n_test >= self.len() {
            return Err(SeriesError::InsufficientData {
                n: self.len(),
                min: n_test + 1,
            });
        }
        self.split_at(self.len() - n_test)
    }

    /// Splits at `train_len`: the first `train_len` observations are train,
    /// the remainder test.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::Empty`] when `train_len == 0` and
    /// [`SeriesError::InsufficientData`] when `train_len > len`.
    pub fn split_at(&self, train_len: usize) -> Result<Split, SeriesError> {
        if train_len == 0 {
            return Err(SeriesError::Empty);
        }
        if train_len > self.len() {
            return Err(SeriesError::InsufficientData {
                n: self.len(),
                min: train_len,
            });
        }
        let (train, test) = self.values.split_at(train_len);
        Ok(Split {
            train: Series {
                values: train.to_vec(),
            },
            test: test.to_vec(),
        })
    }
}

impl TryFrom<Vec<f64>> for Series {
    type Error = SeriesError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Series::new(values)
    }
}

impl From<Series> for Vec<f64> {
    fn from(series: Series) -> Self {
        series.values
    }
}

impl AsRef<[f64]> for Series {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

/// A training prefix and a (possibly empty) test suffix of one series.
#[derive(Clone, Debug, PartialEq)]
pub struct Split {
    train: Series,
    test: Vec<f64>,
}

impl Split {
    /// Training prefix; never empty.
    pub fn train(&self) -> &Series {
        &self.train
    }

    /// Held-out suffix; empty in pure-forecast mode.
    pub fn test(&self) -> &[f64] {
        &self.test
    }

    /// Number of held-out observations.
    pub fn horizon(&self) -> usize {
        self.test.len()
    }

    /// Consumes the split into `(train, test)`.
    pub fn into_parts(self) -> (Series, Vec<f64>) {
        (self.train, self.test)
    }
}
