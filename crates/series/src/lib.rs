//! Validated univariate time series and train/test splits.
//!
//! A [`Series`] is an ordered, immutable sequence of finite observations.
//! Construction is the only place validation happens; every other crate in
//! the workspace can then accept `series.values()` as a trusted slice.
//!
//! # Example
//!
//! ```
//! use augur_series::Series;
//!
//! let series = Series::new(vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
//! let split = series.split_holdout(2).unwrap();
//! assert_eq!(split.train().values(), &[1.0, 2.0, 3.0]);
//! assert_eq!(split.test(), &[4.0, 5.0]);
//! ```

mod error;
mod series;

pub use error::SeriesError;
pub use series::{Series, Split};
