//! # augur-io
//!
//! Read univariate series from plain-text interchange files and write
//! forecasts and reports back out. Bridges files into the validated
//! [`augur_series::Series`] used by the pipeline.

mod error;
mod reader;
mod writer;

pub use error::IoError;
pub use reader::{Column, ReaderConfig, parse_series, read_series};
pub use writer::{write_json, write_values};
