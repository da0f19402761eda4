//! Error types for augur-io.

use std::path::PathBuf;

use augur_series::SeriesError;

/// Error type for all fallible operations in the augur-io crate.
///
/// Covers missing files, filesystem failures, malformed series text,
/// series validation, and report serialization.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps a filesystem error while reading or writing `path`.
    #[error("i/o error on {}: {reason}", path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Returned when a line of a series file cannot be interpreted.
    #[error("parse error on line {line}: {reason}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// Returned when the parsed values do not form a valid series.
    #[error("series error: {0}")]
    Series(#[from] SeriesError),

    /// Returned when a report cannot be serialized.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serializer failure.
        reason: String,
    },

    /// Returned when a reader configuration is inconsistent.
    #[error("invalid reader configuration: {reason}")]
    InvalidConfig {
        /// Description of the invalid setting.
        reason: String,
    },
}

impl IoError {
    pub(crate) fn io(path: &std::path::Path, e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            return IoError::FileNotFound {
                path: path.to_path_buf(),
            };
        }
        IoError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    }
}
