//! Value and report writers.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::IoError;

fn ensure_parent(path: &Path) -> Result<(), IoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| IoError::io(parent, e))?;
    }
    Ok(())
}

/// Write one value per line, using the shortest representation that reads
/// back to the same `f64`.
///
/// # Errors
///
/// [`IoError::Io`] when the file or its parent directories cannot be written.
pub fn write_values(path: &Path, values: &[f64]) -> Result<(), IoError> {
    let mut text = String::with_capacity(values.len() * 12);
    for v in values {
        // Writing to a String cannot fail.
        let _ = writeln!(text, "{v}");
    }
    ensure_parent(path)?;
    fs::write(path, text).map_err(|e| IoError::io(path, e))?;
    info!(path = %path.display(), n = values.len(), "wrote values");
    Ok(())
}

/// Write `value` as pretty-printed JSON.
///
/// # Errors
///
/// [`IoError::Serialization`] if `value` cannot be serialized,
/// [`IoError::Io`] when the file cannot be written.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), IoError> {
    let mut text = serde_json::to_string_pretty(value).map_err(|e| IoError::Serialization {
        reason: e.to_string(),
    })?;
    text.push('\n');
    ensure_parent(path)?;
    fs::write(path, text).map_err(|e| IoError::io(path, e))?;
    info!(path = %path.display(), "wrote report");
    Ok(())
}
