//! Model persistence.
//!
//! A saved model is a JSON envelope:
//!
//! ```text
//! { "format": "augur-arima", "version": 1, "model": { ... } }
//! ```
//!
//! Loading checks the envelope header and the model's internal consistency,
//! so a blob that parses but cannot forecast is reported as corrupt rather
//! than failing later.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ArimaError;
use crate::fit::FittedModel;

const FORMAT: &str = "augur-arima";
const VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    format: &'a str,
    version: u32,
    model: &'a FittedModel,
}

#[derive(Deserialize)]
struct Envelope {
    format: String,
    version: u32,
    model: FittedModel,
}

/// Serialises a fitted model to the JSON envelope.
///
/// # Errors
///
/// [`ArimaError::CorruptData`] if the model holds values JSON cannot carry.
pub fn encode(model: &FittedModel) -> Result<String, ArimaError> {
    model
        .validate()
        .map_err(|reason| ArimaError::CorruptData { reason })?;
    let envelope = EnvelopeRef {
        format: FORMAT,
        version: VERSION,
        model,
    };
    serde_json::to_string_pretty(&envelope).map_err(|e| ArimaError::CorruptData {
        reason: e.to_string(),
    })
}

/// Parses and validates a JSON envelope.
///
/// # Errors
///
/// [`ArimaError::CorruptData`] when the blob does not parse, carries another
/// format or version, or describes an inconsistent model.
pub fn decode(blob: &str) -> Result<FittedModel, ArimaError> {
    let envelope: Envelope = serde_json::from_str(blob).map_err(|e| ArimaError::CorruptData {
        reason: e.to_string(),
    })?;
    if envelope.format != FORMAT {
        return Err(ArimaError::CorruptData {
            reason: format!("unknown format {:?}", envelope.format),
        });
    }
    if envelope.version != VERSION {
        return Err(ArimaError::CorruptData {
            reason: format!("unsupported version {}", envelope.version),
        });
    }
    envelope
        .model
        .validate()
        .map_err(|reason| ArimaError::CorruptData { reason })?;
    Ok(envelope.model)
}

/// Save/load contract for fitted models.
///
/// `save` overwrites whatever is stored under `handle`; `load` returns a fresh
/// [`FittedModel`] that forecasts identically to the one saved.
pub trait ModelStore {
    /// Key type identifying a stored model.
    type Handle: ?Sized;

    /// Stores `model` under `handle`.
    fn save(&mut self, model: &FittedModel, handle: &Self::Handle) -> Result<(), ArimaError>;

    /// Restores the model stored under `handle`.
    ///
    /// # Errors
    ///
    /// [`ArimaError::NotFound`] when nothing is stored under `handle`,
    /// [`ArimaError::CorruptData`] when the stored blob is invalid.
    fn load(&self, handle: &Self::Handle) -> Result<FittedModel, ArimaError>;
}

/// Stores each model as a JSON file; the handle is the file path.
///
/// Missing parent directories are created on save.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileStore;

impl FileStore {
    /// Creates a file store.
    pub fn new() -> Self {
        Self
    }
}

impl ModelStore for FileStore {
    type Handle = Path;

    fn save(&mut self, model: &FittedModel, handle: &Path) -> Result<(), ArimaError> {
        let blob = encode(model)?;
        if let Some(parent) = handle.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(handle, blob)?;
        debug!(path = %handle.display(), order = %model.order(), "model saved");
        Ok(())
    }

    fn load(&self, handle: &Path) -> Result<FittedModel, ArimaError> {
        let blob = fs::read_to_string(handle).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ArimaError::NotFound {
                handle: handle.display().to_string(),
            },
            ErrorKind::InvalidData => ArimaError::CorruptData {
                reason: e.to_string(),
            },
            _ => ArimaError::from(e),
        })?;
        let model = decode(&blob)?;
        debug!(path = %handle.display(), order = %model.order(), "model loaded");
        Ok(model)
    }
}

/// Keeps serialised models in memory, keyed by name.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    blobs: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored models.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Raw blob stored under `key`.
    pub fn blob(&self, key: &str) -> Option<&str> {
        self.blobs.get(key).map(String::as_str)
    }

    /// Stores a raw blob, bypassing serialisation.
    pub fn insert_blob(&mut self, key: impl Into<String>, blob: impl Into<String>) {
        self.blobs.insert(key.into(), blob.into());
    }
}

impl ModelStore for MemoryStore {
    type Handle = str;

    fn save(&mut self, model: &FittedModel, handle: &str) -> Result<(), ArimaError> {
        let blob = encode(model)?;
        self.blobs.insert(handle.to_string(), blob);
        Ok(())
    }

    fn load(&self, handle: &str) -> Result<FittedModel, ArimaError> {
        let blob = self.blobs.get(handle).ok_or_else(|| ArimaError::NotFound {
            handle: handle.to_string(),
        })?;
        decode(blob)
    }
}
