//! JSON key-value file holding the saved collections.
//!
//! The file is a JSON object with one entry per collection. Each entry is
//! decoded on its own; a missing or corrupt entry yields an empty collection
//! instead of failing the whole load. Entries may be stored either as arrays
//! or as JSON-encoded strings of arrays.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::library::Library;

pub const SAVED_COLORS_KEY: &str = "savedColors";
pub const SAVED_GRADIENTS_KEY: &str = "savedGradients";
pub const SAVED_PALETTES_KEY: &str = "savedPalettes";

/// Error type for writing the store.
#[derive(Debug)]
pub enum PersistError {
    /// IO error writing the file
    Io(std::io::Error),
    /// JSON serialization error
    Serialize(serde_json::Error),
}

impl std::fmt::Display for PersistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Serialize(e) => write!(f, "JSON serialize error: {}", e),
        }
    }
}

impl std::error::Error for PersistError {}

impl From<std::io::Error> for PersistError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialize(e)
    }
}

/// File-backed store for a [`Library`].
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all collections. Never fails; problems are logged.
    pub fn load(&self) -> Library {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No store file yet");
                return Library::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Unreadable store, starting empty");
                return Library::new();
            }
        };
        parse_library(&content)
    }

    /// Write all collections.
    pub fn save(&self, library: &Library) -> Result<(), PersistError> {
        let root = json!({
            SAVED_COLORS_KEY: library.colors,
            SAVED_GRADIENTS_KEY: library.gradients,
            SAVED_PALETTES_KEY: library.palettes,
        });
        let content = serde_json::to_string_pretty(&root)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, content)?;
        debug!(path = %self.path.display(), "Store written");
        Ok(())
    }
}

/// Decode store content, falling back to empty collections per key.
pub fn parse_library(content: &str) -> Library {
    let root: Map<String, Value> = match serde_json::from_str(content) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            warn!("Store root is not an object, starting empty");
            return Library::new();
        }
        Err(e) => {
            warn!(error = %e, "Store is not valid JSON, starting empty");
            return Library::new();
        }
    };

    Library {
        colors: decode_entry(&root, SAVED_COLORS_KEY),
        gradients: decode_entry(&root, SAVED_GRADIENTS_KEY),
        palettes: decode_entry(&root, SAVED_PALETTES_KEY),
    }
}

fn decode_entry<T: DeserializeOwned>(root: &Map<String, Value>, key: &str) -> Vec<T> {
    let Some(value) = root.get(key) else {
        return Vec::new();
    };

    let decoded = match value {
        Value::String(encoded) => serde_json::from_str(encoded),
        other => serde_json::from_value(other.clone()),
    };

    decoded.unwrap_or_else(|e| {
        warn!(key, error = %e, "Corrupt store entry, using empty collection");
        Vec::new()
    })
}
