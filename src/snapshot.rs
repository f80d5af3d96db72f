use std::fs;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::MapDocument;
use crate::util::time;

/// Errors that can occur during snapshot persistence operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize snapshot: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to write snapshot: {0}")]
    WriteError(#[from] std::io::Error),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// A serializable snapshot of a whole map document, used for autosave
/// and crash recovery. Shape and token state round-trips; histories do
/// not (a restored map starts with clean undo stacks).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapSnapshot {
    /// The map state
    pub document: MapDocument,
    /// Timestamp of when the snapshot was taken
    pub timestamp: u64,
    /// Version of the crate that wrote the snapshot
    pub version: String,
}

impl MapSnapshot {
    /// Create a new snapshot of the given document
    pub fn new(document: &MapDocument) -> Self {
        Self {
            document: document.clone(),
            timestamp: time::timestamp_secs(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn to_json(&self) -> PersistenceResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> PersistenceResult<Self> {
        let mut snapshot: Self = serde_json::from_str(json)?;
        if snapshot.version != env!("CARGO_PKG_VERSION") {
            warn!(
                "snapshot written by version {}, current is {}",
                snapshot.version,
                env!("CARGO_PKG_VERSION")
            );
        }
        // Shapes come back with fresh runtime ids; rebuild everything
        // derived from them.
        snapshot.document.background_lines_mut().rebuild_partitions();
        snapshot.document.annotation_lines_mut().rebuild_partitions();
        snapshot.document.fog_of_war_mut().rebuild_partitions();
        Ok(snapshot)
    }

    /// Save the snapshot to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> PersistenceResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load a snapshot from a file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}
