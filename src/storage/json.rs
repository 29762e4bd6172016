//! JSON file-based key/value storage.
//!
//! Every namespace blob lives in one human-readable JSON file. Writes go to a
//! temporary file that is then renamed over the target, so a crash mid-write
//! never leaves a half-written file behind.
//!
//! # Performance Characteristics
//!
//! - **Read**: O(1) - the whole file is loaded into memory once
//! - **Write**: O(n) - re-reads the file, replaces one blob, writes every blob
//! - **Best for**: a handful of namespaces with small filter mappings

use crate::domain::error::{FilterSheetError, Result};
use crate::storage::backend::KeyValueStorage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Current on-disk format version.
const FORMAT_VERSION: u32 = 1;

/// Top-level structure serialized to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageFile {
    version: u32,

    /// Raw blobs keyed by namespace.
    #[serde(default)]
    blobs: BTreeMap<String, String>,
}

impl Default for StorageFile {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            blobs: BTreeMap::new(),
        }
    }
}

/// JSON file storage backend.
///
/// The file is loaded on creation and merged on every `set`/`remove`: the
/// current file is re-read, only the written key changes, and the result is
/// swapped in atomically. Several instances on the same file (one per
/// namespace) therefore never drop each other's blobs.
///
/// An unreadable or malformed file is treated as empty and replaced on the
/// next write. A directory that cannot be created is not an error either;
/// writes fail instead, which puts the filter store into in-memory mode.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "blobs": {
///     "filters": "{\"status\":{\"value\":\"active\",\"isHidden\":false,\"appliedInternally\":false}}"
///   }
/// }
/// ```
#[derive(Debug)]
pub struct JsonFileStorage {
    file_path: PathBuf,
    data: StorageFile,
    dirty: bool,
}

impl JsonFileStorage {
    /// Creates or opens a JSON storage file.
    ///
    /// Parent directories are created automatically.
    ///
    /// # Parameters
    ///
    /// * `file_path` - Location of the storage file, usually
    ///   [`Config::storage_path`](crate::Config::storage_path)
    ///
    /// # Behavior
    ///
    /// Never fails. If the parent directory cannot be created, or the file
    /// cannot be read or parsed, a warning is logged and the storage starts
    /// empty. Later writes report their own errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use filter_sheet::storage::{JsonFileStorage, KeyValueStorage};
    ///
    /// let dir = tempfile::tempdir()?;
    /// let mut storage = JsonFileStorage::new(dir.path().join("filters.json"));
    /// storage.set("filters", "{}")?;
    /// assert_eq!(storage.get("filters")?.as_deref(), Some("{}"));
    /// # Ok::<(), filter_sheet::FilterSheetError>(())
    /// ```
    #[must_use]
    pub fn new(file_path: PathBuf) -> Self {
        tracing::debug!(path = ?file_path, "initializing JSON storage");

        if let Some(parent) = file_path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(
                    path = ?parent,
                    error = %e,
                    "cannot create storage directory, writes will fail"
                );
            }
        }

        let data = Self::load_from_file(&file_path).unwrap_or_else(|| {
            tracing::debug!("initializing new empty storage");
            StorageFile::default()
        });

        tracing::debug!(blob_count = data.blobs.len(), "storage initialized");

        Self {
            file_path,
            data,
            dirty: false,
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Reads the file as it is on disk right now.
    ///
    /// Returns `None` when there is no file, or when it cannot be read or
    /// parsed (logged at `warn`).
    fn load_from_file(path: &Path) -> Option<StorageFile> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = ?path, error = %e, "storage file is unreadable, starting empty");
                return None;
            }
        };

        match serde_json::from_slice::<StorageFile>(&bytes) {
            Ok(data) => {
                tracing::debug!(
                    version = data.version,
                    blobs = data.blobs.len(),
                    "loaded storage data"
                );
                Some(data)
            }
            Err(e) => {
                tracing::warn!(path = ?path, error = %e, "storage file is malformed, starting empty");
                None
            }
        }
    }

    /// Picks up blobs written by other instances since the last load.
    ///
    /// Keeps the in-memory copy when the file is gone or unusable, so a
    /// corrupt file is overwritten with what this instance knows.
    fn refresh(&mut self) {
        if let Some(data) = Self::load_from_file(&self.file_path) {
            self.data = data;
        }
    }

    /// Writes the in-memory data with a temp file and rename.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - JSON serialization fails
    /// - The temporary file cannot be written (missing or read-only directory)
    /// - The rename fails
    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| FilterSheetError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::trace!(path = ?self.file_path, "storage saved");
        Ok(())
    }
}

impl KeyValueStorage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.blobs.get(key).cloned())
    }

    fn set(&mut self, key: &str, text: &str) -> Result<()> {
        let _span = tracing::trace_span!("json_set", key = %key, bytes = text.len()).entered();

        self.refresh();
        self.data.blobs.insert(key.to_string(), text.to_string());
        self.dirty = true;
        self.save_to_file()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let _span = tracing::trace_span!("json_remove", key = %key).entered();

        self.refresh();
        if self.data.blobs.remove(key).is_some() {
            self.dirty = true;
            self.save_to_file()?;
        }
        Ok(())
    }
}

impl Drop for JsonFileStorage {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty data on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}
