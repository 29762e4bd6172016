//! Key/value storage abstraction.
//!
//! Filter stores never reach for a global storage area. They get a
//! [`KeyValueStorage`] handed in and keep one text blob per namespace key in it,
//! which keeps every store testable without a real backend.

use crate::domain::error::Result;

/// Text blobs addressed by string keys.
///
/// The contract is deliberately small: the filter store reads its namespace
/// once at creation and overwrites it after every mutation.
///
/// # Implementations
///
/// - [`MemoryStorage`](crate::storage::MemoryStorage): in-process map, clones share state
/// - [`JsonFileStorage`](crate::storage::JsonFileStorage): one JSON file, atomic writes
///
/// # Examples
///
/// ```
/// use filter_sheet::storage::{KeyValueStorage, MemoryStorage};
///
/// let mut storage = MemoryStorage::default();
/// storage.set("filters", "{}")?;
/// assert_eq!(storage.get("filters")?.as_deref(), Some("{}"));
/// # Ok::<(), filter_sheet::FilterSheetError>(())
/// ```
pub trait KeyValueStorage {
    /// Reads the blob stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing is stored there.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrites the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write (unavailable, full).
    fn set(&mut self, key: &str, text: &str) -> Result<()>;

    /// Deletes the blob stored under `key`. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, text: &str) -> Result<()> {
        (**self).set(key, text)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
