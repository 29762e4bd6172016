//! In-memory key/value storage.

use crate::domain::error::Result;
use crate::storage::backend::KeyValueStorage;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// In-memory storage keyed by string.
///
/// Clones share the same underlying map, so a test can keep one handle to
/// inspect what a filter store persisted through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Creates storage pre-populated with a single blob.
    #[must_use]
    pub fn with_blob(key: impl Into<String>, text: impl Into<String>) -> Self {
        let storage = Self::default();
        storage.inner.borrow_mut().insert(key.into(), text.into());
        storage
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns `true` when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, text: &str) -> Result<()> {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), text.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.inner.borrow_mut().remove(key);
        Ok(())
    }
}
