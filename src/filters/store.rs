//! The persisted filter store.
//!
//! [`FilterStore`] is the single source of truth for current filter values.
//! It loads its mapping from a [`KeyValueStorage`] namespace on creation and
//! writes the whole mapping back after every mutation.
//!
//! Persistence is best-effort. A missing or malformed blob loads as an empty
//! mapping, and the first failed write switches the store to in-memory mode
//! for the rest of its lifetime. Neither case reaches the caller as an error.

use crate::domain::error::FilterSheetError;
use crate::domain::value::{FilterEntry, FilterValue};
use crate::filters::config::FilterConfig;
use crate::filters::query::{self, AppliedFilter};
use crate::storage::KeyValueStorage;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Storage key used when the caller does not pick a namespace.
pub const DEFAULT_NAMESPACE: &str = "filters";

/// Insertion-ordered mapping from filter name to entry.
///
/// Overwriting a name keeps its position; removing and re-inserting moves it
/// to the end. Serializes as a JSON object in that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterMap {
    entries: Vec<(String, FilterEntry)>,
}

impl FilterMap {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FilterEntry> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, entry)| entry)
    }

    /// Inserts or overwrites, returning the previous entry.
    pub fn insert(&mut self, name: String, entry: FilterEntry) -> Option<FilterEntry> {
        if let Some((_, existing)) = self.entries.iter_mut().find(|(key, _)| *key == name) {
            return Some(std::mem::replace(existing, entry));
        }
        self.entries.push((name, entry));
        None
    }

    pub fn remove(&mut self, name: &str) -> Option<FilterEntry> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for FilterMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, entry) in &self.entries {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FilterMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FilterMapVisitor;

        impl<'de> Visitor<'de> for FilterMapVisitor {
            type Value = FilterMap;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("an object of filter entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FilterMap, A::Error> {
                let mut map = FilterMap::default();
                while let Some((name, entry)) = access.next_entry::<String, FilterEntry>()? {
                    map.insert(name, entry);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(FilterMapVisitor)
    }
}

/// Current filter values for one namespace, persisted through `S`.
///
/// # Examples
///
/// ```
/// use filter_sheet::filters::FilterStore;
/// use filter_sheet::storage::MemoryStorage;
///
/// let mut store = FilterStore::new(MemoryStorage::default());
/// store.set_value("status", "active");
/// store.set_value("tags", vec!["a", "b"]);
///
/// assert_eq!(store.query_string(), "status=active&tags=a&tags=b");
/// ```
#[derive(Debug)]
pub struct FilterStore<S> {
    storage: S,
    namespace: String,
    filters: FilterMap,
    persistent: bool,
}

impl<S: KeyValueStorage> FilterStore<S> {
    /// Opens the store under [`DEFAULT_NAMESPACE`].
    pub fn new(storage: S) -> Self {
        Self::with_namespace(storage, DEFAULT_NAMESPACE)
    }

    /// Opens the store under `namespace`, loading whatever is persisted there.
    ///
    /// # Parameters
    ///
    /// * `storage` - Backend holding one JSON blob per namespace
    /// * `namespace` - Storage key for this store's mapping
    ///
    /// # Behavior
    ///
    /// - Missing blob: starts empty
    /// - Unreadable storage or malformed blob: logs a warning, starts empty
    /// - Nothing is written until the first mutation
    ///
    /// # Examples
    ///
    /// ```
    /// use filter_sheet::filters::FilterStore;
    /// use filter_sheet::storage::MemoryStorage;
    ///
    /// let storage = MemoryStorage::with_blob("orders", "not json");
    /// let store = FilterStore::with_namespace(storage, "orders");
    /// assert!(store.is_empty());
    /// ```
    pub fn with_namespace(storage: S, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let _span = tracing::debug_span!("filter_store_open", namespace = %namespace).entered();

        let filters = Self::load(&storage, &namespace);
        tracing::debug!(filter_count = filters.len(), "filter store loaded");

        Self {
            storage,
            namespace,
            filters,
            persistent: true,
        }
    }

    fn load(storage: &S, namespace: &str) -> FilterMap {
        let text = match storage.get(namespace) {
            Ok(Some(text)) => text,
            Ok(None) => return FilterMap::default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read persisted filters, starting empty");
                return FilterMap::default();
            }
        };

        serde_json::from_str(&text).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "persisted filters are malformed, starting empty");
            FilterMap::default()
        })
    }

    fn persist(&mut self) {
        if !self.persistent {
            tracing::trace!("persistence disabled, keeping filters in memory");
            return;
        }

        let result = serde_json::to_string(&self.filters)
            .map_err(FilterSheetError::from)
            .and_then(|text| self.storage.set(&self.namespace, &text));

        if let Err(e) = result {
            tracing::warn!(
                namespace = %self.namespace,
                error = %e,
                "failed to persist filters, continuing in memory"
            );
            self.persistent = false;
        }
    }

    /// Inserts or overwrites a visible, user-applied filter.
    ///
    /// The value is not checked against any configuration.
    ///
    /// # Parameters
    ///
    /// * `name` - Filter name, the join key into [`FilterConfig`]
    /// * `value` - Anything convertible into a [`FilterValue`]
    ///
    /// # Behavior
    ///
    /// An existing name keeps its position; a new name is appended. The whole
    /// mapping is persisted afterwards (see [`set_entry`](Self::set_entry)).
    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<FilterValue>) {
        self.set_entry(name, FilterEntry::new(value.into()));
    }

    /// Sets a filter on behalf of the system rather than the user.
    pub fn apply_internally(&mut self, name: impl Into<String>, value: impl Into<FilterValue>) {
        self.set_entry(
            name,
            FilterEntry {
                value: value.into(),
                is_hidden: false,
                applied_internally: true,
            },
        );
    }

    /// Inserts or overwrites an entry with explicit flags.
    ///
    /// # Behavior
    ///
    /// 1. Replaces the entry in memory
    /// 2. Serializes the full mapping and writes it under the namespace key
    /// 3. On the first failed write, logs a warning and stops persisting for
    ///    the rest of the store's lifetime; the in-memory mapping stays current
    ///
    /// # Tracing
    ///
    /// Logs the name and flags at debug level.
    pub fn set_entry(&mut self, name: impl Into<String>, entry: FilterEntry) {
        let name = name.into();
        tracing::debug!(
            name = %name,
            is_hidden = entry.is_hidden,
            applied_internally = entry.applied_internally,
            "setting filter"
        );
        self.filters.insert(name, entry);
        self.persist();
    }

    /// Removes a filter. Removing an unknown name is not an error.
    ///
    /// # Parameters
    ///
    /// * `name` - Filter to drop
    ///
    /// # Behavior
    ///
    /// Persists even when nothing was removed, so the stored blob always
    /// reflects the current mapping. Re-adding the name later appends it.
    pub fn remove_filter(&mut self, name: &str) {
        let removed = self.filters.remove(name).is_some();
        tracing::debug!(name = %name, removed, "removing filter");
        self.persist();
    }

    /// Removes every filter.
    ///
    /// Idempotent: clearing twice leaves the same empty mapping (`{}`) in
    /// storage.
    pub fn clear_filters(&mut self) {
        tracing::debug!(previous_count = self.filters.len(), "clearing filters");
        self.filters.clear();
        self.persist();
    }

    /// Sets every applied pair parsed from `query` as an internally applied filter.
    ///
    /// # Parameters
    ///
    /// * `query` - URL query string, with or without a leading `?`
    /// * `config` - Decides which names are lists and which are numbers
    ///
    /// # Returns
    ///
    /// The number of filters set. Pairs with nothing applied are skipped.
    pub fn apply_query(&mut self, query: &str, config: &FilterConfig) -> usize {
        let parsed = query::parse_query(query, config);
        let count = parsed.len();
        for (name, value) in parsed {
            self.apply_internally(name, value);
        }
        tracing::debug!(count, "applied filters from query string");
        count
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FilterEntry> {
        self.filters.get(name)
    }

    /// Raw entries in insertion order, applied or not.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &FilterEntry)> {
        self.filters.iter()
    }

    #[must_use]
    pub const fn filters(&self) -> &FilterMap {
        &self.filters
    }

    /// Applied `(name, value)` pairs in insertion order.
    ///
    /// # Returns
    ///
    /// Every entry, hidden or not, whose value is applied: not `Null`, not
    /// empty text, not an empty list and not a NaN number.
    #[must_use]
    pub fn applied_filters(&self) -> Vec<AppliedFilter> {
        query::applied_filters(self.filters.iter())
    }

    /// Applied filters that are not hidden, for rendering active-filter chips.
    #[must_use]
    pub fn visible_applied_filters(&self) -> Vec<AppliedFilter> {
        query::applied_filters(self.filters.iter().filter(|(_, entry)| !entry.is_hidden))
    }

    /// Number of visible applied filters.
    #[must_use]
    pub fn applied_count(&self) -> usize {
        self.filters
            .iter()
            .filter(|(_, entry)| !entry.is_hidden && entry.value.is_applied())
            .count()
    }

    /// URL query string for the applied filters.
    ///
    /// # Returns
    ///
    /// An `application/x-www-form-urlencoded` string without a leading `?`,
    /// or `""` when nothing is applied. Lists repeat their key.
    ///
    /// # Examples
    ///
    /// ```
    /// use filter_sheet::filters::FilterStore;
    /// use filter_sheet::storage::MemoryStorage;
    ///
    /// let mut store = FilterStore::new(MemoryStorage::default());
    /// assert_eq!(store.query_string(), "");
    ///
    /// store.set_value("q", "red shoes");
    /// store.set_value("tags", vec!["a", "b"]);
    /// assert_eq!(store.query_string(), "q=red+shoes&tags=a&tags=b");
    /// ```
    #[must_use]
    pub fn query_string(&self) -> String {
        query::query_string(&self.applied_filters())
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// `false` once a write has failed and the store runs in memory only.
    #[must_use]
    pub const fn is_persistent(&self) -> bool {
        self.persistent
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }
}
