//! filter-sheet: persisted filter state for data tables.
//!
//! The crate covers the stateful part of a table's filter UI:
//! - A persisted filter store (name → value, visibility, origin)
//! - Projection of applied filters into a URL query string, and back
//! - Declarative filter configuration, loadable from TOML
//! - A filter sheet controller that opens, validates, applies and clears
//!
//! Rendering, data fetching and routing belong to the caller.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Caller (renderer, data fetching)                   │
//! └─────────────────────────────────────────────────────┘
//!             │ Event                ▲ Action / SheetViewModel
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Closed/Open sheet
//! │  - Event handling          - Validation             │
//! │  - Form state              - View model             │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Filters (filters/)                                 │
//! │  - FilterStore   - Query projection   - Config      │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌───────────────────────────┐   ┌─────────────────────┐
//! │ Storage (storage/)        │   │ Domain (domain/)    │
//! │ - KeyValueStorage trait   │   │ - FilterValue       │
//! │ - Memory / JSON file      │   │ - Errors            │
//! └───────────────────────────┘   └─────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Sheet controller with event/action model
//! - [`domain`]: Filter values, entries and errors
//! - [`filters`]: Store, configuration and query projection
//! - [`infrastructure`]: Data directory and path helpers
//! - [`storage`]: Key/value storage capability and backends
//! - [`observability`]: OpenTelemetry tracing to a rotating file
//!
//! # Example
//!
//! ```rust
//! use filter_sheet::filters::FilterStore;
//! use filter_sheet::storage::MemoryStorage;
//!
//! let mut store = FilterStore::new(MemoryStorage::default());
//! store.set_value("status", "active");
//! store.set_value("tags", vec!["a", "b"]);
//! store.set_value("count", f64::NAN);
//!
//! assert_eq!(store.query_string(), "status=active&tags=a&tags=b");
//! ```

pub mod app;
pub mod domain;
pub mod filters;
pub mod infrastructure;
pub mod storage;

pub mod observability;

pub use app::{handle_event, Action, Event, SheetMode, SheetState, SheetViewModel};
pub use domain::{FilterEntry, FilterSheetError, FilterValue, Result};
pub use filters::{FilterConfig, FilterStore};

use app::RuleSchema;
use std::collections::BTreeMap;
use std::path::PathBuf;
use storage::JsonFileStorage;

/// Storage file name inside the data directory.
const STORAGE_FILE: &str = "filters.json";

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Storage key the filter mapping is persisted under. Default: `"filters"`.
    pub namespace: String,

    /// Directory for the storage file and traces.
    ///
    /// Default: [`infrastructure::get_data_dir`].
    pub data_dir: PathBuf,

    /// Optional TOML file with `[[filters]]` tables. No file means no inputs.
    pub filters_file: Option<PathBuf>,

    /// Tracing filter, e.g. `"debug"` or `"filter_sheet=trace"`.
    ///
    /// Tracing is only installed by [`initialize`] when this is set.
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: filters::DEFAULT_NAMESPACE.to_string(),
            data_dir: infrastructure::get_data_dir(),
            filters_file: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from string settings with fallback defaults.
    ///
    /// Recognized keys: `namespace`, `data_dir`, `filters_file`,
    /// `trace_level`. Empty values are ignored and paths may start with `~`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use filter_sheet::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("namespace".to_string(), "orders".to_string());
    /// map.insert("trace_level".to_string(), "".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.namespace, "orders");
    /// assert_eq!(config.trace_level, None);
    /// ```
    #[must_use]
    pub fn from_map(settings: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| {
            settings
                .get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
        };
        let path = |key: &str| get(key).map(|value| PathBuf::from(infrastructure::expand_tilde(value)));

        let defaults = Self::default();
        Self {
            namespace: get("namespace").map_or(defaults.namespace, String::from),
            data_dir: path("data_dir").unwrap_or(defaults.data_dir),
            filters_file: path("filters_file"),
            trace_level: get("trace_level").map(String::from),
        }
    }

    /// Path of the JSON storage file.
    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join(STORAGE_FILE)
    }
}

/// A ready-to-use sheet: state, file-backed store and derived validator.
#[derive(Debug)]
pub struct FilterSession {
    pub sheet: SheetState,
    pub store: FilterStore<JsonFileStorage>,
    pub validator: RuleSchema,
}

impl FilterSession {
    /// Routes an event through [`handle_event`].
    pub fn handle(&mut self, event: &Event) -> (bool, Vec<Action>) {
        handle_event(&mut self.sheet, &mut self.store, &self.validator, event)
    }

    #[must_use]
    pub fn viewmodel(&self) -> SheetViewModel {
        self.sheet.compute_viewmodel(&self.store)
    }
}

/// Builds a [`FilterSession`] from configuration.
///
/// # Parameters
///
/// * `config` - Namespace, data directory, optional filters file and trace level
///
/// # Behavior
///
/// 1. Installs tracing when `trace_level` is set
/// 2. Loads the filter config from `filters_file` (no file means no inputs)
/// 3. Opens the JSON storage file in the data directory
/// 4. Loads the store for `namespace` and derives a [`RuleSchema`]
///
/// Storage problems never fail initialization. A malformed or unreadable
/// storage file opens empty, and a data directory that cannot be created
/// leaves the store running in memory after its first failed write.
///
/// # Errors
///
/// Returns an error if the filter config file cannot be read or parsed.
///
/// # Example
///
/// ```rust
/// use filter_sheet::{initialize, Config, Event};
///
/// let dir = tempfile::tempdir()?;
/// let mut session = initialize(&Config {
///     data_dir: dir.path().to_path_buf(),
///     ..Default::default()
/// })?;
/// session.handle(&Event::Open);
/// assert!(session.viewmodel().is_open);
/// # Ok::<(), filter_sheet::FilterSheetError>(())
/// ```
pub fn initialize(config: &Config) -> Result<FilterSession> {
    if config.trace_level.is_some() {
        observability::init_tracing(config);
    }

    tracing::debug!(namespace = %config.namespace, data_dir = ?config.data_dir, "initializing filter sheet");

    let filter_config = match &config.filters_file {
        Some(path) => FilterConfig::from_toml_file(path)?,
        None => FilterConfig::default(),
    };

    let storage = JsonFileStorage::new(config.storage_path());
    let store = FilterStore::with_namespace(storage, config.namespace.clone());
    let validator = RuleSchema::from_config(&filter_config);

    Ok(FilterSession {
        sheet: SheetState::new(filter_config),
        store,
        validator,
    })
}
