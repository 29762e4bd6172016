//! Filter state: configuration, the persisted store and query projection.
//!
//! # Modules
//!
//! - [`config`]: Declarative filter inputs (kinds, options, defaults)
//! - [`store`]: Persisted name → entry mapping
//! - [`query`]: Applied-filter projection and URL query strings
//!
//! # Example
//!
//! ```rust
//! use filter_sheet::filters::FilterStore;
//! use filter_sheet::storage::MemoryStorage;
//!
//! let storage = MemoryStorage::default();
//! let mut store = FilterStore::new(storage.clone());
//! store.set_value("status", "active");
//!
//! // A second store on the same namespace sees the persisted value.
//! let reopened = FilterStore::new(storage);
//! assert_eq!(reopened.query_string(), "status=active");
//! ```

pub mod config;
pub mod query;
pub mod store;

pub use config::{FilterConfig, FilterConfigItem, FilterKind, FilterOption};
pub use query::{applied_filters, parse_query, query_string, AppliedFilter};
pub use store::{FilterMap, FilterStore, DEFAULT_NAMESPACE};
