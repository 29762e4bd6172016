//! Domain layer for the filter sheet.
//!
//! Core value types that every other layer speaks: filter values, stored
//! entries, and the crate error type. Nothing in here touches storage or
//! tracing.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`value`]: Filter values and stored filter entries
//!
//! # Examples
//!
//! ```
//! use filter_sheet::domain::{FilterEntry, FilterValue};
//!
//! let entry = FilterEntry::new(FilterValue::from("active"));
//! assert!(entry.value.is_applied());
//! assert!(!entry.is_hidden);
//! ```

pub mod error;
pub mod value;

pub use error::{FilterSheetError, Result};
pub use value::{FilterEntry, FilterValue};
