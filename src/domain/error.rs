//! Error types for the filter sheet.
//!
//! This module defines the centralized error type [`FilterSheetError`] and a type
//! alias [`Result`] used throughout the crate. Only storage construction, storage
//! I/O and configuration loading return errors; the filter store and the sheet
//! controller absorb failures and never hand them to the caller.

use thiserror::Error;

/// The main error type for filter sheet operations.
///
/// # Examples
///
/// ```
/// use filter_sheet::FilterSheetError;
///
/// fn load_filters() -> Result<(), FilterSheetError> {
///     Err(FilterSheetError::Config("missing [[filters]] table".to_string()))
/// }
///
/// assert!(load_filters().is_err());
/// ```
#[derive(Debug, Error)]
pub enum FilterSheetError {
    /// A key/value storage backend could not read or write a blob.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A filter mapping or storage file could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filter configuration is malformed.
    ///
    /// Raised when a TOML filter configuration cannot be parsed. Missing
    /// `options` on select-like items is not detected here.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for filter sheet operations.
pub type Result<T> = std::result::Result<T, FilterSheetError>;
