//! Notifications handed back to the caller after an event.
//!
//! The caller owns everything downstream of the filter state: re-fetching the
//! table, updating the URL, closing a dialog widget. Each [`Action`] tells it
//! what just happened and carries the query string to use.

use super::form::FormValues;

/// Caller-facing result of handling an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Validated values were applied to the store and the sheet closed.
    Applied {
        /// Raw validated values, including unchanged fields.
        values: FormValues,
        /// Query string for the store after applying.
        query: String,
    },

    /// Every filter was cleared.
    Cleared {
        /// Query string after clearing.
        query: String,
    },

    /// The sheet closed without applying anything.
    Closed,

    /// A single filter was removed, typically from its chip.
    FilterRemoved {
        name: String,
        query: String,
    },
}
