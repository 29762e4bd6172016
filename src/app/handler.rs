//! Event handling and sheet state transitions.
//!
//! [`handle_event`] is the only place where the sheet touches the filter
//! store. Every event is processed synchronously: the state transition, the
//! store writes (which persist immediately) and the resulting actions all
//! happen in one call.
//!
//! # Transitions
//!
//! ```text
//!             Open
//!   Closed ─────────▶ Open ──┐ SetField / failed Apply / Clear
//!     ▲                │ ◀───┘
//!     └── Cancel / Close / successful Apply
//! ```
//!
//! Events that make no sense in the current mode (Apply while closed, Open
//! while open) are ignored. Validation failures stay inside the sheet as field
//! errors; nothing here returns an error.
//!
//! # Example
//!
//! ```rust
//! use filter_sheet::app::{handle_event, AcceptAll, Action, Event, SheetState};
//! use filter_sheet::filters::{FilterConfig, FilterConfigItem, FilterKind, FilterStore};
//! use filter_sheet::storage::MemoryStorage;
//!
//! let config = FilterConfig::new(vec![FilterConfigItem::new(FilterKind::Text, "q", "Search")]);
//! let mut sheet = SheetState::new(config);
//! let mut store = FilterStore::new(MemoryStorage::default());
//!
//! handle_event(&mut sheet, &mut store, &AcceptAll, &Event::Open);
//! handle_event(&mut sheet, &mut store, &AcceptAll, &Event::SetField {
//!     name: "q".into(),
//!     value: "shoes".into(),
//! });
//! let (_, actions) = handle_event(&mut sheet, &mut store, &AcceptAll, &Event::Apply);
//!
//! assert!(matches!(&actions[0], Action::Applied { query, .. } if query == "q=shoes"));
//! assert!(!sheet.is_open());
//! ```

use super::actions::Action;
use super::state::SheetState;
use super::validation::{ValidationOutcome, Validator};
use crate::domain::value::FilterValue;
use crate::filters::store::FilterStore;
use crate::storage::KeyValueStorage;

/// Inputs to the sheet controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Show the sheet, seeding form values from the store.
    Open,
    /// External close request, such as a backdrop click.
    Close,
    /// User dismissed the sheet.
    Cancel,
    /// Validate and apply the form.
    Apply,
    /// Clear every filter.
    Clear,
    /// An input changed.
    SetField { name: String, value: FilterValue },
    /// Remove one filter, e.g. from its chip. Works open or closed.
    RemoveFilter { name: String },
}

/// Processes an event and returns whether to re-render plus caller actions.
///
/// # Parameters
///
/// * `state` - Sheet session state, mutated in place
/// * `store` - Filter store; written only by Apply, Clear and RemoveFilter
/// * `validator` - Checked on [`Event::Apply`] only
/// * `event` - Event to process
///
/// # Returns
///
/// `(should_render, actions)`. Events ignored in the current mode return
/// `(false, vec![])`. Apply rejected by the validator returns `(true, vec![])`
/// with the field errors left on `state`.
///
/// # Behavior
///
/// - `Open`: seeds the form from the store (Closed only)
/// - `SetField`: updates one value and drops its error (Open only)
/// - `Apply`: validates, writes changed fields, closes, emits `Applied`
/// - `Cancel` / `Close`: discards the form, emits `Closed` (Open only)
/// - `Clear`: clears the store, blanks the form if open, emits `Cleared`
/// - `RemoveFilter`: drops one filter, blanks its input if open, emits
///   `FilterRemoved`
///
/// # Tracing
///
/// Each call enters a debug-level span with the event and the current mode.
pub fn handle_event<S, V>(
    state: &mut SheetState,
    store: &mut FilterStore<S>,
    validator: &V,
    event: &Event,
) -> (bool, Vec<Action>)
where
    S: KeyValueStorage,
    V: Validator + ?Sized,
{
    let _span = tracing::debug_span!("handle_event", event_type = ?event, mode = ?state.mode).entered();

    match event {
        Event::Open => {
            if state.is_open() {
                return (false, vec![]);
            }
            state.open(store);
            (true, vec![])
        }
        Event::Close | Event::Cancel => {
            if !state.is_open() {
                return (false, vec![]);
            }
            tracing::debug!("sheet closed without applying");
            state.close();
            (true, vec![Action::Closed])
        }
        Event::SetField { name, value } => {
            if !state.is_open() {
                tracing::debug!(name = %name, "ignoring edit while closed");
                return (false, vec![]);
            }
            state.set_field(name, value.clone());
            (true, vec![])
        }
        Event::Apply => {
            if !state.is_open() {
                return (false, vec![]);
            }
            apply(state, store, validator)
        }
        Event::Clear => {
            store.clear_filters();
            if state.is_open() {
                state.reset_form();
            }
            (
                true,
                vec![Action::Cleared {
                    query: store.query_string(),
                }],
            )
        }
        Event::RemoveFilter { name } => {
            store.remove_filter(name);
            if state.is_open() {
                state.reset_field(name);
            }
            (
                true,
                vec![Action::FilterRemoved {
                    name: name.clone(),
                    query: store.query_string(),
                }],
            )
        }
    }
}

fn apply<S, V>(state: &mut SheetState, store: &mut FilterStore<S>, validator: &V) -> (bool, Vec<Action>)
where
    S: KeyValueStorage,
    V: Validator + ?Sized,
{
    match validator.validate(&state.form) {
        ValidationOutcome::Invalid(errors) => {
            tracing::debug!(error_count = errors.len(), "apply rejected by validator");
            state.errors = errors;
            (true, vec![])
        }
        ValidationOutcome::Valid(values) => {
            let changed = state.changed_entries(&values, store);
            tracing::debug!(changed_count = changed.len(), "applying filters");

            for (name, entry) in changed {
                store.set_entry(name, entry);
            }

            state.close();
            (
                true,
                vec![Action::Applied {
                    values,
                    query: store.query_string(),
                }],
            )
        }
    }
}
