//! Filter sheet controller: session state, events and actions.
//!
//! This layer sits between a renderer and the filter store. The renderer sends
//! [`Event`]s, [`handle_event`] mutates [`SheetState`] and the store, and the
//! returned [`Action`]s tell the caller what to do next (usually: re-fetch
//! with the new query string).
//!
//! ```text
//! Renderer → Event → handle_event → SheetState / FilterStore → Actions → Caller
//!    ▲                                     │
//!    └────────── SheetViewModel ◀──────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Caller notifications
//! - [`form`]: Ephemeral form values and field errors
//! - [`handler`]: Event processing and state transitions
//! - [`modes`]: Closed/Open mode
//! - [`state`]: Sheet session state and view model computation
//! - [`validation`]: Validator contract and the built-in rule schema
//! - [`viewmodel`]: Renderable snapshot types

pub mod actions;
pub mod form;
pub mod handler;
pub mod modes;
pub mod state;
pub mod validation;
pub mod viewmodel;

pub use actions::Action;
pub use form::{FieldErrors, FormValues};
pub use handler::{handle_event, Event};
pub use modes::SheetMode;
pub use state::SheetState;
pub use validation::{AcceptAll, Rule, RuleSchema, ValidationOutcome, Validator};
pub use viewmodel::{FieldView, FilterChip, SheetViewModel};
