//! Sheet session state and view model computation.
//!
//! [`SheetState`] holds everything that lives only while a user edits filters:
//! the open/closed mode, the ephemeral form values and the current field
//! errors. The filter store stays the source of truth; the sheet reads it when
//! opening and writes to it only through the event handler.

use super::form::{FieldErrors, FormValues};
use super::modes::SheetMode;
use super::viewmodel::{FieldView, FilterChip, SheetViewModel};
use crate::domain::value::{FilterEntry, FilterValue};
use crate::filters::config::{FilterConfig, FilterConfigItem};
use crate::filters::store::FilterStore;
use crate::storage::KeyValueStorage;

/// Session-scoped state of one filter sheet.
#[derive(Debug, Clone, Default)]
pub struct SheetState {
    /// Inputs offered by the sheet, in display order.
    pub config: FilterConfig,

    pub mode: SheetMode,

    /// Values being edited. Seeded on open, discarded on close.
    pub form: FormValues,

    /// Messages from the last failed apply, cleared per field on edit.
    pub errors: FieldErrors,
}

impl SheetState {
    /// Creates a closed sheet for `config`.
    #[must_use]
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.mode == SheetMode::Open
    }

    /// Seeds form values from the raw store entries and opens the sheet.
    ///
    /// Every stored entry is copied, applied or not. Configured inputs with no
    /// entry get their editing default.
    pub fn open<S: KeyValueStorage>(&mut self, store: &FilterStore<S>) {
        self.form = store
            .entries()
            .map(|(name, entry)| (name, entry.value.clone()))
            .collect();

        for item in self.config.iter() {
            if self.form.get(&item.name).is_none() {
                self.form.set(item.name.clone(), item.empty_value());
            }
        }

        self.errors.clear();
        self.mode = SheetMode::Open;

        tracing::debug!(field_count = self.form.len(), "sheet opened");
    }

    /// Discards form state and closes the sheet.
    pub fn close(&mut self) {
        self.form.clear();
        self.errors.clear();
        self.mode = SheetMode::Closed;
    }

    /// Updates one edited value and drops its stale error.
    pub fn set_field(&mut self, name: &str, value: FilterValue) {
        self.form.set(name, value);
        self.errors.remove(name);
    }

    /// Resets every configured input to its empty value.
    pub fn reset_form(&mut self) {
        self.form = self
            .config
            .iter()
            .map(|item| (item.name.clone(), item.blank_value()))
            .collect();
        self.errors.clear();
    }

    /// Resets one input after its filter was removed elsewhere.
    pub fn reset_field(&mut self, name: &str) {
        let value = self
            .config
            .get(name)
            .map_or(FilterValue::Text(String::new()), FilterConfigItem::blank_value);
        self.set_field(name, value);
    }

    /// Entries to write for validated `values`, skipping unchanged fields.
    ///
    /// A field is changed when its value differs from the stored one, or when
    /// nothing is stored and the value is applied. Hidden-ness comes from the
    /// config item, falling back to the stored entry.
    #[must_use]
    pub fn changed_entries<S: KeyValueStorage>(
        &self,
        values: &FormValues,
        store: &FilterStore<S>,
    ) -> Vec<(String, FilterEntry)> {
        values
            .iter()
            .filter_map(|(name, value)| {
                let stored = store.get(name);
                let changed = stored.map_or_else(|| value.is_applied(), |entry| entry.value != *value);
                if !changed {
                    return None;
                }

                let is_hidden = self
                    .config
                    .get(name)
                    .map(|item| item.is_hidden)
                    .or_else(|| stored.map(|entry| entry.is_hidden))
                    .unwrap_or(false);

                Some((
                    name.to_string(),
                    FilterEntry {
                        value: value.clone(),
                        is_hidden,
                        applied_internally: false,
                    },
                ))
            })
            .collect()
    }

    /// Computes what the renderer needs for the current state.
    #[must_use]
    pub fn compute_viewmodel<S: KeyValueStorage>(&self, store: &FilterStore<S>) -> SheetViewModel {
        let fields = if self.is_open() {
            self.config
                .visible()
                .map(|item| FieldView {
                    name: item.name.clone(),
                    label: item.label.clone(),
                    kind: item.kind,
                    placeholder: item.placeholder.clone(),
                    options: item.options.clone(),
                    multiple: item.is_multi_valued(),
                    value: self
                        .form
                        .get(&item.name)
                        .cloned()
                        .unwrap_or_else(|| item.empty_value()),
                    error: self.errors.get(&item.name).map(String::from),
                })
                .collect()
        } else {
            Vec::new()
        };

        let chips = store
            .visible_applied_filters()
            .into_iter()
            .map(|(name, value)| self.chip(name, &value))
            .collect();

        SheetViewModel {
            is_open: self.is_open(),
            fields,
            chips,
            applied_count: store.applied_count(),
        }
    }

    fn chip(&self, name: String, value: &FilterValue) -> FilterChip {
        let item = self.config.get(&name);
        let option_label = |raw: &str| {
            item.and_then(|item| item.option_label(raw))
                .unwrap_or(raw)
                .to_string()
        };

        let value_label = match value {
            FilterValue::Text(text) => option_label(text.as_str()),
            FilterValue::List(items) => items
                .iter()
                .map(|raw| option_label(raw.as_str()))
                .collect::<Vec<_>>()
                .join(", "),
            FilterValue::Bool(true) => "Yes".to_string(),
            FilterValue::Bool(false) => "No".to_string(),
            FilterValue::Object(map) => serde_json::Value::Object(map.clone()).to_string(),
            other => other.scalar_text().unwrap_or_default(),
        };

        FilterChip {
            label: item.map_or_else(|| name.clone(), |item| item.label.clone()),
            name,
            value_label,
        }
    }
}
