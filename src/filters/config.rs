//! Declarative filter configuration.
//!
//! A [`FilterConfig`] lists the filters a table offers, in display order. Each
//! item names its input kind and, for choice inputs, its options. The store
//! never owns configuration; the `name` field is the only link between the two.
//!
//! Configurations are usually built in code, but can also be loaded from TOML:
//!
//! ```toml
//! [[filters]]
//! type = "select"
//! name = "status"
//! label = "Status"
//! options = [
//!     { label = "Active", value = "active" },
//!     { label = "Archived", value = "archived" },
//! ]
//!
//! [[filters]]
//! type = "date"
//! name = "created_after"
//! label = "Created after"
//! placeholder = "YYYY-MM-DD"
//! ```

use crate::domain::error::{FilterSheetError, Result};
use crate::domain::value::FilterValue;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Input kind of a filter, which selects the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Free text input.
    Text,
    /// Dropdown, single or multiple choice.
    Select,
    /// Date picker producing `YYYY-MM-DD`.
    Date,
    /// Color picker producing `#rrggbb`.
    Color,
    /// Checkbox group, always multi-valued.
    Checkbox,
    /// Radio group, single choice.
    Radio,
    /// Numeric input.
    Number,
}

impl FilterKind {
    /// Returns `true` for kinds that pick from a fixed option list.
    #[must_use]
    pub const fn has_options(self) -> bool {
        matches!(self, Self::Select | Self::Checkbox | Self::Radio)
    }
}

/// One selectable option of a choice filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    /// Text shown to the user.
    pub label: String,
    /// Value stored and sent in the query string.
    pub value: String,
}

impl FilterOption {
    /// Creates an option.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Static description of one filter input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfigItem {
    /// Input kind.
    #[serde(rename = "type")]
    pub kind: FilterKind,

    /// Join key into the filter store.
    pub name: String,

    /// Field label.
    pub label: String,

    #[serde(default)]
    pub placeholder: Option<String>,

    /// Choices for select, radio and checkbox kinds. Empty otherwise.
    #[serde(default)]
    pub options: Vec<FilterOption>,

    /// Not rendered, but still applied when set.
    #[serde(default)]
    pub is_hidden: bool,

    /// Editing default when the store has no entry for this filter.
    #[serde(default)]
    pub default_value: Option<FilterValue>,

    /// Multi-choice select.
    #[serde(default)]
    pub multiple: bool,
}

impl FilterConfigItem {
    /// Creates an item with no options, placeholder or default.
    pub fn new(kind: FilterKind, name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            label: label.into(),
            placeholder: None,
            options: Vec::new(),
            is_hidden: false,
            default_value: None,
            multiple: false,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: Vec<FilterOption>) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<FilterValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }

    #[must_use]
    pub const fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Returns `true` when the field holds a list of values.
    #[must_use]
    pub const fn is_multi_valued(&self) -> bool {
        matches!(self.kind, FilterKind::Checkbox)
            || (matches!(self.kind, FilterKind::Select) && self.multiple)
    }

    /// Value the sheet edits when the store has nothing for this filter.
    ///
    /// The configured default wins, otherwise the blank value: an empty list
    /// for multi-valued fields, `Null` for numbers, empty text for the rest.
    #[must_use]
    pub fn empty_value(&self) -> FilterValue {
        self.default_value
            .clone()
            .unwrap_or_else(|| self.blank_value())
    }

    /// Cleared value of the input, ignoring any configured default.
    #[must_use]
    pub fn blank_value(&self) -> FilterValue {
        if self.is_multi_valued() {
            FilterValue::List(Vec::new())
        } else if matches!(self.kind, FilterKind::Number) {
            FilterValue::Null
        } else {
            FilterValue::Text(String::new())
        }
    }

    /// Looks up the label of an option value.
    #[must_use]
    pub fn option_label(&self, value: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|option| option.value == value)
            .map(|option| option.label.as_str())
    }

    /// Ranks options against a search query for searchable selects.
    ///
    /// Uses the skim fuzzy matcher on option labels, best match first. Ties
    /// keep configuration order. An empty query returns every option.
    #[must_use]
    pub fn search_options(&self, query: &str) -> Vec<&FilterOption> {
        let query = query.trim();
        if query.is_empty() {
            return self.options.iter().collect();
        }

        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(i64, &FilterOption)> = self
            .options
            .iter()
            .filter_map(|option| {
                matcher
                    .fuzzy_match(&option.label, query)
                    .map(|score| (score, option))
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, option)| option).collect()
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    filters: Vec<FilterConfigItem>,
}

/// Ordered list of filter inputs for one table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterConfig {
    items: Vec<FilterConfigItem>,
}

impl FilterConfig {
    #[must_use]
    pub const fn new(items: Vec<FilterConfigItem>) -> Self {
        Self { items }
    }

    /// Parses a configuration from TOML text with `[[filters]]` tables.
    ///
    /// # Errors
    ///
    /// Returns [`FilterSheetError::Config`] if the text is not valid TOML or an
    /// item is missing a required field.
    ///
    /// # Examples
    ///
    /// ```
    /// use filter_sheet::filters::{FilterConfig, FilterKind};
    ///
    /// let config = FilterConfig::from_toml_str(r#"
    ///     [[filters]]
    ///     type = "text"
    ///     name = "q"
    ///     label = "Search"
    /// "#)?;
    /// assert_eq!(config.get("q").map(|item| item.kind), Some(FilterKind::Text));
    /// # Ok::<(), filter_sheet::FilterSheetError>(())
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(text)
            .map_err(|e| FilterSheetError::Config(format!("invalid filter config: {e}")))?;

        tracing::debug!(item_count = file.filters.len(), "filter config parsed");
        Ok(Self::new(file.filters))
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = ?path, "loading filter config");
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FilterConfigItem> {
        self.items.iter().find(|item| item.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterConfigItem> {
        self.items.iter()
    }

    /// Items that are rendered in the sheet.
    pub fn visible(&self) -> impl Iterator<Item = &FilterConfigItem> {
        self.items.iter().filter(|item| !item.is_hidden)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<FilterConfigItem> for FilterConfig {
    fn from_iter<I: IntoIterator<Item = FilterConfigItem>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
