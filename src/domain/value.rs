//! Filter values and stored filter entries.
//!
//! A filter value carries one of a handful of JSON shapes. Keeping the shape as
//! an enum variant makes the "is this filter applied" predicate and the query
//! string encoding well-defined per variant instead of guessing at runtime.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// The current value of one filter.
///
/// Serialized untagged, so the persisted form is the plain JSON value:
/// `"active"`, `["a", "b"]`, `3`, `true`, `null` or an object.
///
/// # Examples
///
/// ```
/// use filter_sheet::FilterValue;
///
/// assert!(FilterValue::from("active").is_applied());
/// assert!(!FilterValue::from("").is_applied());
/// assert!(!FilterValue::Number(f64::NAN).is_applied());
/// assert!(!FilterValue::List(vec![]).is_applied());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// No value. Also what a persisted NaN reads back as.
    Null,
    /// Checkbox-style toggle.
    Bool(bool),
    /// Numeric input. NaN is representable in memory but never applied.
    Number(f64),
    /// Free text, a single select option, a date or a color.
    Text(String),
    /// Multi-select or checkbox group, in selection order.
    List(Vec<String>),
    /// Structured value, encoded as JSON text in the query string.
    Object(Map<String, JsonValue>),
}

impl FilterValue {
    /// Returns `true` when the value counts as "set" for querying.
    ///
    /// Excluded: `Null`, empty text, empty lists and NaN numbers. The NaN check
    /// only looks at `Number`; text that happens to read "NaN" is applied.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Text(text) => !text.is_empty(),
            Self::List(items) => !items.is_empty(),
            Self::Number(number) => !number.is_nan(),
            Self::Bool(_) | Self::Object(_) => true,
        }
    }

    /// Renders a scalar value the way it appears in a query parameter.
    ///
    /// Returns `None` for lists and objects, which the projector encodes
    /// separately. Numbers print the way a browser would put them in a URL:
    /// `3` rather than `3.0`, `0` for negative zero, and exponent notation
    /// below `1e-6` or from `1e21` up.
    #[must_use]
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Self::Null => Some("null".to_string()),
            Self::Bool(flag) => Some(flag.to_string()),
            Self::Number(number) => Some(number_text(*number)),
            Self::Text(text) => Some(text.clone()),
            Self::List(_) | Self::Object(_) => None,
        }
    }

    /// Returns the text payload, if this is a `Text` value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the list payload, if this is a `List` value.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the number payload, if this is a `Number` value.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            _ => None,
        }
    }
}

fn number_text(number: f64) -> String {
    if number.is_nan() {
        return "NaN".to_string();
    }
    if number.is_infinite() {
        return if number.is_sign_positive() { "Infinity" } else { "-Infinity" }.to_string();
    }
    if number == 0.0 {
        return "0".to_string();
    }

    let magnitude = number.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let text = format!("{number:e}");
        return match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => text,
        };
    }
    number.to_string()
}

impl Default for FilterValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(String::from).collect())
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FilterValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Map<String, JsonValue>> for FilterValue {
    fn from(value: Map<String, JsonValue>) -> Self {
        Self::Object(value)
    }
}

/// One stored filter: its value plus visibility and origin flags.
///
/// Persisted as `{ "value": ..., "isHidden": bool, "appliedInternally": bool }`.
/// Missing flags read back as `false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterEntry {
    /// Current filter value.
    pub value: FilterValue,

    /// Excluded from user-facing rendering but still applied to queries.
    #[serde(default)]
    pub is_hidden: bool,

    /// Set by programmatic application rather than by the user.
    #[serde(default)]
    pub applied_internally: bool,
}

impl FilterEntry {
    /// Creates a visible, user-applied entry.
    #[must_use]
    pub const fn new(value: FilterValue) -> Self {
        Self {
            value,
            is_hidden: false,
            applied_internally: false,
        }
    }
}
