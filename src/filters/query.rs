//! Applied-filter projection and URL query strings.
//!
//! The projector turns stored entries into the ordered `(name, value)` pairs
//! that count as applied, and those pairs into an
//! `application/x-www-form-urlencoded` query string:
//!
//! - lists repeat the key once per element (`tags=a&tags=b`)
//! - objects become JSON text under a single key
//! - scalars are appended directly
//!
//! No bracket notation is ever produced. [`parse_query`] goes the other way,
//! for hydrating a store from a shared URL.

use crate::domain::value::{FilterEntry, FilterValue};
use crate::filters::config::{FilterConfig, FilterKind};
use serde_json::Value as JsonValue;
use url::form_urlencoded;

/// A filter name paired with its applied value.
pub type AppliedFilter = (String, FilterValue);

/// Keeps the entries whose value is applied, in the given order.
///
/// # Examples
///
/// ```
/// use filter_sheet::domain::{FilterEntry, FilterValue};
/// use filter_sheet::filters::applied_filters;
///
/// let status = FilterEntry::new(FilterValue::from("active"));
/// let empty = FilterEntry::new(FilterValue::from(""));
/// let applied = applied_filters([("status", &status), ("q", &empty)]);
///
/// assert_eq!(applied, vec![("status".to_string(), FilterValue::from("active"))]);
/// ```
pub fn applied_filters<'a, I>(entries: I) -> Vec<AppliedFilter>
where
    I: IntoIterator<Item = (&'a str, &'a FilterEntry)>,
{
    entries
        .into_iter()
        .filter(|(_, entry)| entry.value.is_applied())
        .map(|(name, entry)| (name.to_string(), entry.value.clone()))
        .collect()
}

/// Serializes applied filters into a URL query string without a leading `?`.
///
/// Returns an empty string when nothing is applied.
///
/// # Examples
///
/// ```
/// use filter_sheet::FilterValue;
/// use filter_sheet::filters::query_string;
///
/// let applied = vec![
///     ("status".to_string(), FilterValue::from("active")),
///     ("tags".to_string(), FilterValue::from(vec!["a", "b"])),
/// ];
/// assert_eq!(query_string(&applied), "status=active&tags=a&tags=b");
/// ```
#[must_use]
pub fn query_string(applied: &[AppliedFilter]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());

    for (name, value) in applied {
        match value {
            FilterValue::List(items) => {
                for item in items {
                    serializer.append_pair(name, item);
                }
            }
            FilterValue::Object(map) => {
                let json = JsonValue::Object(map.clone()).to_string();
                serializer.append_pair(name, &json);
            }
            scalar => {
                if let Some(text) = scalar.scalar_text() {
                    serializer.append_pair(name, &text);
                }
            }
        }
    }

    serializer.finish()
}

/// Parses a query string back into filter values.
///
/// A leading `?` is ignored. Keys keep their first-occurrence order. A key
/// becomes a `List` when it repeats or when its configured item is
/// multi-valued; `number` items parse their value as `f64` when possible.
/// Pairs with nothing applied (such as `q=`) are dropped.
#[must_use]
pub fn parse_query(query: &str, config: &FilterConfig) -> Vec<AppliedFilter> {
    let query = query.strip_prefix('?').unwrap_or(query);

    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match grouped.iter_mut().find(|(name, _)| name.as_str() == &*key) {
            Some((_, values)) => values.push(value.into_owned()),
            None => grouped.push((key.into_owned(), vec![value.into_owned()])),
        }
    }

    grouped
        .into_iter()
        .map(|(name, mut values)| {
            let item = config.get(&name);
            let value = if values.len() > 1 || item.is_some_and(|item| item.is_multi_valued()) {
                FilterValue::List(values)
            } else {
                let text = values.pop().unwrap_or_default();
                match (item.map(|item| item.kind), text.parse::<f64>()) {
                    (Some(FilterKind::Number), Ok(number)) => FilterValue::Number(number),
                    _ => FilterValue::Text(text),
                }
            };
            (name, value)
        })
        .filter(|(_, value)| value.is_applied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::config::FilterConfigItem;
    use serde_json::Map;

    fn pair(name: &str, value: impl Into<FilterValue>) -> AppliedFilter {
        (name.to_string(), value.into())
    }

    #[test]
    fn empty_applied_set_yields_empty_string() {
        assert_eq!(query_string(&[]), "");
    }

    #[test]
    fn scalars_are_encoded() {
        let applied = vec![
            pair("q", "red shoes & more"),
            pair("page", 2_i64),
            pair("ratio", 0.5),
            pair("archived", false),
        ];
        assert_eq!(
            query_string(&applied),
            "q=red+shoes+%26+more&page=2&ratio=0.5&archived=false"
        );
    }

    #[test]
    fn objects_are_json_under_one_key() {
        let mut range = Map::new();
        range.insert("from".to_string(), JsonValue::from("2024-01-01"));
        let applied = vec![pair("created", FilterValue::Object(range))];

        assert_eq!(
            query_string(&applied),
            "created=%7B%22from%22%3A%222024-01-01%22%7D"
        );
    }

    #[test]
    fn parse_groups_repeated_keys_and_uses_config() {
        let config = FilterConfig::new(vec![
            FilterConfigItem::new(FilterKind::Checkbox, "tags", "Tags"),
            FilterConfigItem::new(FilterKind::Number, "min", "Min"),
        ]);

        let parsed = parse_query("?status=active&tags=a&min=3&owner=x&owner=y&q=", &config);
        assert_eq!(
            parsed,
            vec![
                pair("status", "active"),
                pair("tags", vec!["a"]),
                pair("min", 3.0),
                pair("owner", vec!["x", "y"]),
            ]
        );
    }

    #[test]
    fn number_items_fall_back_to_text() {
        let config = FilterConfig::new(vec![FilterConfigItem::new(FilterKind::Number, "min", "Min")]);
        assert_eq!(parse_query("min=lots", &config), vec![pair("min", "lots")]);
    }

    #[test]
    fn parse_recovers_encoded_text_and_lists() {
        let applied = vec![pair("q", "a b/c"), pair("tags", vec!["x", "y"])];
        let parsed = parse_query(&query_string(&applied), &FilterConfig::default());
        assert_eq!(parsed, applied);
    }
}
