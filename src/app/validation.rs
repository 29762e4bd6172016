//! Pluggable validation of sheet form values.
//!
//! The sheet only knows the [`Validator`] contract: hand over the form values,
//! get back either the (possibly normalized) values or per-field errors. Any
//! schema library can sit behind it. [`RuleSchema`] is a small built-in
//! implementation that covers what filter inputs usually need, and plain
//! closures work too.
//!
//! # Example
//!
//! ```rust
//! use filter_sheet::app::{FormValues, Rule, RuleSchema, ValidationOutcome, Validator};
//!
//! let schema = RuleSchema::new()
//!     .field("q", Rule::MaxLength(5))
//!     .field("from", Rule::Date);
//!
//! let values: FormValues = [("q", "too long"), ("from", "2024-02-30")].into_iter().collect();
//! let ValidationOutcome::Invalid(errors) = schema.validate(&values) else {
//!     panic!("expected errors");
//! };
//! assert_eq!(errors.len(), 2);
//! ```

use super::form::{FieldErrors, FormValues};
use crate::domain::value::FilterValue;
use crate::filters::config::{FilterConfig, FilterKind};
use chrono::NaiveDate;

/// Result of validating form values.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// Values passed; these are the values to apply.
    Valid(FormValues),
    /// At least one field failed.
    Invalid(FieldErrors),
}

/// Anything that can check a set of form values.
pub trait Validator {
    fn validate(&self, values: &FormValues) -> ValidationOutcome;
}

impl<F> Validator for F
where
    F: Fn(&FormValues) -> ValidationOutcome,
{
    fn validate(&self, values: &FormValues) -> ValidationOutcome {
        self(values)
    }
}

/// Validator that accepts every value unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl Validator for AcceptAll {
    fn validate(&self, values: &FormValues) -> ValidationOutcome {
        ValidationOutcome::Valid(values.clone())
    }
}

/// A single check applied to one field.
///
/// Every rule except [`Rule::Required`] passes on values that are not applied
/// (empty text, empty list, `Null`), so optional filters stay optional.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Required,
    /// Minimum characters for text, minimum selections for lists.
    MinLength(usize),
    /// Maximum characters for text, maximum selections for lists.
    MaxLength(usize),
    /// Text or every list element must be one of these values.
    OneOf(Vec<String>),
    /// `YYYY-MM-DD` calendar date.
    Date,
    /// `#rgb` or `#rrggbb` hex color.
    Color,
    /// Numeric bounds. Numeric text is accepted and normalized to a number.
    Range { min: Option<f64>, max: Option<f64> },
}

impl Rule {
    /// Checks `value`, returning the error message on failure.
    ///
    /// # Errors
    ///
    /// Returns a user-facing message describing the failed check.
    pub fn check(&self, value: &FilterValue) -> Result<(), String> {
        if let Self::Required = self {
            return if value.is_applied() {
                Ok(())
            } else {
                Err("This field is required".to_string())
            };
        }
        if !value.is_applied() {
            return Ok(());
        }

        match (self, value) {
            (Self::MinLength(min), FilterValue::Text(text)) if text.chars().count() < *min => {
                Err(format!("Must be at least {min} characters"))
            }
            (Self::MinLength(min), FilterValue::List(items)) if items.len() < *min => {
                Err(format!("Select at least {min}"))
            }
            (Self::MaxLength(max), FilterValue::Text(text)) if text.chars().count() > *max => {
                Err(format!("Must be at most {max} characters"))
            }
            (Self::MaxLength(max), FilterValue::List(items)) if items.len() > *max => {
                Err(format!("Select at most {max}"))
            }
            (Self::OneOf(allowed), FilterValue::Text(text)) if !allowed.contains(text) => {
                Err(format!("Unknown option: {text}"))
            }
            (Self::OneOf(allowed), FilterValue::List(items)) => items
                .iter()
                .find(|item| !allowed.contains(item))
                .map_or(Ok(()), |item| Err(format!("Unknown option: {item}"))),
            (Self::Date, FilterValue::Text(text)) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .map(|_| ())
                .map_err(|_| "Must be a date (YYYY-MM-DD)".to_string()),
            (Self::Date, _) => Err("Must be a date (YYYY-MM-DD)".to_string()),
            (Self::Color, FilterValue::Text(text)) if is_hex_color(text) => Ok(()),
            (Self::Color, _) => Err("Must be a hex color".to_string()),
            (Self::Range { min, max }, value) => {
                let number = as_number(value).ok_or_else(|| "Must be a number".to_string())?;
                if min.is_some_and(|min| number < min) {
                    return Err(format!("Must be at least {}", min.unwrap_or_default()));
                }
                if max.is_some_and(|max| number > max) {
                    return Err(format!("Must be at most {}", max.unwrap_or_default()));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

fn is_hex_color(text: &str) -> bool {
    text.strip_prefix('#').is_some_and(|hex| {
        matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
    })
}

fn as_number(value: &FilterValue) -> Option<f64> {
    match value {
        FilterValue::Number(number) if !number.is_nan() => Some(*number),
        FilterValue::Text(text) => text.trim().parse::<f64>().ok().filter(|n| !n.is_nan()),
        _ => None,
    }
}

/// Per-field rule lists, checked in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSchema {
    fields: Vec<(String, Vec<Rule>)>,
}

impl RuleSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule to a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, rule: Rule) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some((_, rules)) => rules.push(rule),
            None => self.fields.push((name, vec![rule])),
        }
        self
    }

    /// Derives the checks implied by a filter configuration.
    ///
    /// Choice kinds get [`Rule::OneOf`] over their option values (when they
    /// have options), dates get [`Rule::Date`], colors [`Rule::Color`] and
    /// numbers an unbounded [`Rule::Range`].
    #[must_use]
    pub fn from_config(config: &FilterConfig) -> Self {
        config.iter().fold(Self::new(), |schema, item| match item.kind {
            kind if kind.has_options() && !item.options.is_empty() => schema.field(
                item.name.clone(),
                Rule::OneOf(item.options.iter().map(|option| option.value.clone()).collect()),
            ),
            FilterKind::Date => schema.field(item.name.clone(), Rule::Date),
            FilterKind::Color => schema.field(item.name.clone(), Rule::Color),
            FilterKind::Number => {
                schema.field(item.name.clone(), Rule::Range { min: None, max: None })
            }
            _ => schema,
        })
    }
}

impl Validator for RuleSchema {
    fn validate(&self, values: &FormValues) -> ValidationOutcome {
        let _span = tracing::debug_span!("rule_schema_validate", fields = self.fields.len()).entered();

        let mut errors = FieldErrors::default();
        let mut output = values.clone();

        for (name, rules) in &self.fields {
            let value = values.get(name).cloned().unwrap_or(FilterValue::Null);
            for rule in rules {
                if let Err(message) = rule.check(&value) {
                    errors.add(name.clone(), message);
                    break;
                }
                if matches!(rule, Rule::Range { .. }) && value.is_applied() {
                    if let Some(number) = as_number(&value) {
                        output.set(name.clone(), number);
                    }
                }
            }
        }

        if errors.is_empty() {
            ValidationOutcome::Valid(output)
        } else {
            tracing::debug!(error_count = errors.len(), "validation failed");
            ValidationOutcome::Invalid(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::config::{FilterConfigItem, FilterOption};

    #[test]
    fn optional_rules_skip_empty_values() {
        for rule in [
            Rule::MinLength(3),
            Rule::Date,
            Rule::Color,
            Rule::OneOf(vec!["a".into()]),
            Rule::Range { min: Some(1.0), max: None },
        ] {
            assert_eq!(rule.check(&FilterValue::from("")), Ok(()), "{rule:?}");
            assert_eq!(rule.check(&FilterValue::Null), Ok(()), "{rule:?}");
        }
        assert!(Rule::Required.check(&FilterValue::List(Vec::new())).is_err());
    }

    #[test]
    fn date_and_color_formats() {
        assert!(Rule::Date.check(&"2024-02-29".into()).is_ok());
        assert!(Rule::Date.check(&"2023-02-29".into()).is_err());
        assert!(Rule::Date.check(&"29/02/2024".into()).is_err());
        assert!(Rule::Color.check(&"#fff".into()).is_ok());
        assert!(Rule::Color.check(&"#A0b1C2".into()).is_ok());
        assert!(Rule::Color.check(&"fff".into()).is_err());
        assert!(Rule::Color.check(&"#ggg".into()).is_err());
    }

    #[test]
    fn range_normalizes_numeric_text() {
        let schema = RuleSchema::new().field("min", Rule::Range { min: Some(0.0), max: Some(10.0) });

        let values: FormValues = [("min", "4")].into_iter().collect();
        assert_eq!(
            schema.validate(&values),
            ValidationOutcome::Valid([("min", 4.0)].into_iter().collect())
        );

        let values: FormValues = [("min", "11")].into_iter().collect();
        let ValidationOutcome::Invalid(errors) = schema.validate(&values) else {
            panic!("expected range error");
        };
        assert_eq!(errors.get("min"), Some("Must be at most 10"));
    }

    #[test]
    fn first_failing_rule_wins() {
        let schema = RuleSchema::new()
            .field("q", Rule::Required)
            .field("q", Rule::MinLength(2));

        let values: FormValues = [("q", "")].into_iter().collect();
        let ValidationOutcome::Invalid(errors) = schema.validate(&values) else {
            panic!("expected errors");
        };
        assert_eq!(errors.get("q"), Some("This field is required"));
    }

    #[test]
    fn schema_from_config_checks_options() {
        let config = FilterConfig::new(vec![
            FilterConfigItem::new(FilterKind::Checkbox, "tags", "Tags")
                .with_options(vec![FilterOption::new("Red", "red")]),
            FilterConfigItem::new(FilterKind::Text, "q", "Search"),
        ]);
        let schema = RuleSchema::from_config(&config);

        let ok = [("tags", FilterValue::from(vec!["red"])), ("q", FilterValue::from("x"))];
        assert!(matches!(
            schema.validate(&ok.into_iter().collect()),
            ValidationOutcome::Valid(_)
        ));

        let bad: FormValues = [("tags", vec!["red", "blue"])].into_iter().collect();
        let ValidationOutcome::Invalid(errors) = schema.validate(&bad) else {
            panic!("expected option error");
        };
        assert_eq!(errors.get("tags"), Some("Unknown option: blue"));
    }

    #[test]
    fn closures_are_validators() {
        let reject_all = |_: &FormValues| {
            let mut errors = FieldErrors::default();
            errors.add("q", "nope");
            ValidationOutcome::Invalid(errors)
        };
        assert!(matches!(
            reject_all.validate(&FormValues::default()),
            ValidationOutcome::Invalid(_)
        ));
    }
}
