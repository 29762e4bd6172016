//! Renderable snapshot of the sheet.
//!
//! Renderers receive plain data: one [`FieldView`] per visible input with its
//! current value and error, plus the active-filter chips shown outside the
//! sheet. Edits come back as [`Event::SetField`](crate::app::Event::SetField).

use crate::domain::value::FilterValue;
use crate::filters::config::{FilterKind, FilterOption};

#[derive(Debug, Clone, PartialEq)]
pub struct SheetViewModel {
    pub is_open: bool,
    /// Empty while the sheet is closed.
    pub fields: Vec<FieldView>,
    pub chips: Vec<FilterChip>,
    /// Badge count for the filter button.
    pub applied_count: usize,
}

/// One input as the renderer should show it.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub name: String,
    pub label: String,
    pub kind: FilterKind,
    pub placeholder: Option<String>,
    pub options: Vec<FilterOption>,
    pub multiple: bool,
    pub value: FilterValue,
    pub error: Option<String>,
}

/// Removable badge for one visible applied filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChip {
    pub name: String,
    pub label: String,
    pub value_label: String,
}
