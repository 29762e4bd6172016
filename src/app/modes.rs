//! Sheet visibility state.
//!
//! The sheet is either closed or open. There are no partial or nested states:
//! every event either moves between these two or leaves the mode alone.

/// Whether the filter sheet is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SheetMode {
    /// Hidden. Form state is empty.
    #[default]
    Closed,

    /// Showing, with form values seeded from the store.
    Open,
}
