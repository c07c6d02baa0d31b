//! The computed, ready-to-render view.

use serde::Serialize;

use super::row::RowId;
use super::selection::SelectionSummary;
use super::state::SortDirection;

/// Row striping parity, inherited from the top-level ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stripe {
    Even,
    Odd,
}

impl Stripe {
    /// Parity of a zero-based position.
    pub fn of(position: usize) -> Self {
        if position % 2 == 0 { Stripe::Even } else { Stripe::Odd }
    }
}

/// One row as it should be rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleRow {
    pub id: RowId,
    /// Position in the row arena, for looking up the record.
    pub index: usize,
    pub depth: usize,
    /// The row has children left after filtering.
    pub can_expand: bool,
    pub is_expanded: bool,
    pub selected: bool,
    /// Some, but not all, filtered descendants are selected.
    pub some_selected: bool,
    pub stripe: Stripe,
}

/// One column as it should be rendered, in visual order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnView {
    pub id: String,
    pub header: String,
    pub width: f32,
    pub resizable: bool,
    pub sortable: bool,
    pub sort: Option<SortDirection>,
    /// Position among the sort keys, most significant first.
    pub sort_index: Option<usize>,
    pub filterable: bool,
    pub filtered: bool,
    /// The last filter text for this column failed to parse.
    pub filter_error: bool,
}

/// Footer counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RowCounts {
    /// Rows in the supplied data, descendants included.
    pub total: usize,
    /// Rows surviving the filters, descendants included.
    pub filtered: usize,
    /// Selected rows that exist in the supplied data.
    pub selected: usize,
}

/// Pagination summary after clamping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page_index: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub can_previous: bool,
    pub can_next: bool,
}

/// Everything the rendering layer needs for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedRowSet {
    pub rows: Vec<VisibleRow>,
    pub columns: Vec<ColumnView>,
    pub counts: RowCounts,
    pub page: PageInfo,
    /// Selection state over all filtered rows, for the "select all" checkbox.
    pub selection: SelectionSummary,
}

impl DerivedRowSet {
    /// Number of visible rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Looks up a visible row by id.
    pub fn row(&self, id: &str) -> Option<&VisibleRow> {
        self.rows.iter().find(|row| row.id.as_str() == id)
    }

    /// Visible row ids in display order.
    pub fn row_ids(&self) -> impl Iterator<Item = &RowId> {
        self.rows.iter().map(|row| &row.id)
    }

    /// Looks up a column by id.
    pub fn column(&self, id: &str) -> Option<&ColumnView> {
        self.columns.iter().find(|column| column.id == id)
    }
}
