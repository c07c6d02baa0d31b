//! The mutable grid state.
//!
//! [`GridState`] holds everything the user can change: sorting, filters,
//! pagination, expansion, selection and column layout. It is plain data and
//! (de)serializes with serde, so hosts can persist and restore it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::filter::NumericFilterMask;

use super::columns::ColumnLayout;
use super::row::RowId;
use super::selection::SelectionTracker;
use super::value::CellValue;

/// Default number of top-level rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Direction of a sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Returns `true` for descending order.
    pub fn is_descending(self) -> bool {
        self == SortDirection::Descending
    }
}

/// One entry of the ordered sort state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortKey {
    pub column_id: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(column_id: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column_id: column_id.into(),
            direction,
        }
    }
}

/// The active filter of a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterValue {
    /// Free text: case-insensitive substring match, or weak equality against
    /// non-text cells.
    Text(String),
    /// Exact value.
    Equals(CellValue),
    /// Numeric bands, usually parsed from filter text.
    Range(NumericFilterMask),
}

/// A column's filter entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnFilter {
    pub column_id: String,
    pub value: FilterValue,
}

/// Page position and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Which rows show their children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expanded {
    /// Every row is expanded.
    All,
    /// Only the listed rows are expanded.
    Rows(BTreeSet<RowId>),
}

impl Default for Expanded {
    fn default() -> Self {
        Expanded::Rows(BTreeSet::new())
    }
}

impl Expanded {
    /// Returns `true` if the row is expanded.
    pub fn is_expanded(&self, id: &RowId) -> bool {
        match self {
            Expanded::All => true,
            Expanded::Rows(rows) => rows.contains(id),
        }
    }

    /// Returns `true` if nothing is expanded.
    pub fn is_empty(&self) -> bool {
        matches!(self, Expanded::Rows(rows) if rows.is_empty())
    }
}

/// The complete user-controlled state of a grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridState {
    /// Sort keys, most significant first.
    pub sorting: Vec<SortKey>,
    /// Active column filters, in the order they were first set.
    pub column_filters: Vec<ColumnFilter>,
    pub pagination: Pagination,
    pub expanded: Expanded,
    pub row_selection: SelectionTracker,
    /// Column order and explicit widths.
    pub column_layout: ColumnLayout,
}

impl GridState {
    /// A fresh state for the given columns and page size.
    pub fn new<'a>(column_ids: impl IntoIterator<Item = &'a str>, page_size: usize) -> Self {
        let mut state = Self::default();
        state.pagination.page_size = page_size;
        state.column_layout.sync(column_ids);
        state
    }

    /// Position and direction of a column in the sort state.
    pub fn sort_of(&self, column_id: &str) -> Option<(usize, SortDirection)> {
        self.sorting
            .iter()
            .position(|key| key.column_id == column_id)
            .map(|position| (position, self.sorting[position].direction))
    }

    /// The active filter value of a column.
    pub fn filter_value(&self, column_id: &str) -> Option<&FilterValue> {
        self.column_filters
            .iter()
            .find(|filter| filter.column_id == column_id)
            .map(|filter| &filter.value)
    }

    /// Sets or clears a column's filter. Returns `true` if the state changed.
    pub fn set_filter_value(&mut self, column_id: &str, value: Option<FilterValue>) -> bool {
        let position = self.column_filters.iter().position(|filter| filter.column_id == column_id);
        match (position, value) {
            (Some(position), Some(value)) => {
                let entry = &mut self.column_filters[position].value;
                if *entry == value {
                    return false;
                }
                *entry = value;
                true
            }
            (Some(position), None) => {
                self.column_filters.remove(position);
                true
            }
            (None, Some(value)) => {
                self.column_filters.push(ColumnFilter {
                    column_id: column_id.to_string(),
                    value,
                });
                true
            }
            (None, None) => false,
        }
    }

    /// Drops entries that refer to columns not in `column_ids` and brings the
    /// column layout in line with the definitions.
    pub fn sync_columns<'a>(&mut self, column_ids: impl IntoIterator<Item = &'a str> + Clone) {
        let known = |id: &str| column_ids.clone().into_iter().any(|known| known == id);
        self.sorting.retain(|key| known(&key.column_id));
        self.column_filters.retain(|filter| known(&filter.column_id));
        self.column_layout.sync(column_ids.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = GridState::new(["name", "age"], 10);
        assert_eq!(state.pagination, Pagination { page_index: 0, page_size: 10 });
        assert_eq!(state.column_layout.order(), ["name", "age"]);
        assert!(state.expanded.is_empty());
        assert!(state.row_selection.is_empty());
    }

    #[test]
    fn test_set_filter_value() {
        let mut state = GridState::default();
        assert!(state.set_filter_value("name", Some(FilterValue::Text("ann".into()))));
        assert!(!state.set_filter_value("name", Some(FilterValue::Text("ann".into()))));
        assert!(state.set_filter_value("age", Some(FilterValue::Equals(CellValue::Int(3)))));
        assert_eq!(state.filter_value("name"), Some(&FilterValue::Text("ann".into())));

        assert!(state.set_filter_value("name", None));
        assert!(!state.set_filter_value("name", None));
        assert_eq!(state.column_filters.len(), 1);
    }

    #[test]
    fn test_sync_drops_stale_entries() {
        let mut state = GridState::new(["a", "b", "c"], DEFAULT_PAGE_SIZE);
        state.sorting.push(SortKey::new("b", SortDirection::Ascending));
        state.sorting.push(SortKey::new("c", SortDirection::Descending));
        state.set_filter_value("c", Some(FilterValue::Text("x".into())));

        state.sync_columns(["a", "b", "d"]);

        assert_eq!(state.sorting, vec![SortKey::new("b", SortDirection::Ascending)]);
        assert!(state.column_filters.is_empty());
        assert_eq!(state.column_layout.order(), ["a", "b", "d"]);
        assert_eq!(state.sort_of("b"), Some((0, SortDirection::Ascending)));
    }

    #[test]
    fn test_expanded() {
        let mut rows = BTreeSet::new();
        rows.insert(RowId::from("0"));
        let expanded = Expanded::Rows(rows);
        assert!(expanded.is_expanded(&RowId::from("0")));
        assert!(!expanded.is_expanded(&RowId::from("1")));
        assert!(Expanded::All.is_expanded(&RowId::from("1")));
    }

    #[test]
    fn test_state_round_trips_through_json() {
        let mut state = GridState::new(["name"], 5);
        state.sorting.push(SortKey::new("name", SortDirection::Descending));
        state.expanded = Expanded::All;
        state.row_selection.set_selected(RowId::from("0.1"), true);

        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"desc\""));
        let restored: GridState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let state: GridState = serde_json::from_str("{}").unwrap();
        assert_eq!(state.pagination.page_size, DEFAULT_PAGE_SIZE);
        assert!(state.sorting.is_empty());
    }
}
