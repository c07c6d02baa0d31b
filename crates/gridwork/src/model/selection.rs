//! Row selection.
//!
//! [`SelectionTracker`] records which row ids are selected. Selection is keyed
//! by identity, so it survives filtering, sorting and paging: a row that is
//! filtered out keeps its selected flag and shows it again when it comes back.
//!
//! # Example
//!
//! ```
//! use gridwork::model::{RowId, SelectionSummary, SelectionTracker};
//!
//! let filtered = [RowId::from("0"), RowId::from("1"), RowId::from("2")];
//! let mut selection = SelectionTracker::new();
//!
//! selection.toggle_row(&filtered[0], &[]);
//! assert_eq!(selection.summary(&filtered), SelectionSummary::Some);
//!
//! selection.toggle_all(&filtered);
//! assert_eq!(selection.summary(&filtered), SelectionSummary::All);
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::row::RowId;

/// Aggregate selection state over a set of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionSummary {
    /// Every row is selected and there is at least one row.
    All,
    /// At least one row, but not every row, is selected.
    Some,
    /// No row is selected.
    #[default]
    None,
}

/// Selection display state of a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowSelectionState {
    /// The row itself is selected.
    pub selected: bool,
    /// Some, but not all, of the row's descendants are selected.
    pub some_selected: bool,
}

/// The set of selected row ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionTracker {
    selected: HashSet<RowId>,
}

impl SelectionTracker {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a row is selected.
    pub fn is_selected(&self, id: &RowId) -> bool {
        self.selected.contains(id)
    }

    /// Number of selected ids, including ids of rows no longer present.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Iterates over the selected ids in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &RowId> {
        self.selected.iter()
    }

    /// Selects or deselects one row. Returns `true` if anything changed.
    pub fn set_selected(&mut self, id: RowId, selected: bool) -> bool {
        if selected {
            self.selected.insert(id)
        } else {
            self.selected.remove(&id)
        }
    }

    /// Flips a row and applies its new value to `descendants`.
    ///
    /// Returns the row's new selected flag.
    pub fn toggle_row<'a>(
        &mut self,
        id: &RowId,
        descendants: impl IntoIterator<Item = &'a RowId>,
    ) -> bool {
        let selected = !self.is_selected(id);
        self.set_selected(id.clone(), selected);
        for descendant in descendants {
            self.set_selected(descendant.clone(), selected);
        }
        selected
    }

    /// Toggles "select all" over the filtered rows.
    ///
    /// If every filtered row is selected they are all deselected; otherwise
    /// they are all selected. Rows outside `filtered` are left alone.
    pub fn toggle_all<'a, I>(&mut self, filtered: I)
    where
        I: IntoIterator<Item = &'a RowId>,
        I::IntoIter: Clone,
    {
        let rows = filtered.into_iter();
        let select = self.summary(rows.clone()) != SelectionSummary::All;
        for id in rows {
            self.set_selected(id.clone(), select);
        }
    }

    /// Aggregate state over a set of rows.
    pub fn summary<'a>(&self, rows: impl IntoIterator<Item = &'a RowId>) -> SelectionSummary {
        let mut total = 0usize;
        let mut selected = 0usize;
        for id in rows {
            total += 1;
            if self.is_selected(id) {
                selected += 1;
            }
        }
        match selected {
            0 => SelectionSummary::None,
            n if n == total => SelectionSummary::All,
            _ => SelectionSummary::Some,
        }
    }

    /// Display state of a row given its filtered descendants.
    pub fn row_state<'a>(
        &self,
        id: &RowId,
        descendants: impl IntoIterator<Item = &'a RowId>,
    ) -> RowSelectionState {
        RowSelectionState {
            selected: self.is_selected(id),
            some_selected: self.summary(descendants) == SelectionSummary::Some,
        }
    }

    /// Deselects everything.
    pub fn clear(&mut self) {
        self.selected.clear();
    }
}
