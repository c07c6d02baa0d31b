//! Grid mutation commands.

use serde::{Deserialize, Serialize};

use crate::model::{DropSide, FilterValue, RowId};

/// Every way the grid state can be changed.
///
/// The rendering layer turns user input into commands and hands them to
/// [`GridController::dispatch`](super::GridController::dispatch). Commands
/// are plain data, so they can be logged, queued or replayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GridCommand {
    /// Cycle a column through first direction, opposite direction, unsorted.
    /// `multi` keeps the other sort keys.
    ToggleSort { column_id: String, multi: bool },
    /// Set or clear a column's filter value.
    SetFilter {
        column_id: String,
        value: Option<FilterValue>,
    },
    ClearFilters,
    SetPage { page_index: usize },
    NextPage,
    PreviousPage,
    SetPageSize { page_size: usize },
    ToggleExpand { row_id: RowId },
    ToggleExpandAll,
    ToggleRowSelected { row_id: RowId },
    ToggleAllSelected,
    /// Move `source` to `target`'s position.
    ReorderColumn { source: String, target: String },
    /// Move `source` to one side of `target`.
    MoveColumn {
        source: String,
        target: String,
        side: DropSide,
    },
    /// Add `delta` pixels to a column's width.
    ResizeColumn { column_id: String, delta: f32 },
    ResetColumnSize { column_id: String },
}

impl GridCommand {
    /// Returns `true` if the command changes the row selection.
    pub fn affects_selection(&self) -> bool {
        matches!(
            self,
            GridCommand::ToggleRowSelected { .. } | GridCommand::ToggleAllSelected
        )
    }
}
