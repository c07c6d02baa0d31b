//! Column order and sizing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::column::ColumnDef;

/// Which side of the target column a dragged column lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropSide {
    Before,
    After,
}

/// Visual order and explicit widths of the columns.
///
/// The order is kept a permutation of the column ids passed to
/// [`sync`](Self::sync); reordering never adds or loses a column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnLayout {
    order: Vec<String>,
    sizing: HashMap<String, f32>,
}

impl ColumnLayout {
    /// A layout in definition order with default widths.
    pub fn new<'a>(column_ids: impl IntoIterator<Item = &'a str>) -> Self {
        let mut layout = Self::default();
        layout.sync(column_ids);
        layout
    }

    /// Column ids in visual order.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Visual position of a column.
    pub fn visual_index(&self, column_id: &str) -> Option<usize> {
        self.order.iter().position(|id| id == column_id)
    }

    /// Brings the layout in line with the current definitions.
    ///
    /// Unknown and duplicate ids are dropped, missing ids are appended in
    /// definition order, and widths of removed columns are forgotten.
    pub fn sync<'a>(&mut self, column_ids: impl IntoIterator<Item = &'a str>) {
        let ids: Vec<&str> = column_ids.into_iter().collect();

        let mut seen = Vec::with_capacity(self.order.len());
        self.order.retain(|id| {
            let keep = ids.contains(&id.as_str()) && !seen.contains(id);
            if keep {
                seen.push(id.clone());
            }
            keep
        });
        for id in &ids {
            if !self.order.iter().any(|existing| existing == *id) {
                self.order.push((*id).to_string());
            }
        }
        self.sizing.retain(|id, _| ids.contains(&id.as_str()));
    }

    /// Moves `source` next to `target`, taking over the target's position.
    ///
    /// The source lands after the target when moving right and before it
    /// when moving left. Returns `false` (and changes nothing) for unknown
    /// ids or when source and target are the same column.
    pub fn reorder(&mut self, source: &str, target: &str) -> bool {
        let (Some(from), Some(to)) = (self.visual_index(source), self.visual_index(target)) else {
            return false;
        };
        if from == to {
            return false;
        }

        let id = self.order.remove(from);
        self.order.insert(to, id);
        true
    }

    /// Moves `source` directly before or after `target`.
    pub fn move_column(&mut self, source: &str, target: &str, side: DropSide) -> bool {
        if source == target {
            return false;
        }
        let Some(from) = self.visual_index(source) else {
            return false;
        };
        if self.visual_index(target).is_none() {
            return false;
        }

        let id = self.order.remove(from);
        let target_pos = self.visual_index(target).unwrap_or(from);
        let insert_pos = match side {
            DropSide::Before => target_pos,
            DropSide::After => target_pos + 1,
        };
        let changed = insert_pos != from;
        self.order.insert(insert_pos, id);
        changed
    }

    /// Explicit width of a column, if it was resized.
    pub fn explicit_width(&self, column_id: &str) -> Option<f32> {
        self.sizing.get(column_id).copied()
    }

    /// Current width of a column: its explicit width, else its default size.
    pub fn width<T>(&self, column: &ColumnDef<T>) -> f32 {
        self.explicit_width(column.id())
            .map_or_else(|| column.size(), |width| column.clamp_size(width))
    }

    /// Adds `delta` to a column's width, clamped to its bounds.
    ///
    /// Returns the new width, or `None` if the column is not resizable or
    /// `delta` is not finite.
    pub fn resize<T>(&mut self, column: &ColumnDef<T>, delta: f32) -> Option<f32> {
        if !column.is_resizable() || !delta.is_finite() {
            return None;
        }
        let width = column.clamp_size(self.width(column) + delta);
        self.sizing.insert(column.id().to_string(), width);
        Some(width)
    }

    /// Forgets a column's explicit width. Returns `true` if it had one.
    pub fn reset_size(&mut self, column_id: &str) -> bool {
        self.sizing.remove(column_id).is_some()
    }
}
