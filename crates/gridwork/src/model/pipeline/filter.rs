//! Filter stage.

use serde::{Deserialize, Serialize};

use crate::filter::parse_filter;
use crate::model::column::{ColumnDef, FilterKind};
use crate::model::row::RowArena;
use crate::model::state::{ColumnFilter, FilterValue};
use crate::model::value::CellValue;

use super::RowTree;

/// How filtering treats parents and children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// A row is kept if it passes and its parent was kept.
    #[default]
    FromRoot,
    /// A row is kept if it passes or any of its descendants is kept.
    FromLeafRows,
}

/// Tests a cell value against a filter value using a column's filter kind.
pub fn matches_filter(kind: &FilterKind, cell: &CellValue, value: &FilterValue) -> bool {
    match (kind, value) {
        (FilterKind::Custom(filter), value) => filter(cell, value),
        (_, FilterValue::Range(mask)) => mask.matches(cell.as_number()),
        (_, FilterValue::Equals(expected)) => cell == expected,
        (FilterKind::IncludesText, FilterValue::Text(text)) => includes_text(cell, text),
        (FilterKind::Equals, FilterValue::Text(text)) => weak_equals(cell, text),
        (FilterKind::NumericRange, FilterValue::Text(text)) => {
            // Unparsable text places no constraint.
            parse_filter(text).map_or(true, |mask| mask.matches(cell.as_number()))
        }
        (FilterKind::Auto, FilterValue::Text(text)) => match cell {
            CellValue::Text(_) => includes_text(cell, text),
            _ => weak_equals(cell, text),
        },
    }
}

fn includes_text(cell: &CellValue, text: &str) -> bool {
    cell.to_string().to_lowercase().contains(&text.to_lowercase())
}

fn weak_equals(cell: &CellValue, text: &str) -> bool {
    if cell.is_numeric() {
        return text.trim().parse::<f64>().is_ok_and(|n| n == cell.as_number());
    }
    !cell.is_none() && cell.to_string() == text
}

pub(super) fn filter_rows<T>(
    arena: &RowArena<T>,
    columns: &[ColumnDef<T>],
    filters: &[ColumnFilter],
    mode: FilterMode,
) -> RowTree {
    let active: Vec<(&ColumnDef<T>, &FilterValue)> = filters
        .iter()
        .filter_map(|filter| {
            columns
                .iter()
                .find(|column| column.id() == filter.column_id && column.is_filterable())
                .map(|column| (column, &filter.value))
        })
        .collect();
    if active.is_empty() {
        return RowTree::core(arena);
    }

    let passes = |index: usize| {
        let data = arena[index].data();
        active
            .iter()
            .all(|(column, value)| matches_filter(column.filter_kind(), &column.value(data), value))
    };

    let mut tree = RowTree::with_capacity(arena.len());
    tree.roots = match mode {
        FilterMode::FromRoot => keep_from_root(arena, arena.roots(), &passes, &mut tree),
        FilterMode::FromLeafRows => keep_from_leaves(arena, arena.roots(), &passes, &mut tree),
    };
    tree
}

fn keep_from_root<T>(
    arena: &RowArena<T>,
    candidates: &[usize],
    passes: &impl Fn(usize) -> bool,
    tree: &mut RowTree,
) -> Vec<usize> {
    let mut kept = Vec::new();
    for &index in candidates {
        if passes(index) {
            let children = keep_from_root(arena, arena[index].children(), passes, tree);
            tree.children[index] = children;
            kept.push(index);
        }
    }
    kept
}

fn keep_from_leaves<T>(
    arena: &RowArena<T>,
    candidates: &[usize],
    passes: &impl Fn(usize) -> bool,
    tree: &mut RowTree,
) -> Vec<usize> {
    let mut kept = Vec::new();
    for &index in candidates {
        let children = keep_from_leaves(arena, arena[index].children(), passes, tree);
        if !children.is_empty() || passes(index) {
            kept.push(index);
        }
        tree.children[index] = children;
    }
    kept
}
