//! Sort stage.

use std::cmp::Ordering;

use crate::model::column::ColumnDef;
use crate::model::row::RowArena;
use crate::model::state::{SortDirection, SortKey};
use crate::model::value::{CellValue, TextCollator};

use super::RowTree;

/// Compares two cells of a column for one sort key.
///
/// Empty cells always sort after non-empty ones, in either direction. Other
/// values use the column's comparator if it has one, else the default
/// ordering, reversed for descending keys.
pub fn compare_cells<T>(
    column: &ColumnDef<T>,
    direction: SortDirection,
    a: &CellValue,
    b: &CellValue,
    collator: &TextCollator,
) -> Ordering {
    match (a.is_none(), b.is_none()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ordering = match column.compare_fn() {
                Some(compare) => compare(a, b),
                None => a.compare(b, collator),
            };
            if direction.is_descending() {
                ordering.reverse()
            } else {
                ordering
            }
        }
    }
}

pub(super) fn sort_rows<T>(
    tree: &mut RowTree,
    arena: &RowArena<T>,
    columns: &[ColumnDef<T>],
    sorting: &[SortKey],
    collator: &TextCollator,
) {
    let keys: Vec<(&ColumnDef<T>, SortDirection)> = sorting
        .iter()
        .filter_map(|key| {
            columns
                .iter()
                .find(|column| column.id() == key.column_id && column.is_sortable())
                .map(|column| (column, key.direction))
        })
        .collect();
    if keys.is_empty() {
        return;
    }

    sort_group(&mut tree.roots, arena, &keys, collator);
    for group in &mut tree.children {
        sort_group(group, arena, &keys, collator);
    }
}

/// Stable sort of one sibling group. Cell values are extracted once per row.
fn sort_group<T>(
    group: &mut Vec<usize>,
    arena: &RowArena<T>,
    keys: &[(&ColumnDef<T>, SortDirection)],
    collator: &TextCollator,
) {
    if group.len() < 2 {
        return;
    }

    let mut decorated: Vec<(usize, Vec<CellValue>)> = group
        .iter()
        .map(|&index| {
            let data = arena[index].data();
            (index, keys.iter().map(|(column, _)| column.value(data)).collect())
        })
        .collect();

    decorated.sort_by(|(_, a), (_, b)| {
        keys.iter()
            .zip(a.iter().zip(b))
            .map(|((column, direction), (left, right))| compare_cells(column, *direction, left, right, collator))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });

    group.clear();
    group.extend(decorated.into_iter().map(|(index, _)| index));
}
