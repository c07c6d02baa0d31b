//! Expansion stage.

use crate::model::row::RowArena;
use crate::model::state::Expanded;

use super::RowTree;

/// Walks the rows of a page depth first, descending only into expanded rows.
///
/// Yields `(arena index, position of the top-level ancestor on the page)`.
pub(super) fn expand_rows<T>(
    arena: &RowArena<T>,
    tree: &RowTree,
    page_roots: &[usize],
    expanded: &Expanded,
) -> Vec<(usize, usize)> {
    let mut out = Vec::with_capacity(page_roots.len());
    for (position, &root) in page_roots.iter().enumerate() {
        push_expanded(arena, tree, root, position, expanded, &mut out);
    }
    out
}

fn push_expanded<T>(
    arena: &RowArena<T>,
    tree: &RowTree,
    index: usize,
    position: usize,
    expanded: &Expanded,
    out: &mut Vec<(usize, usize)>,
) {
    out.push((index, position));
    if expanded.is_expanded(arena[index].id()) {
        for &child in tree.children(index) {
            push_expanded(arena, tree, child, position, expanded, out);
        }
    }
}
