//! The row model pipeline.
//!
//! [`RowModelPipeline`] turns a [`RowArena`], the column definitions and a
//! [`GridState`] into a [`DerivedRowSet`]. The stages run in a fixed order:
//!
//! 1. filter (per [`FilterMode`])
//! 2. sort every sibling group
//! 3. paginate the top-level rows
//! 4. expand the rows on the page
//! 5. stripe and annotate
//!
//! Each stage works on a [`RowTree`] of arena indices, never on the records.
//! The pipeline is pure: the same inputs always give the same output.

mod expand;
mod filter;
mod paginate;
mod sort;

use gridwork_core::logging::{span_names, targets};

pub use filter::{FilterMode, matches_filter};
pub use sort::compare_cells;

use super::column::ColumnDef;
use super::derived::{ColumnView, DerivedRowSet, RowCounts, Stripe, VisibleRow};
use super::row::{RowArena, RowId};
use super::state::GridState;
use super::value::TextCollator;

/// Which pipeline stages and row annotations are active.
///
/// A disabled stage passes its input through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridFeatures {
    /// Apply column filters.
    pub filtering: bool,
    /// Apply the sort keys.
    pub sorting: bool,
    /// Slice the visible rows into pages.
    pub pagination: bool,
    /// Annotate rows with their selection state.
    pub selection: bool,
    /// Report columns as resizable.
    pub resizing: bool,
}

impl Default for GridFeatures {
    fn default() -> Self {
        Self {
            filtering: true,
            sorting: true,
            pagination: true,
            selection: true,
            resizing: true,
        }
    }
}

/// A hierarchy of arena indices.
///
/// Starts as the supplied forest; filtering drops rows and sorting reorders
/// siblings. Child lists are indexed by arena position, rows outside the
/// tree have an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowTree {
    roots: Vec<usize>,
    children: Vec<Vec<usize>>,
}

impl RowTree {
    /// The unfiltered forest.
    pub fn core<T>(arena: &RowArena<T>) -> Self {
        Self {
            roots: arena.roots().to_vec(),
            children: arena.iter().map(|row| row.children().to_vec()).collect(),
        }
    }

    fn with_capacity(len: usize) -> Self {
        Self {
            roots: Vec::new(),
            children: vec![Vec::new(); len],
        }
    }

    /// Top-level rows in order.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Children of a row in order.
    pub fn children(&self, index: usize) -> &[usize] {
        self.children.get(index).map(Vec::as_slice).unwrap_or_default()
    }

    /// Descendants of a row, depth first.
    pub fn descendants(&self, index: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.children(index).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev());
        }
        out
    }

    /// Every row in the tree, parents before children.
    pub fn flatten(&self) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev());
        }
        out
    }
}

/// Computes the visible rows of a grid.
///
/// # Example
///
/// ```
/// use gridwork::model::{ColumnDef, GridState, RowArena, RowModelPipeline, SortDirection, SortKey, TreeRow};
///
/// let columns = vec![ColumnDef::new("n", |n: &i64| (*n).into())];
/// let arena = RowArena::from_forest(vec![TreeRow::new(3), TreeRow::new(1), TreeRow::new(2)]);
///
/// let mut state = GridState::new(["n"], 20);
/// state.sorting.push(SortKey::new("n", SortDirection::Ascending));
///
/// let derived = RowModelPipeline::new(&arena, &columns).compute(&state);
/// let values: Vec<i64> = derived.rows.iter().map(|row| *arena[row.index].data()).collect();
/// assert_eq!(values, [1, 2, 3]);
/// ```
pub struct RowModelPipeline<'a, T> {
    arena: &'a RowArena<T>,
    columns: &'a [ColumnDef<T>],
    features: GridFeatures,
    filter_mode: FilterMode,
    collator: Option<&'a TextCollator>,
}

impl<'a, T> RowModelPipeline<'a, T> {
    /// A pipeline with every stage enabled, root-first filtering and natural
    /// text ordering.
    pub fn new(arena: &'a RowArena<T>, columns: &'a [ColumnDef<T>]) -> Self {
        Self {
            arena,
            columns,
            features: GridFeatures::default(),
            filter_mode: FilterMode::default(),
            collator: None,
        }
    }

    /// Sets which stages run.
    pub fn with_features(mut self, features: GridFeatures) -> Self {
        self.features = features;
        self
    }

    /// Sets how filters treat parents and children.
    pub fn with_filter_mode(mut self, mode: FilterMode) -> Self {
        self.filter_mode = mode;
        self
    }

    /// Sets the collator used to compare text cells.
    pub fn with_collator(mut self, collator: &'a TextCollator) -> Self {
        self.collator = Some(collator);
        self
    }

    /// Runs every stage.
    pub fn compute(&self, state: &GridState) -> DerivedRowSet {
        self.run(state).0
    }

    /// Runs every stage, also returning the filtered and sorted tree.
    pub fn run(&self, state: &GridState) -> (DerivedRowSet, RowTree) {
        let _span = tracing::trace_span!(
            target: targets::PIPELINE,
            span_names::RECOMPUTE,
            rows = self.arena.len(),
            columns = self.columns.len(),
        )
        .entered();

        let natural = TextCollator::natural();
        let collator = self.collator.unwrap_or(&natural);

        let mut tree = if self.features.filtering {
            filter::filter_rows(self.arena, self.columns, &state.column_filters, self.filter_mode)
        } else {
            RowTree::core(self.arena)
        };
        let filtered = tree.flatten();

        if self.features.sorting {
            sort::sort_rows(&mut tree, self.arena, self.columns, &state.sorting, collator);
        }

        let page = paginate::page_info(tree.roots().len(), &state.pagination, self.features.pagination);
        let page_roots = paginate::page_slice(tree.roots(), &page, self.features.pagination);
        let placed = expand::expand_rows(self.arena, &tree, page_roots, &state.expanded);

        let selection = &state.row_selection;
        let rows = placed
            .into_iter()
            .map(|(index, position)| {
                let row = &self.arena[index];
                let children = tree.children(index);
                let (selected, some_selected) = if self.features.selection {
                    let descendants = self.ids(tree.descendants(index));
                    let row_state = selection.row_state(row.id(), &descendants);
                    (row_state.selected, row_state.some_selected)
                } else {
                    (false, false)
                };
                VisibleRow {
                    id: row.id().clone(),
                    index,
                    depth: row.depth(),
                    can_expand: !children.is_empty(),
                    is_expanded: !children.is_empty() && state.expanded.is_expanded(row.id()),
                    selected,
                    some_selected,
                    stripe: Stripe::of(position),
                }
            })
            .collect();

        let filtered_ids = self.ids(filtered);
        let counts = RowCounts {
            total: self.arena.len(),
            filtered: filtered_ids.len(),
            selected: selection.iter().filter(|id| self.arena.contains(id.as_str())).count(),
        };
        let summary = if self.features.selection {
            selection.summary(&filtered_ids)
        } else {
            Default::default()
        };

        tracing::trace!(
            target: targets::PIPELINE,
            filtered = counts.filtered,
            page = page.page_index,
            page_count = page.page_count,
            "row model computed"
        );

        let derived = DerivedRowSet {
            rows,
            columns: self.column_views(state),
            counts,
            page,
            selection: summary,
        };
        (derived, tree)
    }

    fn ids(&self, indices: Vec<usize>) -> Vec<RowId> {
        indices.into_iter().map(|index| self.arena[index].id().clone()).collect()
    }

    fn column_views(&self, state: &GridState) -> Vec<ColumnView> {
        let layout = &state.column_layout;
        let ordered = layout
            .order()
            .iter()
            .filter_map(|id| self.columns.iter().find(|column| column.id() == id))
            .chain(
                self.columns
                    .iter()
                    .filter(|column| layout.visual_index(column.id()).is_none()),
            );

        ordered
            .map(|column| {
                let sort = state.sort_of(column.id());
                ColumnView {
                    id: column.id().to_string(),
                    header: column.header().to_string(),
                    width: layout.width(column),
                    resizable: self.features.resizing && column.is_resizable(),
                    sortable: self.features.sorting && column.is_sortable(),
                    sort: sort.map(|(_, direction)| direction),
                    sort_index: sort.map(|(position, _)| position),
                    filterable: self.features.filtering && column.is_filterable(),
                    filtered: state.filter_value(column.id()).is_some(),
                    filter_error: false,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellValue, Expanded, FilterValue, SortDirection, SortKey, TreeRow};

    #[derive(Debug)]
    struct Item {
        name: &'static str,
        size: i64,
    }

    fn item(name: &'static str, size: i64) -> TreeRow<Item> {
        TreeRow::new(Item { name, size })
    }

    fn columns() -> Vec<ColumnDef<Item>> {
        vec![
            ColumnDef::new("name", |i: &Item| i.name.into()),
            ColumnDef::new("size", |i: &Item| i.size.into()),
        ]
    }

    fn hierarchy() -> RowArena<Item> {
        RowArena::from_forest(vec![
            item("A", 3).with_sub_rows([item("AA", 2).with_sub_rows([item("AAA", 1)])]),
            item("B", 2).with_sub_rows([item("BA", 5), item("BB", 4)]),
            item("C", 1),
        ])
    }

    fn names(arena: &RowArena<Item>, derived: &DerivedRowSet) -> Vec<&'static str> {
        derived.rows.iter().map(|row| arena[row.index].data().name).collect()
    }

    fn state() -> GridState {
        GridState::new(["name", "size"], 20)
    }

    #[test]
    fn test_collapsed_shows_top_level_only() {
        let arena = hierarchy();
        let columns = columns();
        let derived = RowModelPipeline::new(&arena, &columns).compute(&state());
        assert_eq!(names(&arena, &derived), ["A", "B", "C"]);
        assert_eq!(derived.counts, RowCounts { total: 7, filtered: 7, selected: 0 });
        assert!(derived.rows[0].can_expand && !derived.rows[0].is_expanded);
        assert!(!derived.rows[2].can_expand);
    }

    #[test]
    fn test_striping_follows_top_level_ancestor() {
        let arena = hierarchy();
        let columns = columns();
        let mut state = state();
        state.expanded = Expanded::All;

        let derived = RowModelPipeline::new(&arena, &columns).compute(&state);
        assert_eq!(names(&arena, &derived), ["A", "AA", "AAA", "B", "BA", "BB", "C"]);
        let stripes: Vec<Stripe> = derived.rows.iter().map(|row| row.stripe).collect();
        use Stripe::{Even, Odd};
        assert_eq!(stripes, [Even, Even, Even, Odd, Odd, Odd, Even]);
    }

    #[test]
    fn test_sort_applies_to_every_sibling_group() {
        let arena = hierarchy();
        let columns = columns();
        let mut state = state();
        state.expanded = Expanded::All;
        state.sorting.push(SortKey::new("size", SortDirection::Ascending));

        let derived = RowModelPipeline::new(&arena, &columns).compute(&state);
        assert_eq!(names(&arena, &derived), ["C", "B", "BB", "BA", "A", "AA", "AAA"]);
    }

    #[test]
    fn test_filter_from_root_hides_children_of_dropped_parents() {
        let arena = hierarchy();
        let columns = columns();
        let mut state = state();
        state.expanded = Expanded::All;
        state.set_filter_value("name", Some(FilterValue::Text("b".into())));

        let derived = RowModelPipeline::new(&arena, &columns).compute(&state);
        assert_eq!(names(&arena, &derived), ["B", "BA", "BB"]);
        assert_eq!(derived.counts.filtered, 3);
    }

    #[test]
    fn test_disabled_stages_pass_through() {
        let arena = hierarchy();
        let columns = columns();
        let mut state = state();
        state.set_filter_value("name", Some(FilterValue::Equals(CellValue::from("C"))));
        state.sorting.push(SortKey::new("size", SortDirection::Ascending));

        let features = GridFeatures {
            filtering: false,
            sorting: false,
            ..GridFeatures::default()
        };
        let derived = RowModelPipeline::new(&arena, &columns)
            .with_features(features)
            .compute(&state);
        assert_eq!(names(&arena, &derived), ["A", "B", "C"]);
        assert!(!derived.columns[0].filterable);
        assert!(derived.columns[0].filtered);
    }

    #[test]
    fn test_column_views_follow_layout_order() {
        let arena = hierarchy();
        let columns = columns();
        let mut state = state();
        state.column_layout.reorder("size", "name");
        state.sorting.push(SortKey::new("name", SortDirection::Descending));

        let derived = RowModelPipeline::new(&arena, &columns).compute(&state);
        let ids: Vec<&str> = derived.columns.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["size", "name"]);
        let name = derived.column("name").unwrap();
        assert_eq!(name.sort, Some(SortDirection::Descending));
        assert_eq!(name.sort_index, Some(0));
        assert_eq!(name.width, 150.0);
    }

    #[test]
    fn test_selection_annotations() {
        let arena = hierarchy();
        let columns = columns();
        let mut state = state();
        state.expanded = Expanded::All;
        state.row_selection.set_selected(RowId::from("1.0"), true);
        state.row_selection.set_selected(RowId::from("gone"), true);

        let derived = RowModelPipeline::new(&arena, &columns).compute(&state);
        let b = derived.row("1").unwrap();
        assert!(!b.selected && b.some_selected);
        assert!(derived.row("1.0").unwrap().selected);
        assert_eq!(derived.counts.selected, 1);
        assert_eq!(derived.selection, crate::model::SelectionSummary::Some);
    }

    #[test]
    fn test_row_tree_descendants_and_flatten() {
        let arena = hierarchy();
        let tree = RowTree::core(&arena);
        assert_eq!(tree.descendants(0), [1, 2]);
        assert_eq!(tree.descendants(3), [4, 5]);
        assert_eq!(tree.flatten(), [0, 1, 2, 3, 4, 5, 6]);
        assert!(tree.children(42).is_empty());
    }
}
