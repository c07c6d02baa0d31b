//! End-to-end tests for the grid controller over a small hierarchy.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use gridwork::prelude::*;
use gridwork::model::{FilterMode, GridState, RowId, Stripe};

#[derive(Debug, Clone)]
struct Node {
    name: &'static str,
    size: i64,
}

fn node(name: &'static str, size: i64) -> TreeRow<Node> {
    TreeRow::new(Node { name, size })
}

/// A(AA(AAA)), B(BA, BB), C
fn forest() -> Vec<TreeRow<Node>> {
    vec![
        node("A", 30).with_sub_rows([node("AA", 5).with_sub_rows([node("AAA", 1)])]),
        node("B", 20).with_sub_rows([node("BA", 12), node("BB", 8)]),
        node("C", 10),
    ]
}

fn columns() -> Vec<ColumnDef<Node>> {
    vec![
        ColumnDef::new("name", |n: &Node| n.name.into()).with_header("Name"),
        ColumnDef::new("size", |n: &Node| n.size.into())
            .with_header("Size")
            .with_filter_kind(FilterKind::NumericRange),
    ]
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("gridwork=debug")
        .with_test_writer()
        .try_init();
}

fn grid_with(options: GridOptions) -> GridController<Node> {
    init_tracing();
    let mut grid = GridController::new();
    grid.configure(columns(), forest(), options).unwrap();
    grid
}

fn grid() -> GridController<Node> {
    grid_with(GridOptions::all_features())
}

fn names(grid: &GridController<Node>) -> Vec<&'static str> {
    let arena = grid.rows().unwrap();
    grid.visible_rows()
        .unwrap()
        .rows
        .iter()
        .map(|row| arena[row.index].data().name)
        .collect()
}

fn ids(values: &[&str]) -> Vec<RowId> {
    values.iter().copied().map(RowId::from).collect()
}

// ============================================================================
// Expansion and striping
// ============================================================================

#[test]
fn test_collapsed_grid_shows_top_level_rows() {
    let grid = grid();
    let derived = grid.visible_rows().unwrap();
    assert_eq!(names(&grid), ["A", "B", "C"]);
    assert_eq!(derived.counts.total, 7);
    assert_eq!(derived.counts.filtered, 7);
    assert!(derived.row("0").unwrap().can_expand);
    assert!(!derived.row("2").unwrap().can_expand);
}

#[test]
fn test_expansion_counts() {
    let mut grid = grid();

    assert_eq!(grid.toggle_expand("0").unwrap().len(), 4);
    assert_eq!(names(&grid), ["A", "AA", "B", "C"]);

    assert_eq!(grid.toggle_expand_all().unwrap().len(), 7);

    // Collapsing one row out of "all" keeps the others open.
    assert_eq!(grid.toggle_expand("0").unwrap().len(), 5);
    assert_eq!(names(&grid), ["A", "B", "BA", "BB", "C"]);

    assert_eq!(grid.toggle_expand_all().unwrap().len(), 7);
    assert_eq!(grid.toggle_expand_all().unwrap().len(), 3);
}

#[test]
fn test_leaf_rows_cannot_be_expanded() {
    let mut grid = grid();
    let before = grid.visible_rows().unwrap().clone();
    assert_eq!(grid.toggle_expand("2").unwrap(), &before);
    assert!(grid.state().expanded.is_empty());
}

#[test]
fn test_stripes_follow_top_level_ancestor() {
    let mut grid = grid();
    let derived = grid.toggle_expand_all().unwrap();
    let stripes: Vec<Stripe> = derived.rows.iter().map(|row| row.stripe).collect();
    assert_eq!(
        stripes,
        [
            Stripe::Even,
            Stripe::Even,
            Stripe::Even,
            Stripe::Odd,
            Stripe::Odd,
            Stripe::Odd,
            Stripe::Even,
        ]
    );
    let depths: Vec<usize> = derived.rows.iter().map(|row| row.depth).collect();
    assert_eq!(depths, [0, 1, 2, 0, 1, 1, 0]);
}

// ============================================================================
// Sorting
// ============================================================================

#[test]
fn test_number_sort_orders_every_sibling_group() {
    let mut grid = grid();
    grid.toggle_expand_all().unwrap();

    grid.toggle_sort("size").unwrap();
    assert_eq!(names(&grid), ["A", "AA", "AAA", "B", "BA", "BB", "C"]);

    grid.toggle_sort("size").unwrap();
    assert_eq!(names(&grid), ["C", "B", "BB", "BA", "A", "AA", "AAA"]);

    grid.toggle_sort("size").unwrap();
    assert_eq!(names(&grid), ["A", "AA", "AAA", "B", "BA", "BB", "C"]);
    assert!(grid.state().sorting.is_empty());
}

#[test]
fn test_column_views_report_sort_state() {
    let mut grid = grid();
    grid.toggle_sort("name").unwrap();
    let derived = grid.toggle_sort_multi("size").unwrap();

    let name = derived.column("name").unwrap();
    assert_eq!(name.sort, Some(SortDirection::Ascending));
    assert_eq!(name.sort_index, Some(0));
    let size = derived.column("size").unwrap();
    assert_eq!(size.sort, Some(SortDirection::Descending));
    assert_eq!(size.sort_index, Some(1));
}

#[test]
fn test_column_sort_override() {
    init_tracing();
    let columns = vec![
        ColumnDef::new("name", |n: &Node| n.name.into()).with_sort_desc_first(true),
        ColumnDef::new("size", |n: &Node| n.size.into()),
    ];
    let mut grid = GridController::new();
    grid.configure(columns, forest(), GridOptions::all_features()).unwrap();
    grid.toggle_sort("name").unwrap();
    assert_eq!(names(&grid), ["C", "B", "A"]);
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn test_filter_from_root_drops_rows_under_rejected_parents() {
    let mut grid = grid();
    grid.toggle_expand_all().unwrap();
    let derived = grid.set_filter("size", ">=10").unwrap();
    assert_eq!(derived.counts.filtered, 4);
    assert!(derived.column("size").unwrap().filtered);
    assert_eq!(names(&grid), ["A", "B", "BA", "C"]);
}

#[test]
fn test_filter_from_leaf_rows_keeps_ancestors() {
    let mut leaf_first = grid_with(GridOptions::all_features().with_filter_mode(FilterMode::FromLeafRows));
    leaf_first.toggle_expand_all().unwrap();
    let derived = leaf_first.set_filter("name", "aaa").unwrap();
    assert_eq!(derived.counts.filtered, 3);
    assert_eq!(names(&leaf_first), ["A", "AA", "AAA"]);

    let mut root_first = grid();
    let derived = root_first.set_filter("name", "aaa").unwrap();
    assert!(derived.is_empty());
    assert_eq!(derived.page.page_count, 0);
}

#[test]
fn test_filter_change_resets_page() {
    let mut grid = grid_with(GridOptions::all_features().with_page_size(1));
    grid.set_page(2).unwrap();
    assert_eq!(grid.state().pagination.page_index, 2);
    let derived = grid.set_filter("size", ">15").unwrap();
    assert_eq!(derived.page.page_index, 0);
    assert_eq!(derived.page.page_count, 2);
}

#[test]
fn test_filter_error_signal() {
    let mut grid = grid();
    let flips = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = Arc::clone(&flips);
    grid.filter_error.connect(move |flip| sink.lock().push(flip.clone()));

    assert!(grid.set_filter("size", ">>1").is_err());
    assert!(grid.set_filter("size", "1 <").is_ok());
    assert_eq!(
        *flips.lock(),
        [("size".to_string(), true), ("size".to_string(), false)]
    );
}

#[test]
fn test_filtering_disabled_ignores_filters() {
    let mut grid = grid_with(GridOptions::default());
    let derived = grid.set_filter("name", "B").unwrap();
    assert_eq!(derived.counts.filtered, 7);
    assert!(grid.state().column_filters.is_empty());
}

// ============================================================================
// Pagination
// ============================================================================

#[test]
fn test_pages_never_split_parents() {
    let mut grid = grid_with(GridOptions::all_features().with_page_size(2));
    grid.toggle_expand_all().unwrap();

    let derived = grid.visible_rows().unwrap();
    assert_eq!(derived.page.page_count, 2);
    assert!(derived.page.can_next);
    assert!(!derived.page.can_previous);
    assert_eq!(names(&grid), ["A", "AA", "AAA", "B", "BA", "BB"]);

    let derived = grid.next_page().unwrap();
    assert!(!derived.page.can_next);
    assert_eq!(names(&grid), ["C"]);

    // Already on the last page.
    let before = grid.visible_rows().unwrap().clone();
    assert_eq!(grid.next_page().unwrap(), &before);

    grid.previous_page().unwrap();
    assert_eq!(grid.state().pagination.page_index, 0);
}

#[test]
fn test_page_index_is_clamped() {
    let mut grid = grid_with(GridOptions::all_features().with_page_size(2));
    let derived = grid.set_page(99).unwrap();
    assert_eq!(derived.page.page_index, 1);
}

#[test]
fn test_pagination_disabled_shows_every_root() {
    let mut grid = grid_with(GridOptions::default().with_page_size(1));
    let derived = grid.set_page(2).unwrap();
    assert_eq!(derived.len(), 3);
    assert_eq!(derived.page.page_count, 1);
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_selecting_parent_selects_filtered_children() {
    let mut grid = grid();
    let derived = grid.toggle_row_selected("1").unwrap();
    assert_eq!(derived.counts.selected, 3);
    assert_eq!(derived.selection, SelectionSummary::Some);
    assert_eq!(grid.selected_row_ids(), ids(&["1", "1.0", "1.1"]));

    let derived = grid.toggle_row_selected("1.0").unwrap();
    let parent = derived.row("1").unwrap();
    assert!(parent.selected);
    assert!(parent.some_selected);

    grid.toggle_row_selected("1").unwrap();
    assert!(grid.selected_row_ids().is_empty());
}

#[test]
fn test_select_children_off() {
    let mut grid = grid_with(GridOptions::all_features().with_select_children(false));
    grid.toggle_row_selected("1").unwrap();
    assert_eq!(grid.selected_row_ids(), ids(&["1"]));
}

#[test]
fn test_selection_survives_filter_changes() {
    let mut grid = grid();
    grid.toggle_row_selected("2").unwrap();
    grid.set_filter("name", "b").unwrap();
    assert_eq!(grid.selected_row_ids(), ids(&["2"]));

    // Select-all covers only the filtered rows.
    let derived = grid.toggle_all_selected().unwrap();
    assert_eq!(derived.selection, SelectionSummary::All);
    assert_eq!(grid.selected_row_ids(), ids(&["1", "1.0", "1.1", "2"]));

    grid.clear_filters().unwrap();
    let derived = grid.toggle_all_selected().unwrap();
    assert_eq!(derived.selection, SelectionSummary::All);
    let derived = grid.toggle_all_selected().unwrap();
    assert_eq!(derived.selection, SelectionSummary::None);
    assert_eq!(derived.counts.selected, 0);
}

#[test]
fn test_selection_disabled() {
    let mut grid = grid_with(GridOptions::default());
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    grid.selection_changed.connect(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    grid.toggle_row_selected("0").unwrap();
    grid.toggle_all_selected().unwrap();
    assert!(grid.selected_row_ids().is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_host_row_ids_follow_records_across_data_changes() {
    init_tracing();
    let mut grid = GridController::new().with_row_id(|n: &Node| RowId::from(n.name));
    grid.configure(columns(), forest(), GridOptions::all_features()).unwrap();
    grid.toggle_row_selected("C").unwrap();
    grid.toggle_expand("B").unwrap();

    let mut reordered = forest();
    reordered.reverse();
    grid.set_data(reordered).unwrap();

    assert_eq!(grid.selected_row_ids(), ids(&["C"]));
    assert_eq!(names(&grid), ["C", "B", "BA", "BB", "A"]);
}

// ============================================================================
// Columns
// ============================================================================

#[test]
fn test_reorder_and_move_columns() {
    let mut grid = grid();
    let order = |derived: &DerivedRowSet| derived.columns.iter().map(|c| c.id.clone()).collect::<Vec<_>>();

    let derived = grid.reorder_column("size", "name").unwrap();
    assert_eq!(order(derived), ["size", "name"]);

    let derived = grid.move_column("size", "name", DropSide::After).unwrap();
    assert_eq!(order(derived), ["name", "size"]);
}

#[test]
fn test_resize_respects_bounds() {
    init_tracing();
    let columns = vec![
        ColumnDef::new("name", |n: &Node| n.name.into()).with_size_bounds(50.0, 200.0),
        ColumnDef::new("size", |n: &Node| n.size.into()).with_resizable(false),
    ];
    let mut grid = GridController::new();
    grid.configure(columns, forest(), GridOptions::all_features()).unwrap();

    let derived = grid.resize_column("name", 500.0).unwrap();
    assert_eq!(derived.column("name").unwrap().width, 200.0);
    let derived = grid.resize_column("name", -1000.0).unwrap();
    assert_eq!(derived.column("name").unwrap().width, 50.0);

    let derived = grid.resize_column("size", 10.0).unwrap();
    assert_eq!(derived.column("size").unwrap().width, 150.0);
    assert!(!derived.column("size").unwrap().resizable);
}

#[test]
fn test_set_columns_drops_state_of_removed_columns() {
    let mut grid = grid();
    grid.toggle_sort("size").unwrap();
    grid.set_filter("size", ">1").unwrap();

    let derived = grid
        .set_columns(vec![ColumnDef::new("name", |n: &Node| n.name.into())])
        .unwrap();
    assert_eq!(derived.columns.len(), 1);
    assert_eq!(derived.counts.filtered, 7);
    assert!(grid.state().sorting.is_empty());
    assert!(grid.state().column_filters.is_empty());
}

// ============================================================================
// Commands, state and options
// ============================================================================

#[test]
fn test_dispatch_serialized_commands() {
    let mut grid = grid();
    let commands: Vec<GridCommand> = serde_json::from_str(
        r#"[
            {"type": "toggle_expand_all"},
            {"type": "set_filter", "column_id": "name", "value": {"Text": "b"}},
            {"type": "toggle_row_selected", "row_id": "1.1"},
            {"type": "resize_column", "column_id": "name", "delta": 10.0}
        ]"#,
    )
    .unwrap();
    for command in commands {
        grid.dispatch(command).unwrap();
    }

    assert_eq!(names(&grid), ["B", "BA", "BB"]);
    assert_eq!(grid.selected_row_ids(), ids(&["1.1"]));
    assert_eq!(grid.visible_rows().unwrap().column("name").unwrap().width, 160.0);
}

#[test]
fn test_restore_state_round_trip() {
    let mut grid = grid();
    grid.toggle_expand("1").unwrap();
    grid.toggle_sort("size").unwrap();
    grid.toggle_row_selected("0").unwrap();
    let expected = grid.visible_rows().unwrap().clone();

    let json = serde_json::to_string(grid.state()).unwrap();
    let state: GridState = serde_json::from_str(&json).unwrap();

    let mut restored = GridController::new();
    restored.configure(columns(), forest(), GridOptions::all_features()).unwrap();
    assert_eq!(restored.restore_state(state).unwrap(), &expected);
}

#[test]
fn test_noop_commands_do_not_recompute() {
    let mut grid = grid();
    let emitted = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&emitted);
    grid.rows_changed.connect(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    grid.set_page(0).unwrap();
    grid.toggle_sort("missing").unwrap();
    grid.clear_filters().unwrap();
    assert_eq!(emitted.load(Ordering::SeqCst), 0);

    grid.toggle_sort("name").unwrap();
    assert_eq!(emitted.load(Ordering::SeqCst), 1);
}

#[test]
fn test_options_from_toml() {
    let options = GridOptions::from_toml_str(
        r#"
        sortable = true
        paginate = true
        page_size = 2
        filter_mode = "from_leaf_rows"
        "#,
    )
    .unwrap();
    assert_eq!(options.filter_mode, FilterMode::FromLeafRows);

    let mut grid = grid_with(options);
    let derived = grid.visible_rows().unwrap();
    assert_eq!(derived.page.page_count, 2);
    assert!(!derived.column("name").unwrap().filterable);
    assert!(derived.column("name").unwrap().sortable);
    assert!(grid.set_page_size(0).is_err());

    let err = GridOptions::from_toml_str("page_size = 0").unwrap_err();
    assert!(matches!(err, ConfigurationError::InvalidOptions(_)));
}
