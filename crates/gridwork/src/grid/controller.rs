//! The grid controller.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use gridwork_core::logging::{span_names, targets};
use gridwork_core::{ConfigurationError, GridError, Result, Signal};

use crate::filter::parse_filter;
use crate::model::{
    ColumnDef, DerivedRowSet, DropSide, Expanded, FilterValue, GridState, Row, RowArena, RowId, RowIdFn,
    RowModelPipeline, RowTree, SortDirection, SortKey, TextCollator, TreeRow,
};

use super::command::GridCommand;
use super::options::GridOptions;

/// Owns the grid state and keeps the derived row set up to date.
///
/// This is the only type a rendering layer needs to talk to. Every mutation
/// goes through [`dispatch`](Self::dispatch) (or one of the thin wrappers
/// around it), is applied to the [`GridState`], and triggers a synchronous
/// recomputation of the [`DerivedRowSet`].
///
/// References that no longer resolve (a column id that was removed, a row id
/// from stale data) are ignored and logged at `debug` level.
///
/// # Example
///
/// ```
/// use gridwork::grid::{GridController, GridOptions};
/// use gridwork::model::{ColumnDef, TreeRow};
///
/// struct City {
///     name: &'static str,
///     population: i64,
/// }
///
/// let columns = vec![
///     ColumnDef::new("name", |c: &City| c.name.into()),
///     ColumnDef::new("population", |c: &City| c.population.into()),
/// ];
/// let rows = vec![
///     TreeRow::new(City { name: "Zurich", population: 421_878 }),
///     TreeRow::new(City { name: "Geneva", population: 203_856 }),
/// ];
///
/// let mut grid = GridController::new();
/// grid.configure(columns, rows, GridOptions::all_features()).unwrap();
///
/// // Text columns sort ascending first.
/// let view = grid.toggle_sort("name").unwrap();
/// assert_eq!(view.rows[0].id.as_str(), "1");
/// ```
pub struct GridController<T> {
    columns: Option<Vec<ColumnDef<T>>>,
    arena: Option<RowArena<T>>,
    options: GridOptions,
    state: GridState,
    collator: TextCollator,
    row_id: Option<RowIdFn<T>>,
    filter_errors: BTreeSet<String>,
    filtered: RowTree,
    derived: Option<DerivedRowSet>,

    /// Emitted with the new row set after every recomputation.
    pub rows_changed: Signal<DerivedRowSet>,
    /// Emitted with the selected row ids, in data order, after a selection change.
    pub selection_changed: Signal<Vec<RowId>>,
    /// Emitted with `(column id, has error)` when a column's filter error flag flips.
    pub filter_error: Signal<(String, bool)>,
}

impl<T> Default for GridController<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GridController<T> {
    /// Creates an unconfigured grid.
    pub fn new() -> Self {
        Self {
            columns: None,
            arena: None,
            options: GridOptions::default(),
            state: GridState::default(),
            collator: TextCollator::natural(),
            row_id: None,
            filter_errors: BTreeSet::new(),
            filtered: RowTree::default(),
            derived: None,
            rows_changed: Signal::new(),
            selection_changed: Signal::new(),
            filter_error: Signal::new(),
        }
    }

    /// Derives row ids from records instead of index paths.
    ///
    /// Use this when data is replaced wholesale and selection or expansion
    /// should follow the records.
    pub fn with_row_id<F>(mut self, row_id: F) -> Self
    where
        F: Fn(&T) -> RowId + Send + Sync + 'static,
    {
        self.row_id = Some(Arc::new(row_id));
        self
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    /// Supplies columns, rows and options in one go.
    ///
    /// The grid state survives reconfiguration; the page index is reset and
    /// the page size taken from the options.
    pub fn configure(
        &mut self,
        columns: Vec<ColumnDef<T>>,
        rows: Vec<TreeRow<T>>,
        options: GridOptions,
    ) -> Result<&DerivedRowSet> {
        options.validate()?;
        ensure_unique_ids(&columns)?;

        tracing::debug!(
            target: targets::GRID,
            columns = columns.len(),
            top_level_rows = rows.len(),
            "configuring grid"
        );

        self.apply_options(options);
        self.state.pagination.page_index = 0;
        self.columns = Some(columns);
        self.arena = Some(self.build_arena(rows));
        self.refresh()
    }

    /// Replaces the options.
    pub fn set_options(&mut self, options: GridOptions) -> Result<&DerivedRowSet> {
        options.validate()?;
        self.apply_options(options);
        self.refresh()
    }

    /// Replaces the row data. The page index resets to the first page.
    pub fn set_data(&mut self, rows: Vec<TreeRow<T>>) -> Result<&DerivedRowSet> {
        self.arena = Some(self.build_arena(rows));
        self.state.pagination.page_index = 0;
        self.refresh()
    }

    /// Replaces the column definitions.
    ///
    /// Sort keys, filters and widths of removed columns are dropped; new
    /// columns are appended to the column order.
    pub fn set_columns(&mut self, columns: Vec<ColumnDef<T>>) -> Result<&DerivedRowSet> {
        ensure_unique_ids(&columns)?;
        self.filter_errors
            .retain(|id| columns.iter().any(|column| column.id() == id.as_str()));
        self.columns = Some(columns);
        self.refresh()
    }

    /// Replaces the whole grid state, for example one restored from storage.
    pub fn restore_state(&mut self, state: GridState) -> Result<&DerivedRowSet> {
        self.state = state;
        self.refresh()
    }

    fn apply_options(&mut self, options: GridOptions) {
        self.collator = options
            .locale
            .as_deref()
            .map_or_else(TextCollator::natural, TextCollator::for_locale);
        self.state.pagination.page_size = options.page_size;
        self.options = options;
    }

    fn build_arena(&self, rows: Vec<TreeRow<T>>) -> RowArena<T> {
        match &self.row_id {
            Some(row_id) => RowArena::from_forest_with_ids(rows, row_id),
            None => RowArena::from_forest(rows),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The options passed to the last `configure`.
    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    /// The current grid state.
    pub fn state(&self) -> &GridState {
        &self.state
    }

    /// The column definitions, in definition order.
    pub fn columns(&self) -> &[ColumnDef<T>] {
        self.columns.as_deref().unwrap_or_default()
    }

    /// Looks up a column definition by id.
    pub fn column(&self, column_id: &str) -> Option<&ColumnDef<T>> {
        self.columns().iter().find(|column| column.id() == column_id)
    }

    /// The flattened row data.
    pub fn rows(&self) -> Option<&RowArena<T>> {
        self.arena.as_ref()
    }

    /// Looks up a row by its id.
    pub fn row(&self, row_id: &str) -> Option<&Row<T>> {
        self.arena.as_ref().and_then(|arena| arena.by_id(row_id))
    }

    /// The current derived row set.
    pub fn visible_rows(&self) -> Result<&DerivedRowSet> {
        self.inputs()?;
        self.derived
            .as_ref()
            .ok_or_else(|| ConfigurationError::MissingRows.into())
    }

    /// Selected row ids that exist in the data, in data order.
    pub fn selected_row_ids(&self) -> Vec<RowId> {
        self.selected().map(|row| row.id().clone()).collect()
    }

    /// Records of the selected rows, in data order.
    pub fn selected_rows(&self) -> Vec<&T> {
        self.selected().map(Row::data).collect()
    }

    fn selected(&self) -> impl Iterator<Item = &Row<T>> {
        let selection = &self.state.row_selection;
        self.arena
            .iter()
            .flat_map(|arena| arena.iter())
            .filter(move |row| selection.is_selected(row.id()))
    }

    /// Returns `true` if the last filter text for a column failed to parse.
    pub fn has_filter_error(&self, column_id: &str) -> bool {
        self.filter_errors.contains(column_id)
    }

    fn inputs(&self) -> Result<(&[ColumnDef<T>], &RowArena<T>)> {
        let columns = self.columns.as_deref().ok_or(ConfigurationError::MissingColumns)?;
        let arena = self.arena.as_ref().ok_or(ConfigurationError::MissingRows)?;
        Ok((columns, arena))
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Cycles a column's sort, replacing any other sort keys.
    pub fn toggle_sort(&mut self, column_id: &str) -> Result<&DerivedRowSet> {
        self.dispatch(GridCommand::ToggleSort {
            column_id: column_id.to_string(),
            multi: false,
        })
    }

    /// Cycles a column's sort, keeping other sort keys.
    pub fn toggle_sort_multi(&mut self, column_id: &str) -> Result<&DerivedRowSet> {
        self.dispatch(GridCommand::ToggleSort {
            column_id: column_id.to_string(),
            multi: true,
        })
    }

    /// Applies filter text typed by the user.
    ///
    /// Blank text clears the filter. For [`NumericRange`] columns the text is
    /// parsed; if that fails the column is flagged, its previous filter stays
    /// active, and [`GridError::Parse`] is returned.
    ///
    /// [`NumericRange`]: crate::model::FilterKind::NumericRange
    pub fn set_filter(&mut self, column_id: &str, text: &str) -> Result<&DerivedRowSet> {
        let (columns, _) = self.inputs()?;
        let Some(column) = columns.iter().find(|column| column.id() == column_id) else {
            tracing::debug!(target: targets::FILTER, column = column_id, "filter for unknown column ignored");
            return self.visible_rows();
        };

        let filterable = column.is_filterable();
        let value = if text.trim().is_empty() {
            None
        } else if column.filter_kind().is_numeric_range() {
            match parse_filter(text) {
                Ok(mask) => Some(FilterValue::Range(mask)),
                Err(source) => {
                    tracing::debug!(
                        target: targets::FILTER,
                        column = column_id,
                        text,
                        kind = ?source.kind(),
                        offset = source.offset(),
                        "filter text rejected"
                    );
                    if self.options.filterable && filterable && self.set_filter_error(column_id, true) {
                        self.refresh()?;
                    }
                    return Err(GridError::parse(column_id, source));
                }
            }
        } else {
            Some(FilterValue::Text(text.to_string()))
        };

        self.dispatch(GridCommand::SetFilter {
            column_id: column_id.to_string(),
            value,
        })
    }

    /// Sets or clears a column's filter value directly.
    pub fn set_filter_value(&mut self, column_id: &str, value: Option<FilterValue>) -> Result<&DerivedRowSet> {
        self.dispatch(GridCommand::SetFilter {
            column_id: column_id.to_string(),
            value,
        })
    }

    /// Removes every column filter and clears all parse error flags.
    pub fn clear_filters(&mut self) -> Result<&DerivedRowSet> {
        self.dispatch(GridCommand::ClearFilters)
    }

    /// Jumps to a page. Indices past the last page select the last page.
    pub fn set_page(&mut self, page_index: usize) -> Result<&DerivedRowSet> {
        self.dispatch(GridCommand::SetPage { page_index })
    }

    /// Advances one page. No-op on the last page.
    pub fn next_page(&mut self) -> Result<&DerivedRowSet> {
        self.dispatch(GridCommand::NextPage)
    }

    /// Goes back one page. No-op on the first page.
    pub fn previous_page(&mut self) -> Result<&DerivedRowSet> {
        self.dispatch(GridCommand::PreviousPage)
    }

    /// Changes the page size, keeping the first row of the current page visible.
    ///
    /// A zero page size is rejected with a configuration error.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<&DerivedRowSet> {
        self.dispatch(GridCommand::SetPageSize { page_size })
    }

    /// Expands or collapses one row. Unknown ids are ignored.
    pub fn toggle_expand(&mut self, row_id: &str) -> Result<&DerivedRowSet> {
        self.dispatch(GridCommand::ToggleExpand {
            row_id: RowId::from(row_id),
        })
    }

    /// Expands every row, or collapses every row if all are expanded.
    pub fn toggle_expand_all(&mut self) -> Result<&DerivedRowSet> {
        self.dispatch(GridCommand::ToggleExpandAll)
    }

    /// Selects or deselects one row. Unknown ids are ignored.
    pub fn toggle_row_selected(&mut self, row_id: &str) -> Result<&DerivedRowSet> {
        self.dispatch(GridCommand::ToggleRowSelected {
            row_id: RowId::from(row_id),
        })
    }

    /// Toggles "select all" over the filtered rows.
    pub fn toggle_all_selected(&mut self) -> Result<&DerivedRowSet> {
        self.dispatch(GridCommand::ToggleAllSelected)
    }

    /// Moves a dragged column onto another column's position.
    pub fn reorder_column(&mut self, source: &str, target: &str) -> Result<&DerivedRowSet> {
        self.dispatch(GridCommand::ReorderColumn {
            source: source.to_string(),
            target: target.to_string(),
        })
    }

    /// Moves a column to the given side of another column.
    pub fn move_column(&mut self, source: &str, target: &str, side: DropSide) -> Result<&DerivedRowSet> {
        self.dispatch(GridCommand::MoveColumn {
            source: source.to_string(),
            target: target.to_string(),
            side,
        })
    }

    /// Widens or narrows a column by `delta`, clamped to its size bounds.
    ///
    /// Non-resizable columns and non-finite deltas are ignored.
    pub fn resize_column(&mut self, column_id: &str, delta: f32) -> Result<&DerivedRowSet> {
        self.dispatch(GridCommand::ResizeColumn {
            column_id: column_id.to_string(),
            delta,
        })
    }

    /// Drops a column's explicit width so it falls back to its default size.
    pub fn reset_column_size(&mut self, column_id: &str) -> Result<&DerivedRowSet> {
        self.dispatch(GridCommand::ResetColumnSize {
            column_id: column_id.to_string(),
        })
    }

    /// Applies a command and recomputes the derived row set.
    ///
    /// Commands that change nothing (including stale references) return the
    /// current row set without recomputing.
    pub fn dispatch(&mut self, command: GridCommand) -> Result<&DerivedRowSet> {
        let _span = tracing::debug_span!(target: targets::GRID, span_names::DISPATCH, ?command).entered();
        self.inputs()?;

        let selection_command = command.affects_selection();
        if !self.apply(command)? {
            return self.visible_rows();
        }

        self.refresh()?;
        if selection_command {
            self.selection_changed.emit(self.selected_row_ids());
        }
        self.visible_rows()
    }

    fn apply(&mut self, command: GridCommand) -> Result<bool> {
        let changed = match command {
            GridCommand::ToggleSort { column_id, multi } => self.apply_toggle_sort(&column_id, multi),
            GridCommand::SetFilter { column_id, value } => self.apply_filter(&column_id, value),
            GridCommand::ClearFilters => self.apply_clear_filters(),
            GridCommand::SetPage { page_index } => self.apply_page(page_index),
            GridCommand::NextPage => {
                let page = self.current_page();
                page.can_next && self.apply_page(page.page_index + 1)
            }
            GridCommand::PreviousPage => {
                let page = self.current_page();
                page.can_previous && self.apply_page(page.page_index - 1)
            }
            GridCommand::SetPageSize { page_size } => self.apply_page_size(page_size)?,
            GridCommand::ToggleExpand { row_id } => self.apply_toggle_expand(&row_id),
            GridCommand::ToggleExpandAll => self.apply_toggle_expand_all(),
            GridCommand::ToggleRowSelected { row_id } => self.apply_toggle_row_selected(&row_id),
            GridCommand::ToggleAllSelected => self.apply_toggle_all_selected(),
            GridCommand::ReorderColumn { source, target } => {
                let moved = self.state.column_layout.reorder(&source, &target);
                if !moved {
                    tracing::debug!(target: targets::COLUMNS, %source, %target, "column reorder ignored");
                }
                moved
            }
            GridCommand::MoveColumn { source, target, side } => {
                let moved = self.state.column_layout.move_column(&source, &target, side);
                if !moved {
                    tracing::debug!(target: targets::COLUMNS, %source, %target, ?side, "column move ignored");
                }
                moved
            }
            GridCommand::ResizeColumn { column_id, delta } => self.apply_resize(&column_id, delta),
            GridCommand::ResetColumnSize { column_id } => self.state.column_layout.reset_size(&column_id),
        };
        Ok(changed)
    }

    fn apply_toggle_sort(&mut self, column_id: &str, multi: bool) -> bool {
        if !self.options.sortable {
            tracing::debug!(target: targets::GRID, column = column_id, "sorting disabled");
            return false;
        }
        let Some(column) = self.columns().iter().find(|column| column.id() == column_id) else {
            tracing::debug!(target: targets::GRID, column = column_id, "sort toggle for unknown column ignored");
            return false;
        };
        if !column.is_sortable() {
            tracing::debug!(target: targets::GRID, column = column_id, "column is not sortable");
            return false;
        }

        let first = self.first_sort_direction(column);
        let current = self.state.sort_of(column_id);
        let next = match current {
            None => Some(first),
            Some((_, direction)) if direction == first => Some(first.reversed()),
            Some(_) => None,
        };

        if multi {
            match (current, next) {
                (Some((position, _)), Some(direction)) => self.state.sorting[position].direction = direction,
                (Some((position, _)), None) => {
                    self.state.sorting.remove(position);
                }
                (None, Some(direction)) => self.state.sorting.push(SortKey::new(column_id, direction)),
                (None, None) => {}
            }
        } else {
            self.state.sorting = next
                .map(|direction| vec![SortKey::new(column_id, direction)])
                .unwrap_or_default();
        }
        self.state.pagination.page_index = 0;
        true
    }

    /// Ascending for text, descending otherwise, judged by the first filtered row.
    fn first_sort_direction(&self, column: &ColumnDef<T>) -> SortDirection {
        if let Some(desc_first) = column.sort_desc_first() {
            return if desc_first {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
        }
        let first_row = self
            .filtered
            .roots()
            .first()
            .and_then(|&index| self.arena.as_ref().and_then(|arena| arena.get(index)));
        match first_row.map(|row| column.value(row.data())) {
            Some(value) if value.as_text().is_some() => SortDirection::Ascending,
            _ => SortDirection::Descending,
        }
    }

    fn apply_filter(&mut self, column_id: &str, value: Option<FilterValue>) -> bool {
        if !self.options.filterable {
            tracing::debug!(target: targets::FILTER, column = column_id, "filtering disabled");
            return false;
        }
        match self.column(column_id) {
            Some(column) if column.is_filterable() => {}
            Some(_) => {
                tracing::debug!(target: targets::FILTER, column = column_id, "column is not filterable");
                return false;
            }
            None => {
                tracing::debug!(target: targets::FILTER, column = column_id, "filter for unknown column ignored");
                return false;
            }
        }

        let error_cleared = self.set_filter_error(column_id, false);
        let changed = self.state.set_filter_value(column_id, value);
        if changed {
            self.state.pagination.page_index = 0;
        }
        changed || error_cleared
    }

    fn apply_clear_filters(&mut self) -> bool {
        let had_filters = !self.state.column_filters.is_empty();
        self.state.column_filters.clear();
        let flagged: Vec<String> = self.filter_errors.iter().cloned().collect();
        for column_id in &flagged {
            self.set_filter_error(column_id, false);
        }
        if had_filters {
            self.state.pagination.page_index = 0;
        }
        had_filters || !flagged.is_empty()
    }

    fn set_filter_error(&mut self, column_id: &str, flagged: bool) -> bool {
        let changed = if flagged {
            self.filter_errors.insert(column_id.to_string())
        } else {
            self.filter_errors.remove(column_id)
        };
        if changed {
            self.filter_error.emit((column_id.to_string(), flagged));
        }
        changed
    }

    fn current_page(&self) -> crate::model::PageInfo {
        self.derived.as_ref().map(|derived| derived.page).unwrap_or_default()
    }

    fn apply_page(&mut self, page_index: usize) -> bool {
        if !self.options.paginate {
            tracing::debug!(target: targets::GRID, page_index, "pagination disabled");
            return false;
        }
        let last = self.current_page().page_count.saturating_sub(1);
        let page_index = page_index.min(last);
        if page_index == self.state.pagination.page_index {
            return false;
        }
        self.state.pagination.page_index = page_index;
        true
    }

    fn apply_page_size(&mut self, page_size: usize) -> Result<bool> {
        if page_size == 0 {
            tracing::warn!(target: targets::GRID, "page size must be greater than 0");
            return Err(ConfigurationError::InvalidOptions("page_size must be greater than 0".into()).into());
        }
        let pagination = &mut self.state.pagination;
        if pagination.page_size == page_size {
            return Ok(false);
        }
        // Keep the first row of the current page visible.
        let top_row = pagination.page_index.saturating_mul(pagination.page_size);
        pagination.page_index = top_row / page_size;
        pagination.page_size = page_size;
        self.options.page_size = page_size;
        Ok(true)
    }

    fn apply_toggle_expand(&mut self, row_id: &RowId) -> bool {
        let Some(arena) = self.arena.as_ref() else {
            return false;
        };
        let Some(row) = arena.by_id(row_id.as_str()) else {
            tracing::debug!(target: targets::GRID, row = %row_id, "expand toggle for unknown row ignored");
            return false;
        };
        if !row.can_expand() {
            tracing::debug!(target: targets::GRID, row = %row_id, "row has no children");
            return false;
        }

        self.state.expanded = match std::mem::take(&mut self.state.expanded) {
            Expanded::All => Expanded::Rows(
                arena
                    .iter()
                    .filter(|row| row.can_expand() && row.id() != row_id)
                    .map(|row| row.id().clone())
                    .collect(),
            ),
            Expanded::Rows(mut rows) => {
                if !rows.remove(row_id) {
                    rows.insert(row_id.clone());
                }
                Expanded::Rows(rows)
            }
        };
        true
    }

    fn apply_toggle_expand_all(&mut self) -> bool {
        let Some(arena) = self.arena.as_ref() else {
            return false;
        };
        let all_expanded = match &self.state.expanded {
            Expanded::All => true,
            Expanded::Rows(rows) => arena
                .iter()
                .filter(|row| row.can_expand())
                .all(|row| rows.contains(row.id())),
        };
        self.state.expanded = if all_expanded {
            Expanded::default()
        } else {
            Expanded::All
        };
        true
    }

    fn apply_toggle_row_selected(&mut self, row_id: &RowId) -> bool {
        if !self.options.selectable {
            tracing::debug!(target: targets::SELECTION, row = %row_id, "selection disabled");
            return false;
        }
        let Some(arena) = self.arena.as_ref() else {
            return false;
        };
        let Some(index) = arena.index_of(row_id.as_str()) else {
            tracing::debug!(target: targets::SELECTION, row = %row_id, "selection toggle for unknown row ignored");
            return false;
        };

        let descendants: Vec<RowId> = if self.options.select_children {
            self.filtered
                .descendants(index)
                .into_iter()
                .map(|index| arena[index].id().clone())
                .collect()
        } else {
            Vec::new()
        };
        let selected = self.state.row_selection.toggle_row(row_id, &descendants);
        tracing::debug!(target: targets::SELECTION, row = %row_id, selected, descendants = descendants.len(), "row selection toggled");
        true
    }

    fn apply_toggle_all_selected(&mut self) -> bool {
        if !self.options.selectable {
            tracing::debug!(target: targets::SELECTION, "selection disabled");
            return false;
        }
        let Some(arena) = self.arena.as_ref() else {
            return false;
        };
        let filtered: Vec<RowId> = self
            .filtered
            .flatten()
            .into_iter()
            .map(|index| arena[index].id().clone())
            .collect();
        if filtered.is_empty() {
            return false;
        }
        self.state.row_selection.toggle_all(&filtered);
        true
    }

    fn apply_resize(&mut self, column_id: &str, delta: f32) -> bool {
        if !self.options.resizable {
            tracing::debug!(target: targets::COLUMNS, column = column_id, "resizing disabled");
            return false;
        }
        let Some(column) = self
            .columns
            .as_deref()
            .and_then(|columns| columns.iter().find(|column| column.id() == column_id))
        else {
            tracing::debug!(target: targets::COLUMNS, column = column_id, "resize for unknown column ignored");
            return false;
        };
        match self.state.column_layout.resize(column, delta) {
            Some(width) => {
                tracing::trace!(target: targets::COLUMNS, column = column_id, width, "column resized");
                true
            }
            None => {
                tracing::debug!(target: targets::COLUMNS, column = column_id, delta, "column resize ignored");
                false
            }
        }
    }

    // ========================================================================
    // Recomputation
    // ========================================================================

    /// Re-runs the pipeline and publishes the result.
    fn refresh(&mut self) -> Result<&DerivedRowSet> {
        let columns = self.columns.as_deref().ok_or(ConfigurationError::MissingColumns)?;
        let arena = self.arena.as_ref().ok_or(ConfigurationError::MissingRows)?;

        self.state.sync_columns(columns.iter().map(ColumnDef::id));
        let (mut derived, filtered) = RowModelPipeline::new(arena, columns)
            .with_features(self.options.features())
            .with_filter_mode(self.options.filter_mode)
            .with_collator(&self.collator)
            .run(&self.state);

        if self.options.paginate {
            self.state.pagination.page_index = derived.page.page_index;
        }
        for column in &mut derived.columns {
            column.filter_error = self.filter_errors.contains(&column.id);
        }
        self.filtered = filtered;

        self.rows_changed.emit(derived.clone());
        Ok(&*self.derived.insert(derived))
    }
}

impl<T> fmt::Debug for GridController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridController")
            .field("columns", &self.columns.as_ref().map(Vec::len))
            .field("rows", &self.arena.as_ref().map(RowArena::len))
            .field("options", &self.options)
            .field("state", &self.state)
            .field("filter_errors", &self.filter_errors)
            .finish_non_exhaustive()
    }
}

fn ensure_unique_ids<T>(columns: &[ColumnDef<T>]) -> std::result::Result<(), ConfigurationError> {
    let mut seen = BTreeSet::new();
    for column in columns {
        if !seen.insert(column.id()) {
            tracing::warn!(target: targets::GRID, column = column.id(), "duplicate column id");
            return Err(ConfigurationError::DuplicateColumn(column.id().to_string()));
        }
    }
    Ok(())
}

static_assertions::assert_impl_all!(GridController<String>: Send, Sync);
