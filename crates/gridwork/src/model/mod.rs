//! Data model for gridwork.
//!
//! This module contains everything the row pipeline operates on:
//!
//! - [`CellValue`]: what a column accessor yields for a record
//! - [`RowArena`], [`Row`], [`RowId`]: the flattened row forest
//! - [`ColumnDef`]: column identity, accessor, filter and sort behavior, size bounds
//! - [`GridState`]: sorting, filters, pagination, expansion, selection, layout
//! - [`SelectionTracker`]: selected row ids with indeterminate semantics
//! - [`ColumnLayout`]: column order and widths
//! - [`RowModelPipeline`]: filter → sort → paginate → expand, producing a [`DerivedRowSet`]

mod column;
mod columns;
mod derived;
mod pipeline;
mod row;
mod selection;
mod state;
mod value;

pub use column::{
    AccessorFn, ColumnCompareFn, ColumnDef, ColumnFilterFn, DEFAULT_COLUMN_SIZE, DEFAULT_MIN_COLUMN_SIZE,
    FilterKind,
};
pub use columns::{ColumnLayout, DropSide};
pub use derived::{ColumnView, DerivedRowSet, PageInfo, RowCounts, Stripe, VisibleRow};
pub use pipeline::{FilterMode, GridFeatures, RowModelPipeline, RowTree, compare_cells, matches_filter};
pub use row::{Row, RowArena, RowId, RowIdFn, TreeRow};
pub use selection::{RowSelectionState, SelectionSummary, SelectionTracker};
pub use state::{
    ColumnFilter, DEFAULT_PAGE_SIZE, Expanded, FilterValue, GridState, Pagination, SortDirection, SortKey,
};
pub use value::{CellValue, TextCollator};
