//! Prelude module for gridwork.
//!
//! ```ignore
//! use gridwork::prelude::*;
//! ```
//!
//! This provides access to:
//! - The controller and its options and commands
//! - Column definitions and input rows
//! - Grid state and the derived view types
//! - The filter DSL
//! - Errors and signals

// ============================================================================
// Controller
// ============================================================================

pub use crate::grid::{GridCommand, GridController, GridOptions};

// ============================================================================
// Model
// ============================================================================

pub use crate::model::{
    CellValue, ColumnDef, ColumnView, DerivedRowSet, DropSide, Expanded, FilterKind, FilterMode, FilterValue,
    GridState, RowCounts, RowId, SelectionSummary, SortDirection, SortKey, Stripe, TreeRow, VisibleRow,
};

// ============================================================================
// Filter DSL
// ============================================================================

pub use crate::filter::{NumericFilterBand, NumericFilterMask, parse_filter};

// ============================================================================
// Errors and Signals
// ============================================================================

pub use gridwork_core::{ConfigurationError, GridError, ParseError, Signal};
