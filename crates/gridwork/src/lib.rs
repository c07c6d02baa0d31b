//! gridwork - the tabular data engine behind a data grid.
//!
//! Give it a forest of records and a set of column definitions; it produces
//! the rows to render, filtered, sorted, expanded and paginated, together with
//! selection state, column layout and footer counts. Rendering, input widgets
//! and drag gestures live elsewhere and talk to the engine through
//! [`GridController`](grid::GridController).
//!
//! # Example
//!
//! ```
//! use gridwork::prelude::*;
//!
//! #[derive(Debug)]
//! struct Gauge {
//!     river: &'static str,
//!     level: f64,
//! }
//!
//! let columns = vec![
//!     ColumnDef::new("river", |g: &Gauge| g.river.into()).with_header("River"),
//!     ColumnDef::new("level", |g: &Gauge| g.level.into()).with_filter_kind(FilterKind::NumericRange),
//! ];
//! let rows = vec![
//!     TreeRow::new(Gauge { river: "Aare", level: 502.1 }),
//!     TreeRow::new(Gauge { river: "Reuss", level: 433.9 }),
//!     TreeRow::new(Gauge { river: "Limmat", level: 401.4 }),
//! ];
//!
//! let mut grid = GridController::new();
//! grid.configure(columns, rows, GridOptions::all_features())?;
//!
//! let view = grid.set_filter("level", ">=400,<500")?;
//! assert_eq!(view.counts.filtered, 2);
//!
//! // Bad filter text keeps the last valid filter.
//! assert!(grid.set_filter("level", ">=").is_err());
//! assert_eq!(grid.visible_rows()?.counts.filtered, 2);
//! # Ok::<(), gridwork::GridError>(())
//! ```

pub use gridwork_core::*;

pub mod filter;
pub mod grid;
pub mod model;
pub mod prelude;
