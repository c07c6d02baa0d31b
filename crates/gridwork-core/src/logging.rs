//! Logging facilities for gridwork.
//!
//! gridwork uses the `tracing` crate for instrumentation. Nothing is printed
//! unless the host installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("gridwork=debug")
//!     .init();
//! ```
//!
//! Stale references coming from the UI (an unknown column in a reorder, a row
//! id that no longer exists) are logged at `debug` and otherwise ignored.
//! Recomputation is traced at `trace` level.

/// Span names used throughout gridwork for tracing.
///
/// These constants can be used to filter traces for specific subsystems.
pub mod span_names {
    /// Full row-model recomputation.
    pub const RECOMPUTE: &str = "gridwork::recompute";
    /// A single mutation command applied to the grid state.
    pub const DISPATCH: &str = "gridwork::dispatch";
    /// Signal emission span.
    pub const SIGNAL: &str = "gridwork_core::signal";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "gridwork_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "gridwork_core::signal";
    /// Row model pipeline target.
    pub const PIPELINE: &str = "gridwork::pipeline";
    /// Filter expression parsing and matching target.
    pub const FILTER: &str = "gridwork::filter";
    /// Row selection target.
    pub const SELECTION: &str = "gridwork::selection";
    /// Column order and sizing target.
    pub const COLUMNS: &str = "gridwork::columns";
    /// Grid controller target.
    pub const GRID: &str = "gridwork::grid";
}
