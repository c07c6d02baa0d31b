//! Core systems for gridwork.
//!
//! This crate provides the building blocks the grid engine is written on:
//!
//! - **Signal/Slot System**: Synchronous change notification for hosts
//! - **Errors**: The parse/configuration error taxonomy and `Result` alias
//! - **Logging**: `tracing` targets and span names used by the engine
//!
//! # Signal/Slot Example
//!
//! ```
//! use gridwork_core::Signal;
//!
//! let selection_changed = Signal::<Vec<String>>::new();
//!
//! let conn_id = selection_changed.connect(|ids| {
//!     println!("{} rows selected", ids.len());
//! });
//!
//! selection_changed.emit(vec!["0".to_string(), "2".to_string()]);
//! selection_changed.disconnect(conn_id);
//! ```

mod error;
pub mod logging;
pub mod signal;

pub use error::{ConfigurationError, GridError, ParseError, ParseErrorKind, Result};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
