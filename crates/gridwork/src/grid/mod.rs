//! The outward-facing grid API.
//!
//! [`GridController`] owns the [`GridState`](crate::model::GridState), applies
//! [`GridCommand`]s to it and keeps the derived row set current.
//! [`GridOptions`] switches features on and off.

mod command;
mod controller;
mod options;

pub use command::GridCommand;
pub use controller::GridController;
pub use options::GridOptions;
