//! The range-filter DSL.
//!
//! Users type numeric filters as text, for example `>=0,<9;>100`:
//!
//! - `;` separates alternatives (OR). Each alternative becomes one band.
//! - `,` separates comparisons that must all hold (AND) within a band.
//! - Comparisons use `>`, `>=`, `<` or `<=` with exactly one number.
//!
//! [`parse_filter`] turns the text into a [`NumericFilterMask`], and
//! [`NumericFilterMask::matches`] tests cell values against it.

mod band;
mod parser;

pub use band::{NumericFilterBand, NumericFilterMask};
pub use parser::parse_filter;
