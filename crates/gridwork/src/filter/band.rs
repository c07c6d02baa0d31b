//! Numeric filter masks and band matching.

use serde::{Deserialize, Serialize};

/// One OR-term of a [`NumericFilterMask`]: an optional lower and an optional
/// upper bound, ANDed, each with its own strictness.
///
/// An absent bound leaves that side open. Strict bounds exclude the bound
/// value itself (`<`, `>`), non-strict bounds include it (`<=`, `>=`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericFilterBand {
    /// Lower bound, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<f64>,
    /// Upper bound, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
    /// Whether the lower bound excludes its own value.
    pub strict_lower: bool,
    /// Whether the upper bound excludes its own value.
    pub strict_upper: bool,
}

impl Default for NumericFilterBand {
    fn default() -> Self {
        Self::open()
    }
}

impl NumericFilterBand {
    /// A band with no bounds. Both strictness flags default to `true`.
    pub const fn open() -> Self {
        Self {
            lower: None,
            upper: None,
            strict_lower: true,
            strict_upper: true,
        }
    }

    /// Sets the lower bound.
    pub fn with_lower(mut self, lower: f64, strict: bool) -> Self {
        self.lower = Some(lower);
        self.strict_lower = strict;
        self
    }

    /// Sets the upper bound.
    pub fn with_upper(mut self, upper: f64, strict: bool) -> Self {
        self.upper = Some(upper);
        self.strict_upper = strict;
        self
    }

    /// Returns `true` if neither side is bounded.
    pub fn is_unbounded(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }

    /// Tests a value against this band.
    ///
    /// `NaN` fails every comparison, so it never matches a bounded band.
    pub fn contains(&self, value: f64) -> bool {
        let above_lower = match self.lower {
            Some(lower) if self.strict_lower => lower < value,
            Some(lower) => lower <= value,
            None => true,
        };
        let below_upper = match self.upper {
            Some(upper) if self.strict_upper => value < upper,
            Some(upper) => value <= upper,
            None => true,
        };
        above_lower && below_upper
    }
}

/// An ordered set of bands; a value matches if it falls in any of them.
///
/// # Example
///
/// ```
/// use gridwork::filter::{NumericFilterBand, NumericFilterMask};
///
/// let mask = NumericFilterMask::new(vec![
///     NumericFilterBand::open().with_lower(0.0, false).with_upper(9.0, true),
///     NumericFilterBand::open().with_lower(100.0, true),
/// ]);
///
/// assert!(mask.matches(0.0));
/// assert!(!mask.matches(9.0));
/// assert!(mask.matches(150.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericFilterMask {
    /// The OR-ed bands, in source order.
    #[serde(default)]
    pub bands: Vec<NumericFilterBand>,
}

impl NumericFilterMask {
    /// Creates a mask from bands.
    pub fn new(bands: Vec<NumericFilterBand>) -> Self {
        Self { bands }
    }

    /// The mask produced for blank filter text: a single unbounded band.
    pub fn open() -> Self {
        Self {
            bands: vec![NumericFilterBand::open()],
        }
    }

    /// Returns `true` if the mask lets every value through (no bands, or any
    /// unbounded band).
    pub fn is_open(&self) -> bool {
        self.bands.is_empty() || self.bands.iter().any(NumericFilterBand::is_unbounded)
    }

    /// Tests a value against the mask.
    ///
    /// An empty mask places no constraint and matches everything.
    pub fn matches(&self, value: f64) -> bool {
        self.bands.is_empty() || self.bands.iter().any(|band| band.contains(value))
    }
}
