//! Cell values and their default ordering.
//!
//! Column accessors turn an application record into a [`CellValue`]. The
//! pipeline filters and sorts on these values, never on the records
//! themselves.

use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// The value of one cell, as produced by a column accessor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum CellValue {
    /// No value.
    #[default]
    None,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Date and time value.
    Date(NaiveDateTime),
}

impl CellValue {
    /// Returns `true` if there is no value.
    pub fn is_none(&self) -> bool {
        matches!(self, CellValue::None)
    }

    /// Returns `true` for integer and float values.
    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Int(_) | CellValue::Float(_))
    }

    /// Returns the text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a number for range filtering.
    ///
    /// Integers and floats convert directly, text is parsed if it holds a
    /// number, and everything else is `NaN` (which no bounded band matches).
    pub fn as_number(&self) -> f64 {
        match self {
            CellValue::Int(n) => *n as f64,
            CellValue::Float(n) => *n,
            CellValue::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
            _ => f64::NAN,
        }
    }

    /// Compares two values with the default ordering.
    ///
    /// Numbers compare numerically (integers and floats mix), text uses the
    /// given collator, dates compare chronologically. Values of different
    /// kinds order as `None < Bool < numbers < Date < Text`.
    pub fn compare(&self, other: &CellValue, collator: &TextCollator) -> Ordering {
        match (self, other) {
            (CellValue::Int(a), CellValue::Int(b)) => a.cmp(b),
            (a, b) if a.is_numeric() && b.is_numeric() => a.as_number().total_cmp(&b.as_number()),
            (CellValue::Text(a), CellValue::Text(b)) => collator.compare(a, b),
            (CellValue::Date(a), CellValue::Date(b)) => a.cmp(b),
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (a, b) => a.kind_rank().cmp(&b.kind_rank()),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            CellValue::None => 0,
            CellValue::Bool(_) => 1,
            CellValue::Int(_) | CellValue::Float(_) => 2,
            CellValue::Date(_) => 3,
            CellValue::Text(_) => 4,
        }
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::None, CellValue::None) => true,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (a, b) if a.is_numeric() && b.is_numeric() => a.as_number() == b.as_number(),
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            (CellValue::Date(a), CellValue::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::None => Ok(()),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Int(n) => write!(f, "{n}"),
            CellValue::Float(n) => write!(f, "{n}"),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Date(d) => write!(f, "{d}"),
        }
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<&String> for CellValue {
    fn from(s: &String) -> Self {
        CellValue::Text(s.clone())
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Int(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Int(n as i64)
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        CellValue::Int(n as i64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Float(n)
    }
}

impl From<f32> for CellValue {
    fn from(n: f32) -> Self {
        CellValue::Float(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(d: NaiveDateTime) -> Self {
        CellValue::Date(d)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d.and_time(chrono::NaiveTime::MIN))
    }
}

impl<V: Into<CellValue>> From<Option<V>> for CellValue {
    fn from(value: Option<V>) -> Self {
        value.map_or(CellValue::None, Into::into)
    }
}

/// String comparison used by the default text ordering.
///
/// Without a locale, text compares "naturally": case-insensitive, with runs
/// of digits compared by numeric value, so `item2` sorts before `item10`.
/// With the `localization` feature a BCP 47 locale selects ICU collation.
pub struct TextCollator {
    #[cfg(feature = "localization")]
    icu: Option<icu::collator::CollatorBorrowed<'static>>,
}

impl fmt::Debug for TextCollator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextCollator")
            .field("locale_aware", &self.is_locale_aware())
            .finish()
    }
}

impl Default for TextCollator {
    fn default() -> Self {
        Self::natural()
    }
}

impl TextCollator {
    /// A collator using natural, case-insensitive ordering.
    pub const fn natural() -> Self {
        Self {
            #[cfg(feature = "localization")]
            icu: None,
        }
    }

    /// A collator for the given locale.
    ///
    /// Falls back to natural ordering (with a warning) when the locale is not
    /// recognized or the `localization` feature is disabled.
    pub fn for_locale(locale: &str) -> Self {
        #[cfg(feature = "localization")]
        {
            use icu::collator::Collator;
            use icu::collator::options::CollatorOptions;
            use icu::locale::Locale;

            let collator = locale
                .parse::<Locale>()
                .ok()
                .and_then(|locale| Collator::try_new(locale.into(), CollatorOptions::default()).ok());
            if collator.is_none() {
                tracing::warn!(target: gridwork_core::logging::targets::PIPELINE, locale, "unsupported locale, using natural text ordering");
            }
            Self { icu: collator }
        }

        #[cfg(not(feature = "localization"))]
        {
            tracing::warn!(
                target: gridwork_core::logging::targets::PIPELINE,
                locale,
                "locale-aware ordering requires the `localization` feature, using natural text ordering"
            );
            Self::natural()
        }
    }

    /// Returns `true` if comparisons use ICU collation.
    pub fn is_locale_aware(&self) -> bool {
        #[cfg(feature = "localization")]
        {
            self.icu.is_some()
        }
        #[cfg(not(feature = "localization"))]
        {
            false
        }
    }

    /// Compares two strings.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        #[cfg(feature = "localization")]
        if let Some(collator) = &self.icu {
            return collator.compare(a, b);
        }
        natural_cmp(a, b)
    }
}

/// Case-insensitive comparison that orders digit runs by numeric value.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => break,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_digits = take_digits(&mut left);
                let r_digits = take_digits(&mut right);
                let ordering = compare_digit_runs(&l_digits, &r_digits);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(l), Some(r)) => {
                let ordering = l.to_lowercase().cmp(r.to_lowercase());
                if ordering != Ordering::Equal {
                    return ordering;
                }
                left.next();
                right.next();
            }
        }
    }

    // Equal ignoring case: fall back to a byte comparison so the order is total.
    a.cmp(b)
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        digits.push(c);
    }
    digits
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
