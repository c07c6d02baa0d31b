//! Column definitions.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use super::state::FilterValue;
use super::value::CellValue;

/// Default column width in pixels.
pub const DEFAULT_COLUMN_SIZE: f32 = 150.0;

/// Default minimum column width in pixels.
pub const DEFAULT_MIN_COLUMN_SIZE: f32 = 20.0;

/// Type alias for an accessor, extracting a cell value from a record.
pub type AccessorFn<T> = Arc<dyn Fn(&T) -> CellValue + Send + Sync>;

/// Type alias for a filter predicate.
///
/// Returns `true` if a cell value passes the active filter value.
pub type ColumnFilterFn = Arc<dyn Fn(&CellValue, &FilterValue) -> bool + Send + Sync>;

/// Type alias for a compare function used when sorting by a column.
pub type ColumnCompareFn = Arc<dyn Fn(&CellValue, &CellValue) -> Ordering + Send + Sync>;

/// How a column evaluates its filter value.
#[derive(Clone, Default)]
pub enum FilterKind {
    /// Pick a predicate from the cell value: substring match on text, band
    /// matching for range values, equality otherwise.
    #[default]
    Auto,
    /// Case-insensitive substring match on the displayed value.
    IncludesText,
    /// Equality. Text filter values compare against the displayed value.
    Equals,
    /// Numeric bands. Filter text is parsed with [`parse_filter`](crate::filter::parse_filter).
    NumericRange,
    /// A host-supplied predicate.
    Custom(ColumnFilterFn),
}

impl FilterKind {
    /// Returns `true` for [`FilterKind::NumericRange`].
    pub fn is_numeric_range(&self) -> bool {
        matches!(self, FilterKind::NumericRange)
    }
}

impl fmt::Debug for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterKind::Auto => f.write_str("Auto"),
            FilterKind::IncludesText => f.write_str("IncludesText"),
            FilterKind::Equals => f.write_str("Equals"),
            FilterKind::NumericRange => f.write_str("NumericRange"),
            FilterKind::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Definition of one column: where its value comes from and how it sorts,
/// filters and sizes.
///
/// # Example
///
/// ```
/// use gridwork::model::{ColumnDef, FilterKind};
///
/// struct Station {
///     name: String,
///     elevation: i64,
/// }
///
/// let name = ColumnDef::new("name", |s: &Station| s.name.clone().into()).with_header("Name");
/// let elevation = ColumnDef::new("elevation", |s: &Station| s.elevation.into())
///     .with_filter_kind(FilterKind::NumericRange)
///     .with_size_bounds(60.0, 240.0);
///
/// assert_eq!(name.header(), "Name");
/// assert!(elevation.filter_kind().is_numeric_range());
/// ```
pub struct ColumnDef<T> {
    id: String,
    header: String,
    accessor: AccessorFn<T>,
    filter_kind: FilterKind,
    compare: Option<ColumnCompareFn>,
    sort_desc_first: Option<bool>,
    sortable: bool,
    filterable: bool,
    resizable: bool,
    size: f32,
    min_size: f32,
    max_size: f32,
}

impl<T> ColumnDef<T> {
    /// Creates a column with an id and an accessor. The header defaults to the id.
    pub fn new<F>(id: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> CellValue + Send + Sync + 'static,
    {
        let id = id.into();
        Self {
            header: id.clone(),
            id,
            accessor: Arc::new(accessor),
            filter_kind: FilterKind::Auto,
            compare: None,
            sort_desc_first: None,
            sortable: true,
            filterable: true,
            resizable: true,
            size: DEFAULT_COLUMN_SIZE,
            min_size: DEFAULT_MIN_COLUMN_SIZE,
            max_size: f32::MAX,
        }
    }

    /// Sets the header label.
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Sets how filter values are evaluated.
    pub fn with_filter_kind(mut self, kind: FilterKind) -> Self {
        self.filter_kind = kind;
        self
    }

    /// Uses a custom filter predicate.
    pub fn with_filter<F>(self, filter: F) -> Self
    where
        F: Fn(&CellValue, &FilterValue) -> bool + Send + Sync + 'static,
    {
        self.with_filter_kind(FilterKind::Custom(Arc::new(filter)))
    }

    /// Uses a custom comparator when sorting by this column.
    ///
    /// Empty cells are still ordered last before the comparator is consulted.
    pub fn with_compare<F>(mut self, compare: F) -> Self
    where
        F: Fn(&CellValue, &CellValue) -> Ordering + Send + Sync + 'static,
    {
        self.compare = Some(Arc::new(compare));
        self
    }

    /// Overrides the first direction of the sort toggle cycle.
    pub fn with_sort_desc_first(mut self, desc_first: bool) -> Self {
        self.sort_desc_first = Some(desc_first);
        self
    }

    /// Enables or disables sorting by this column.
    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Enables or disables filtering this column.
    pub fn with_filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    /// Enables or disables resizing this column.
    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Sets the default width. Non-finite widths are ignored.
    pub fn with_size(mut self, size: f32) -> Self {
        if size.is_finite() {
            self.size = size;
        }
        self
    }

    /// Sets the width bounds applied when resizing.
    ///
    /// A NaN or infinite minimum and a NaN maximum keep the previous bound;
    /// the maximum never drops below the minimum.
    pub fn with_size_bounds(mut self, min: f32, max: f32) -> Self {
        if min.is_finite() {
            self.min_size = min;
        }
        if !max.is_nan() {
            self.max_size = max;
        }
        self.max_size = self.max_size.max(self.min_size);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    /// How this column interprets filter text.
    pub fn filter_kind(&self) -> &FilterKind {
        &self.filter_kind
    }

    /// The custom comparator, if one was set.
    pub fn compare_fn(&self) -> Option<&ColumnCompareFn> {
        self.compare.as_ref()
    }

    /// Whether the first sort toggle goes descending. `None` infers it from the first filtered row.
    pub fn sort_desc_first(&self) -> Option<bool> {
        self.sort_desc_first
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn is_filterable(&self) -> bool {
        self.filterable
    }

    pub fn is_resizable(&self) -> bool {
        self.resizable
    }

    /// The default width, clamped to the size bounds.
    pub fn size(&self) -> f32 {
        self.clamp_size(self.size)
    }

    pub fn min_size(&self) -> f32 {
        self.min_size
    }

    pub fn max_size(&self) -> f32 {
        self.max_size
    }

    /// Clamps a width to this column's bounds.
    pub fn clamp_size(&self, width: f32) -> f32 {
        width.clamp(self.min_size, self.max_size)
    }

    /// Extracts this column's value from a record.
    pub fn value(&self, data: &T) -> CellValue {
        (self.accessor)(data)
    }
}

impl<T> Clone for ColumnDef<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            accessor: Arc::clone(&self.accessor),
            filter_kind: self.filter_kind.clone(),
            compare: self.compare.clone(),
            sort_desc_first: self.sort_desc_first,
            sortable: self.sortable,
            filterable: self.filterable,
            resizable: self.resizable,
            size: self.size,
            min_size: self.min_size,
            max_size: self.max_size,
        }
    }
}

impl<T> fmt::Debug for ColumnDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("filter_kind", &self.filter_kind)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("resizable", &self.resizable)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}
