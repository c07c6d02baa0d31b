//! Grid options.

use std::path::Path;

use gridwork_core::ConfigurationError;
use gridwork_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::model::{DEFAULT_PAGE_SIZE, FilterMode, GridFeatures};

/// Feature switches and defaults for a grid.
///
/// Missing keys take their defaults when deserializing, so a host only lists
/// what it changes:
///
/// ```
/// use gridwork::grid::GridOptions;
///
/// let options = GridOptions::from_toml_str("paginate = true\npage_size = 50").unwrap();
/// assert!(options.paginate);
/// assert_eq!(options.page_size, 50);
/// assert!(options.select_children);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// Rows can be selected.
    pub selectable: bool,
    /// Columns can be sorted.
    pub sortable: bool,
    /// Top-level rows are split into pages.
    pub paginate: bool,
    /// Columns can be filtered.
    pub filterable: bool,
    /// Columns can be resized.
    pub resizable: bool,
    /// Top-level rows per page. Must be positive.
    pub page_size: usize,
    /// How filters treat parents and children.
    pub filter_mode: FilterMode,
    /// Toggling a row also toggles its filtered descendants.
    pub select_children: bool,
    /// BCP 47 locale for text ordering. Natural ordering when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            selectable: false,
            sortable: false,
            paginate: false,
            filterable: false,
            resizable: false,
            page_size: DEFAULT_PAGE_SIZE,
            filter_mode: FilterMode::FromRoot,
            select_children: true,
            locale: None,
        }
    }
}

impl GridOptions {
    /// Options with every feature switched on.
    pub fn all_features() -> Self {
        Self {
            selectable: true,
            sortable: true,
            paginate: true,
            filterable: true,
            resizable: true,
            ..Self::default()
        }
    }

    /// Sets the number of top-level rows per page.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets how filters treat parents and children.
    pub fn with_filter_mode(mut self, mode: FilterMode) -> Self {
        self.filter_mode = mode;
        self
    }

    /// Sets whether toggling a row also toggles its descendants.
    pub fn with_select_children(mut self, select_children: bool) -> Self {
        self.select_children = select_children;
        self
    }

    /// Sets the locale used to order text. Requires the `localization` feature to take effect.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Parses options from TOML and validates them.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigurationError> {
        let options: Self = toml::from_str(content).map_err(|e| invalid(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Parses options from JSON and validates them.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigurationError> {
        let options: Self = serde_json::from_str(content).map_err(|e| invalid(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Loads options from a `.toml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| invalid(format!("{}: {e}", path.display())))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    /// Serializes the options as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigurationError> {
        toml::to_string_pretty(self).map_err(|e| invalid(e.to_string()))
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.page_size == 0 {
            return Err(invalid("page_size must be greater than 0"));
        }
        Ok(())
    }

    /// The pipeline stages these options enable.
    pub fn features(&self) -> GridFeatures {
        GridFeatures {
            filtering: self.filterable,
            sorting: self.sortable,
            pagination: self.paginate,
            selection: self.selectable,
            resizing: self.resizable,
        }
    }
}

fn invalid(reason: impl Into<String>) -> ConfigurationError {
    let reason = reason.into();
    tracing::warn!(target: targets::GRID, %reason, "rejected grid options");
    ConfigurationError::InvalidOptions(reason)
}
