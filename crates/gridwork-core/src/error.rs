//! Error types for gridwork.
//!
//! Two kinds of failures leave the engine:
//!
//! - [`ParseError`] from the range-filter expression parser. It is always
//!   recoverable: the column keeps its last valid filter and the input widget
//!   flags the text.
//! - [`ConfigurationError`] when derived state is requested before the grid has
//!   both columns and rows, or when options are invalid.
//!
//! Stale references coming from the UI are not errors; the engine ignores them.

/// A specialized Result type for gridwork operations.
pub type Result<T> = std::result::Result<T, GridError>;

/// The main error type for grid operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// Filter text for a range column could not be parsed.
    #[error("Filter for column '{column}' rejected: {source}")]
    Parse {
        column: String,
        #[source]
        source: ParseError,
    },

    /// The grid is missing required input or has invalid options.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl GridError {
    /// Create a parse error attributed to a column.
    pub fn parse(column: impl Into<String>, source: ParseError) -> Self {
        Self::Parse {
            column: column.into(),
            source,
        }
    }

    /// Returns `true` if this error came from filter expression parsing.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

/// What exactly was wrong with a filter expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A comparison member contained no operator (`>`, `>=`, `<`, `<=`).
    MissingOperator,
    /// A comparison member contained no numeric operand.
    MissingOperand,
    /// A comparison member contained more than one operator.
    MultipleOperators,
    /// A comparison member contained more than one numeric operand.
    MultipleOperands,
    /// A character that is neither an operator, a number, a word nor whitespace.
    UnexpectedCharacter(char),
}

/// Error returned by the filter expression parser.
///
/// The displayed message is always `Invalid input`; [`kind`](Self::kind) and
/// [`offset`](Self::offset) carry the details for hosts that want them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid input")]
pub struct ParseError {
    kind: ParseErrorKind,
    offset: usize,
}

impl ParseError {
    /// Create a parse error at a byte offset into the original input.
    pub fn new(kind: ParseErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    /// The kind of problem found.
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    /// Byte offset into the full input where the offending member or character starts.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Missing or invalid grid configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// No column definitions have been supplied.
    #[error("Grid has no column definitions. Call configure() or set_columns() first")]
    MissingColumns,

    /// No row data has been supplied.
    #[error("Grid has no row data. Call configure() or set_data() first")]
    MissingRows,

    /// Two column definitions share the same id.
    #[error("Duplicate column id '{0}'")]
    DuplicateColumn(String),

    /// Options could not be read or hold an invalid value.
    #[error("Invalid grid options: {0}")]
    InvalidOptions(String),
}
