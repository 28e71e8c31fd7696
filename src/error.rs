use thiserror::Error;

// ---------------------------------------------------------------------------
// Dataset errors
// ---------------------------------------------------------------------------

/// Structural problems with a Gapminder table.
///
/// The loader wraps these in `anyhow::Error` with file context; callers that
/// need to tell them apart use `downcast_ref::<DatasetError>()`.
#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("column '{column}' has type {found}, expected {expected}")]
    ColumnType {
        column: String,
        expected: &'static str,
        found: String,
    },

    #[error("row {row}: null value in required column '{column}'")]
    NullValue { row: usize, column: String },

    #[error("dataset contains no observations")]
    Empty,
}
