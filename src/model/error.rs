use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Table axis an index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl Axis {
    fn lowercase(&self) -> &'static str {
        match self {
            Axis::Row => "row",
            Axis::Column => "column",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => f.write_str("Row"),
            Axis::Column => f.write_str("Column"),
        }
    }
}

/// Errors raised by loading, saving, querying and mutating a table.
///
/// Every variant except `Io` and `Csv` is raised before any state changes.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("CSV file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("CSV file is empty: {}", path.display())]
    EmptyFile { path: PathBuf },

    #[error("No data loaded")]
    NoDataLoaded,

    #[error("No data to save")]
    NoDataToSave,

    #[error("{axis} index {index} out of bounds")]
    IndexOutOfBounds { axis: Axis, index: isize },

    #[error("Cannot delete the last remaining {}", axis.lowercase())]
    LastRemaining { axis: Axis },

    #[error("Column name '{name}' already exists")]
    DuplicateColumn { name: String },

    #[error("Column name cannot be empty")]
    EmptyColumnName,

    #[error("Expected {expected} values, got {got}")]
    ValueCount { expected: usize, got: usize },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl ModelError {
    pub fn out_of_bounds(axis: Axis, index: isize) -> Self {
        ModelError::IndexOutOfBounds { axis, index }
    }
}
