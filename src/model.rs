//! The table model: owns the loaded table and every mutation of it.
//!
//! All operations check their preconditions before touching any state, so a
//! failed call leaves both the table and the modified flag exactly as they were.

mod error;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub use error::{Axis, ModelError};

use crate::fileio::FileIO;
use crate::table::{Column, ColumnType, Table, Value};

pub type Result<T> = std::result::Result<T, ModelError>;

/// Validate an index against `limit` (exclusive), returning it as `usize`
fn checked_index(axis: Axis, index: isize, limit: usize) -> Result<usize> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < limit)
        .ok_or_else(|| ModelError::out_of_bounds(axis, index))
}

pub struct TableModel {
    table: Option<Table>,
    file_io: FileIO,
    modified: bool,
    has_header: bool,
    /// Bumped on every change to the held table
    revision: u64,
    /// Repairs reported by the most recent load
    warnings: Vec<String>,
}

impl TableModel {
    /// Construct the model and load `path` immediately
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_delimiter(path, None)
    }

    pub fn open_with_delimiter(path: impl Into<PathBuf>, delimiter: Option<u8>) -> Result<Self> {
        let mut model = Self::deferred(path, delimiter);
        model.load()?;
        Ok(model)
    }

    /// Construct the model without loading; the table stays absent until `load`
    pub fn deferred(path: impl Into<PathBuf>, delimiter: Option<u8>) -> Self {
        Self {
            table: None,
            file_io: FileIO::new(path.into(), delimiter),
            modified: false,
            has_header: false,
            revision: 0,
            warnings: Vec::new(),
        }
    }

    // === Load / save ===

    /// Read the source file, replacing any table currently held
    pub fn load(&mut self) -> Result<()> {
        let result = self.file_io.load_table()?;

        info!(
            path = %self.source_path().display(),
            rows = result.table.row_count(),
            cols = result.table.col_count(),
            "loaded table"
        );

        self.table = Some(result.table);
        self.warnings = result.warnings;
        self.modified = false;
        self.revision += 1;
        self.has_header = true;
        Ok(())
    }

    /// Discard unsaved edits and re-read the source file
    pub fn reload(&mut self) -> Result<()> {
        self.load()
    }

    /// Write the table back to the source file
    pub fn save(&mut self) -> Result<()> {
        let table = self.table.as_ref().ok_or(ModelError::NoDataToSave)?;
        self.file_io.write(table)?;
        self.modified = false;
        info!(path = %self.source_path().display(), rows = table.row_count(), "saved table");
        Ok(())
    }

    /// Drop the held table; the model behaves as unloaded until the next `load`
    pub fn clear(&mut self) {
        self.table = None;
        self.revision += 1;
    }

    // === State ===

    pub fn source_path(&self) -> &Path {
        &self.file_io.file_path
    }

    /// File name component of the source path, for titles and messages
    pub fn display_name(&self) -> String {
        self.source_path()
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.source_path().display().to_string())
    }

    pub fn delimiter_name(&self) -> String {
        self.file_io.delimiter_name()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn has_header(&self) -> bool {
        self.has_header
    }

    /// Changes whenever the table contents change; lets views cache derived data
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_loaded(&self) -> bool {
        self.table.is_some()
    }

    pub fn load_warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    // === Read queries ===

    pub fn row_count(&self) -> usize {
        self.table.as_ref().map(Table::row_count).unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.table.as_ref().map(Table::col_count).unwrap_or(0)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.table.as_ref().map(Table::column_names).unwrap_or_default()
    }

    fn touch(&mut self) {
        self.modified = true;
        self.revision += 1;
    }

    fn loaded(&self) -> Result<&Table> {
        self.table.as_ref().ok_or(ModelError::NoDataLoaded)
    }

    fn loaded_mut(&mut self) -> Result<&mut Table> {
        self.table.as_mut().ok_or(ModelError::NoDataLoaded)
    }

    fn column_at(&self, col_idx: isize) -> Result<&Column> {
        let table = self.loaded()?;
        let col = checked_index(Axis::Column, col_idx, table.col_count())?;
        table.column(col).ok_or_else(|| ModelError::out_of_bounds(Axis::Column, col_idx))
    }

    pub fn column_name(&self, col_idx: isize) -> Result<&str> {
        self.column_at(col_idx).map(Column::name)
    }

    pub fn column_type(&self, col_idx: isize) -> Result<ColumnType> {
        self.column_at(col_idx).map(Column::dtype)
    }

    pub fn get_value(&self, row_idx: isize, col_idx: isize) -> Result<&Value> {
        let table = self.loaded()?;
        let row = checked_index(Axis::Row, row_idx, table.row_count())?;
        let col = checked_index(Axis::Column, col_idx, table.col_count())?;
        table.get_cell(row, col).ok_or_else(|| ModelError::out_of_bounds(Axis::Row, row_idx))
    }

    pub fn row_values(&self, row_idx: isize) -> Result<Vec<Value>> {
        let table = self.loaded()?;
        let row = checked_index(Axis::Row, row_idx, table.row_count())?;
        table.get_row(row).ok_or_else(|| ModelError::out_of_bounds(Axis::Row, row_idx))
    }

    // === Mutations ===

    /// Overwrite one cell, coercing the value to the column's type
    pub fn set_cell(&mut self, row_idx: isize, col_idx: isize, value: impl Into<Value>) -> Result<()> {
        let table = self.loaded_mut()?;
        let row = checked_index(Axis::Row, row_idx, table.row_count())?;
        let col = checked_index(Axis::Column, col_idx, table.col_count())?;

        table.set_cell(row, col, value.into());
        self.touch();
        debug!(row, col, "set cell");
        Ok(())
    }

    /// Insert a row before `row_idx`; `row_count()` appends. Without `values`
    /// every cell of the new row is null.
    pub fn insert_row(&mut self, row_idx: isize, values: Option<Vec<Value>>) -> Result<()> {
        let table = self.loaded_mut()?;
        let row = checked_index(Axis::Row, row_idx, table.row_count() + 1)?;

        match values {
            Some(values) => {
                if values.len() != table.col_count() {
                    return Err(ModelError::ValueCount {
                        expected: table.col_count(),
                        got: values.len(),
                    });
                }
                table.insert_row_at(row, values);
            }
            None => table.insert_empty_row_at(row),
        }

        self.touch();
        debug!(row, "inserted row");
        Ok(())
    }

    /// Insert a null-filled column before `col_idx`; `column_count()` appends.
    ///
    /// Without a name the column is called `Column_{col_idx}`, or the first
    /// `Column_{n}` above that not already taken. Returns the name used.
    pub fn insert_column(&mut self, col_idx: isize, name: Option<&str>) -> Result<String> {
        let table = self.loaded_mut()?;
        let col = checked_index(Axis::Column, col_idx, table.col_count() + 1)?;

        let name = match name {
            Some(name) if table.contains_column(name) => {
                return Err(ModelError::DuplicateColumn { name: name.to_string() });
            }
            Some(name) => name.to_string(),
            None => table.unique_column_name(col),
        };

        table.insert_col_at(col, name.clone());
        self.touch();
        debug!(col, name = %name, "inserted column");
        Ok(name)
    }

    pub fn delete_row(&mut self, row_idx: isize) -> Result<()> {
        let table = self.loaded_mut()?;
        let row = checked_index(Axis::Row, row_idx, table.row_count())?;
        if table.row_count() == 1 {
            return Err(ModelError::LastRemaining { axis: Axis::Row });
        }

        table.delete_row_at(row);
        self.touch();
        debug!(row, "deleted row");
        Ok(())
    }

    pub fn delete_column(&mut self, col_idx: isize) -> Result<()> {
        let table = self.loaded_mut()?;
        let col = checked_index(Axis::Column, col_idx, table.col_count())?;
        if table.col_count() == 1 {
            return Err(ModelError::LastRemaining { axis: Axis::Column });
        }

        table.delete_col_at(col);
        self.touch();
        debug!(col, "deleted column");
        Ok(())
    }

    pub fn rename_column(&mut self, col_idx: isize, name: &str) -> Result<()> {
        let table = self.loaded_mut()?;
        let col = checked_index(Axis::Column, col_idx, table.col_count())?;
        if name.is_empty() {
            return Err(ModelError::EmptyColumnName);
        }

        match table.column_index(name) {
            Some(existing) if existing == col => return Ok(()),
            Some(_) => return Err(ModelError::DuplicateColumn { name: name.to_string() }),
            None => {}
        }

        table.rename_col(col, name.to_string());
        self.touch();
        debug!(col, name, "renamed column");
        Ok(())
    }
}
