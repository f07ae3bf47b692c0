pub mod value;

use rayon::prelude::*;

use std::collections::HashSet;

pub use value::{ColumnType, Value};

/// Threshold for using parallel processing (rows * cols)
const PARALLEL_THRESHOLD: usize = 10_000;

/// Narrowest column width handed to the renderer
pub const MIN_COL_WIDTH: usize = 3;

/// Default column name `Column_{start}`, or the first `Column_{n}` above it not in `taken`
pub fn probe_column_name(taken: &HashSet<&str>, start: usize) -> String {
    (start..)
        .map(|n| format!("Column_{}", n))
        .find(|name| !taken.contains(name.as_str()))
        .unwrap_or_default()
}

/// A named column of values sharing one semantic type
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    dtype: ColumnType,
    values: Vec<Value>,
}

impl Column {
    /// Build a column from raw fields, inferring its type
    pub fn from_fields(name: String, fields: &[&str]) -> Self {
        let dtype = ColumnType::infer(fields.iter().copied());
        let values = fields.iter().map(|f| dtype.parse(f)).collect();
        Self { name, dtype, values }
    }

    /// A column of `len` null values
    pub fn nulls(name: String, dtype: ColumnType, len: usize) -> Self {
        Self { name, dtype, values: vec![Value::Null; len] }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> ColumnType {
        self.dtype
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Convert every stored value to `dtype`. Only ever widens (Int -> Float -> Text).
    fn promote(&mut self, dtype: ColumnType) {
        let values = std::mem::take(&mut self.values);
        self.values = values
            .into_iter()
            .map(|v| dtype.coerce(v).unwrap_or(Value::Null))
            .collect();
        self.dtype = dtype;
    }

    /// Coerce `value` into this column's type, widening the column when the
    /// value does not fit.
    fn coerce_widening(&mut self, value: Value) -> Value {
        match self.dtype.coerce(value.clone()) {
            Ok(v) => v,
            Err(wider) => {
                self.promote(wider);
                // Text accepts everything, Float accepts anything Int rejected as Float
                self.dtype.coerce(value).unwrap_or(Value::Null)
            }
        }
    }

    fn display_width(&self, max_width: usize) -> usize {
        self.values
            .iter()
            .map(|v| crate::util::display_width(&v.to_string()))
            .chain(std::iter::once(crate::util::display_width(&self.name)))
            .max()
            .unwrap_or(MIN_COL_WIDTH)
            .max(MIN_COL_WIDTH)
            .min(max_width)
    }
}

/// Pure data structure for the table: ordered named columns of equal length
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    /// Number of data rows (header excluded)
    row_count: usize,
}

impl Table {
    /// Build a table from header names and raw records.
    ///
    /// Every record must already be exactly `headers.len()` fields wide.
    pub fn from_records(headers: Vec<String>, records: &[Vec<String>]) -> Self {
        let row_count = records.len();
        let columns = headers
            .into_iter()
            .enumerate()
            .map(|(col, name)| {
                let fields: Vec<&str> = records
                    .iter()
                    .map(|r| r.get(col).map(String::as_str).unwrap_or(""))
                    .collect();
                Column::from_fields(name, &fields)
            })
            .collect();

        Self { columns, row_count }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, col: usize) -> Option<&Column> {
        self.columns.get(col)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn get_cell(&self, row: usize, col: usize) -> Option<&Value> {
        self.columns.get(col)?.values.get(row)
    }

    /// Write a value, coercing it to the column type. Out-of-range positions are ignored.
    pub fn set_cell(&mut self, row: usize, col: usize, value: Value) {
        if row >= self.row_count {
            return;
        }
        if let Some(column) = self.columns.get_mut(col) {
            let v = column.coerce_widening(value);
            column.values[row] = v;
        }
    }

    pub fn get_row(&self, row: usize) -> Option<Vec<Value>> {
        if row >= self.row_count {
            return None;
        }
        Some(self.columns.iter().map(|c| c.values[row].clone()).collect())
    }

    /// Iterator over all rows as display text, header excluded
    pub fn rows_iter(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        (0..self.row_count).map(move |row| {
            self.columns.iter().map(|c| c.values[row].to_string()).collect()
        })
    }

    /// Insert a row at `idx` (clamped to an append). `values` must have one
    /// entry per column; missing entries become null.
    pub fn insert_row_at(&mut self, idx: usize, values: Vec<Value>) {
        let idx = idx.min(self.row_count);
        let mut values = values.into_iter();
        for column in self.columns.iter_mut() {
            let v = values.next().unwrap_or(Value::Null);
            let v = column.coerce_widening(v);
            column.values.insert(idx, v);
        }
        self.row_count += 1;
    }

    pub fn insert_empty_row_at(&mut self, idx: usize) {
        self.insert_row_at(idx, Vec::new());
    }

    pub fn delete_row_at(&mut self, idx: usize) -> Option<Vec<Value>> {
        if idx >= self.row_count {
            return None;
        }
        let removed = self.columns.iter_mut().map(|c| c.values.remove(idx)).collect();
        self.row_count -= 1;
        Some(removed)
    }

    /// Insert a null-filled text column at `idx` (clamped to an append)
    pub fn insert_col_at(&mut self, idx: usize, name: String) {
        let idx = idx.min(self.columns.len());
        self.columns.insert(idx, Column::nulls(name, ColumnType::Text, self.row_count));
    }

    pub fn delete_col_at(&mut self, idx: usize) -> Option<Column> {
        if idx >= self.columns.len() {
            return None;
        }
        Some(self.columns.remove(idx))
    }

    pub fn rename_col(&mut self, idx: usize, name: String) {
        if let Some(column) = self.columns.get_mut(idx) {
            column.name = name;
        }
    }

    /// First free name of the form `Column_{n}`, probing upward from `start`
    pub fn unique_column_name(&self, start: usize) -> String {
        let taken: HashSet<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        probe_column_name(&taken, start)
    }

    /// Display width per column, clamped to `[MIN_COL_WIDTH, max_width]`.
    /// Uses parallel processing for large tables
    pub fn col_widths(&self, max_width: usize) -> Vec<usize> {
        let size = self.row_count * self.columns.len();

        if size >= PARALLEL_THRESHOLD && self.columns.len() > 1 {
            self.columns
                .par_iter()
                .map(|c| c.display_width(max_width))
                .collect()
        } else {
            self.columns
                .iter()
                .map(|c| c.display_width(max_width))
                .collect()
        }
    }
}

#[cfg(test)]
mod test;
