use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::model::ModelError;
use crate::table::{probe_column_name, Table};

/// Detected file format
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileFormat {
    Csv,
    Tsv,
}

impl FileFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(FileFormat::Csv),
            "tsv" => Some(FileFormat::Tsv),
            _ => None,
        }
    }

    /// Get the delimiter for the format
    fn delimiter(&self) -> u8 {
        match self {
            FileFormat::Csv => b',',
            FileFormat::Tsv => b'\t',
        }
    }
}

/// Result of loading a file, including any repairs made along the way
#[derive(Debug)]
pub struct LoadResult {
    pub table: Table,
    pub warnings: Vec<String>,
}

/// Reads and writes one delimited file. The first line is always the header.
#[derive(Debug, Clone)]
pub struct FileIO {
    pub file_path: PathBuf,
    delimiter: u8,
}

impl FileIO {
    /// `delimiter` overrides the one implied by the file extension (comma when unknown)
    pub fn new(file_path: PathBuf, delimiter: Option<u8>) -> Self {
        let delimiter = delimiter.unwrap_or_else(|| {
            FileFormat::from_extension(&file_path)
                .map(|f| f.delimiter())
                .unwrap_or(b',')
        });
        Self { file_path, delimiter }
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn delimiter_name(&self) -> String {
        match self.delimiter {
            b',' => "comma".to_string(),
            b'\t' => "tab".to_string(),
            b';' => "semicolon".to_string(),
            b'|' => "pipe".to_string(),
            other => format!("'{}'", other as char),
        }
    }

    /// Load the table, returning warnings about any rows that had to be repaired
    pub fn load_table(&self) -> Result<LoadResult, ModelError> {
        let path = &self.file_path;
        if !path.exists() {
            return Err(ModelError::NotFound { path: path.clone() });
        }

        let file = File::open(path)?;
        let reader = BufReader::with_capacity(1 << 20, file); // 1 MB

        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut records = csv_reader.records();

        let mut headers: Vec<String> = match records.next() {
            Some(record) => record?.iter().map(|s| s.to_string()).collect(),
            None => return Err(ModelError::EmptyFile { path: path.clone() }),
        };

        {
            let mut seen = HashSet::new();
            if let Some(dup) = headers.iter().find(|h| !seen.insert(h.as_str())) {
                return Err(ModelError::DuplicateColumn { name: dup.clone() });
            }
        }

        let header_width = headers.len();
        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut max_cols = header_width;
        let mut short_rows = 0usize;

        for result in records {
            let record = result?;
            let row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            if row.len() < header_width {
                short_rows += 1;
            }
            max_cols = max_cols.max(row.len());
            rows.push(row);
        }

        let mut warnings = Vec::new();

        if short_rows > 0 {
            warnings.push(format!("Padded {} short row(s) with empty cells", short_rows));
        }

        // Rows wider than the header get generated column names
        if max_cols > header_width {
            let mut added = Vec::new();
            for col in header_width..max_cols {
                let name = {
                    let taken: HashSet<&str> = headers.iter().map(String::as_str).collect();
                    probe_column_name(&taken, col)
                };
                added.push(name.clone());
                headers.push(name);
            }
            warnings.push(format!(
                "Added column(s) for rows wider than the header: {}",
                added.join(", ")
            ));
        }

        // Pad all rows to the final width; empty fields load as null
        for row in rows.iter_mut() {
            if row.len() < max_cols {
                row.resize(max_cols, String::new());
            }
        }

        debug!(path = %path.display(), rows = rows.len(), cols = max_cols, "read delimited file");

        Ok(LoadResult {
            table: Table::from_records(headers, &rows),
            warnings,
        })
    }

    /// Write table to file, header row first
    pub fn write(&self, table: &Table) -> Result<(), ModelError> {
        let file = File::create(&self.file_path)?;
        let writer = BufWriter::new(file);
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        csv_writer.write_record(table.column_names())?;
        for row in table.rows_iter() {
            csv_writer.write_record(&row)?;
        }

        csv_writer.flush()?;

        debug!(path = %self.file_path.display(), rows = table.row_count(), "wrote delimited file");
        Ok(())
    }
}
