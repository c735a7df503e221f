//! In-memory sheet table and CSV loading/saving.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use log::{debug, info};

use crate::error::{Result, SyncError};

/// A sheet: a header row plus ordered data rows of string cells.
///
/// Data rows are not forced to the header width. Operations that address a
/// position beyond a row's length treat the cell as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Reads a CSV file. The first record becomes the header row.
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading sheet: {}", path.display());

        let file = File::open(path).map_err(|e| SyncError::io(path, e))?;
        let table = Self::from_reader(file)?.ok_or_else(|| SyncError::EmptyTable {
            path: path.to_path_buf(),
        })?;

        info!(
            "Loaded {} rows x {} columns from {}",
            table.len(),
            table.headers.len(),
            path.display()
        );
        Ok(table)
    }

    /// Parses CSV from any reader. Returns `None` if there is no header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Option<Self>> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut records = rdr.records();
        let headers = match records.next() {
            Some(record) => {
                let mut headers: Vec<String> = record?.iter().map(str::to_string).collect();
                if let Some(first) = headers.first_mut() {
                    if let Some(stripped) = first.strip_prefix('\u{feff}') {
                        *first = stripped.to_string();
                    }
                }
                headers
            }
            None => return Ok(None),
        };

        let mut rows = Vec::new();
        for record in records {
            rows.push(record?.iter().map(str::to_string).collect());
        }

        Ok(Some(Self { headers, rows }))
    }

    /// Parses CSV held in a string.
    pub fn from_csv_str(content: &str) -> Result<Option<Self>> {
        Self::from_reader(content.as_bytes())
    }

    /// Writes the table (header first) to a CSV file, replacing it.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| SyncError::io(path, e))?;
        self.to_writer(file)?;
        info!("Saved {} rows to {}", self.len(), path.display());
        Ok(())
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(writer);
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Renders the table as CSV text.
    pub fn to_csv_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.to_writer(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Vec<String> {
        &mut self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut Vec<Vec<String>> {
        &mut self.rows
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<String>>) {
        (self.headers, self.rows)
    }

    /// Number of data rows (header excluded)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first header equal to `name`, ignoring surrounding whitespace
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.headers.iter().position(|h| h.trim() == name)
    }

    /// Like [`Table::column_index`] but missing columns are an error.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| {
            debug!("Column lookup failed for '{name}' in {:?}", self.headers);
            SyncError::ColumnNotFound {
                column: name.to_string(),
                available: self.headers.clone(),
            }
        })
    }

    /// Cell at `(row, column)`, `None` if the row is too short
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}
