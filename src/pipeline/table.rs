use std::collections::HashSet;
use std::io::{Read, Write};

use crate::error::{LayerError, Result};

/// An in-memory table: ordered column names plus ordered rows of text cells.
///
/// Every row holds exactly one cell per column. An empty cell is the missing
/// value; numeric columns stay as the text they were read from so that values
/// round-trip unchanged through layers that do not touch them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, checking that every row matches the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(LayerError::RaggedRow {
                    row: idx,
                    found: row.len(),
                    expected: columns.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Like `column_index`, but a missing column is an error.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| LayerError::MissingColumn(name.to_string()))
    }

    /// All values of one column, in row order.
    pub fn column_values(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self.require_column(name)?;
        Ok(self.rows.iter().map(|r| r[idx].as_str()).collect())
    }

    /// Return a copy with headers replaced by `rename(old)`; values untouched.
    pub fn with_renamed_columns<F>(&self, mut rename: F) -> Result<Self>
    where
        F: FnMut(&str) -> String,
    {
        let columns: Vec<String> = self.columns.iter().map(|c| rename(c)).collect();
        let mut seen = HashSet::new();
        for c in &columns {
            if !seen.insert(c.as_str()) {
                return Err(LayerError::DuplicateColumn(c.clone()));
            }
        }
        Ok(Self {
            columns,
            rows: self.rows.clone(),
        })
    }

    /// Project onto `names`, in that order. Absent names are `MissingColumn`.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        let indices = names
            .iter()
            .map(|n| self.require_column(n.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Ok(Self {
            columns: names.iter().map(|n| n.as_ref().to_string()).collect(),
            rows,
        })
    }

    /// Replace the values of `name`, or append it as a new last column.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(LayerError::RaggedRow {
                row: values.len().min(self.rows.len()),
                found: values.len(),
                expected: self.rows.len(),
            });
        }
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// Read a header-first, comma-delimited table. Empty fields are kept as "".
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);
        let columns: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(|v| v.to_string()).collect());
        }
        Self::new(columns, rows)
    }

    /// Write header plus rows. The header is written even for an empty table.
    pub fn to_csv_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
