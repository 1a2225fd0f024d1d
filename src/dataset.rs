//! In-memory experiment table
//!
//! The dataset is read once at startup and never mutated afterwards. Cells
//! keep their original text so the download reproduces what was loaded;
//! numeric cells also carry the parsed value used for plotting.

use crate::error::{DashError, Result};
use crate::schema;
use chrono::{DateTime, Local};
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

/// One table cell
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    pub number: Option<f64>,
}

impl Cell {
    fn parse(text: &str) -> Self {
        let number = text.trim().parse::<f64>().ok().filter(|v| v.is_finite());
        Self { text: text.to_string(), number }
    }

    /// Number when the cell is numeric, its text otherwise
    pub fn to_json(&self) -> serde_json::Value {
        match self.number {
            Some(n) => serde_json::json!(n),
            None => serde_json::Value::String(self.text.clone()),
        }
    }
}

/// Immutable rows x named columns, in file order
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
    loaded_at: DateTime<Local>,
}

impl Dataset {
    /// Load the experiment table from a CSV file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DashError::FileNotFound(path.to_path_buf()),
            _ => DashError::Io(e),
        })?;
        let dataset = Self::from_reader(BufReader::new(file))?;
        log::info!(
            "Loaded {} rows x {} columns from {}",
            dataset.len(),
            dataset.columns.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Parse the experiment table from any CSV source
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();

        for required in schema::required_columns() {
            if !columns.iter().any(|c| c == required) {
                return Err(DashError::Parse {
                    line: 1,
                    reason: format!("missing column {:?}", required),
                });
            }
        }

        // Positions of the columns that must hold numbers
        let numeric: Vec<usize> = columns
            .iter()
            .enumerate()
            .filter(|(_, name)| schema::required_columns().any(|r| r == name.as_str()))
            .map(|(i, _)| i)
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record.map_err(row_error)?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let row: Vec<Cell> = record.iter().map(Cell::parse).collect();

            for &i in &numeric {
                let cell = &row[i];
                if cell.number.is_none() && !cell.text.trim().is_empty() {
                    return Err(DashError::Parse {
                        line,
                        reason: format!("{:?} is not a number in column {:?}", cell.text, columns[i]),
                    });
                }
            }
            rows.push(row);
        }

        Ok(Self { columns, rows, loaded_at: Local::now() })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn loaded_at(&self) -> DateTime<Local> {
        self.loaded_at
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one column; empty or non-numeric cells are `None`
    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| DashError::UnknownColumn(name.to_string()))?;
        Ok(self.rows.iter().map(|row| row[idx].number).collect())
    }

    /// Write the table back out as CSV: header row, no index column
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.columns)?;
        for row in &self.rows {
            csv_writer.write_record(row.iter().map(|c| c.text.as_str()))?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

fn row_error(err: csv::Error) -> DashError {
    if let csv::ErrorKind::UnequalLengths { pos, expected_len, len } = err.kind() {
        return DashError::Parse {
            line: pos.as_ref().map(|p| p.line()).unwrap_or(0),
            reason: format!("expected {} fields, found {}", expected_len, len),
        };
    }
    DashError::Csv(err)
}
