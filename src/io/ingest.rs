//! CSV ingest.
//!
//! This module is responsible for turning a financial-statement CSV into a
//! read-only `Dataset` that the validation engine can inspect.
//!
//! Design goals:
//! - **Schema-agnostic loading**: which columns are required is the validator's concern
//! - **Explicit missing values**: empty cells and common NA tokens become `None`
//! - **Lazy typing**: numeric parsing happens per column, on request
//! - **Separation of concerns**: no business rules here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::error::LoadError;

/// Cell spellings treated as missing values.
const NA_TOKENS: [&str; 12] = [
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A", "<NA>",
];

/// One data row with its 1-based line number in the source file.
#[derive(Debug, Clone)]
struct Row {
    line: u64,
    cells: Vec<Option<String>>,
}

/// A tabular dataset loaded from CSV.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    column_index: HashMap<String, usize>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Load a CSV file from disk.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Parse CSV from any reader. The first record is the header.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers().map_err(malformed)?.clone();
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(LoadError::Empty);
        }

        let columns: Vec<String> = headers.iter().map(normalize_header_name).collect();
        let column_index = build_column_index(&columns);

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result.map_err(malformed)?;
            // Fallback: header is line 1 and records() yields from line 2.
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(idx as u64 + 2);

            if record.len() > columns.len() {
                return Err(LoadError::TooManyFields {
                    line,
                    expected: columns.len(),
                    found: record.len(),
                });
            }

            rows.push(Row {
                line,
                cells: parse_cells(&record, columns.len()),
            });
        }

        tracing::debug!(columns = columns.len(), rows = rows.len(), "loaded dataset");

        Ok(Self {
            columns,
            column_index,
            rows,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Raw cells of each row in column order (`None` = missing).
    pub fn rows(&self) -> impl Iterator<Item = Vec<Option<&str>>> + '_ {
        self.rows
            .iter()
            .map(|row| row.cells.iter().map(Option::as_deref).collect())
    }

    /// Parse a column as numbers.
    ///
    /// Returns `None` if the column is absent. Missing cells and any spelling
    /// that parses to NaN stay `None`; infinities and anything else that is
    /// not a finite number are a `LoadError::NonNumeric`.
    pub fn numeric_column(&self, name: &str) -> Option<Result<Vec<Option<f64>>, LoadError>> {
        let idx = *self.column_index.get(name)?;
        let parsed = self
            .rows
            .iter()
            .map(|row| match row.cells[idx].as_deref() {
                None => Ok(None),
                Some(raw) => match raw.parse::<f64>() {
                    Ok(v) if v.is_nan() => Ok(None),
                    Ok(v) if v.is_finite() => Ok(Some(v)),
                    _ => Err(LoadError::NonNumeric {
                        column: name.to_string(),
                        line: row.line,
                        value: raw.to_string(),
                    }),
                },
            })
            .collect();
        Some(parsed)
    }
}

fn malformed(err: csv::Error) -> LoadError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    LoadError::Malformed {
        line,
        message: err.to_string(),
    }
}

fn build_column_index(columns: &[String]) -> HashMap<String, usize> {
    let mut index = HashMap::new();
    for (idx, name) in columns.iter().enumerate() {
        // First occurrence wins for duplicated headers.
        index.entry(name.clone()).or_insert(idx);
    }
    index
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, the first required column is
    // reported as missing.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn parse_cells(record: &StringRecord, width: usize) -> Vec<Option<String>> {
    (0..width)
        .map(|idx| record.get(idx).and_then(normalize_cell))
        .collect()
}

fn normalize_cell(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() || NA_TOKENS.contains(&value) {
        None
    } else {
        Some(value.to_string())
    }
}
