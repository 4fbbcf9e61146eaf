//! Untyped tabular dataset as read from a delimited file, before the
//! normalizer has fixed its column names.

use chrono::NaiveDate;
use dashboard_core::DashboardResult;
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Text(String),
    Date(NaiveDate),
}

impl Value {
    /// Blank or whitespace-only cells are nulls.
    pub fn from_cell(cell: &str) -> Self {
        if cell.trim().is_empty() {
            Value::Null
        } else {
            Value::Text(cell.to_string())
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Rendering used in error messages.
    pub fn display(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Text(s) => s.clone(),
            Value::Date(d) => d.to_string(),
        }
    }
}

/// A named dataset: header row plus rows of cells. Every row has exactly
/// one cell per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    dataset: String,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build a table, padding short rows with nulls and dropping cells past
    /// the last column.
    pub fn new(dataset: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Null);
                row
            })
            .collect();
        Self {
            dataset: dataset.into(),
            columns,
            rows,
        }
    }

    /// Read a headed CSV file. The dataset label is the file name.
    pub fn from_csv_path(path: impl AsRef<Path>) -> DashboardResult<Self> {
        let path = path.as_ref();
        let dataset = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(dataset, file)
    }

    pub fn from_csv_reader<R: Read>(dataset: impl Into<String>, reader: R) -> DashboardResult<Self> {
        let dataset = dataset.into();
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(Value::from_cell).collect());
        }

        debug!(dataset = %dataset, columns = columns.len(), rows = rows.len(), "Read CSV dataset");
        Ok(Self::new(dataset, columns, rows))
    }

    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub(crate) fn into_parts(self) -> (String, Vec<String>, Vec<Vec<Value>>) {
        (self.dataset, self.columns, self.rows)
    }
}
