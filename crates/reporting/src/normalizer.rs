//! Schema normalizer — structural cleanup of a raw dataset. No rows are
//! filtered here.

use crate::table::{Table, Value};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use dashboard_core::{CanonicalColumn, Channel, DashboardError, DashboardResult, SourceKind};
use std::collections::HashSet;
use tracing::debug;

/// Timestamp layouts accepted in addition to the configured date formats.
/// The time part is discarded.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"];

pub struct Normalizer {
    kind: SourceKind,
    date_formats: Vec<String>,
}

impl Normalizer {
    pub fn new(kind: SourceKind, date_formats: &[String]) -> Self {
        Self {
            kind,
            date_formats: date_formats.to_vec(),
        }
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// 1. trim and lowercase column names
    /// 2. parse the `date` column, if present
    /// 3. stamp `channel` on every row when a label is given
    /// 4. rename synonyms to canonical names
    pub fn normalize(&self, table: Table, channel: Option<Channel>) -> DashboardResult<Table> {
        let (dataset, columns, mut rows) = table.into_parts();

        let mut columns: Vec<String> = columns
            .iter()
            .map(|c| c.trim().to_lowercase())
            .collect();

        let date_column = CanonicalColumn::Date.as_str();
        if let Some(idx) = columns.iter().position(|c| c == date_column) {
            for (i, row) in rows.iter_mut().enumerate() {
                let parsed = match &row[idx] {
                    Value::Date(d) => *d,
                    Value::Text(s) => parse_date(s, &self.date_formats)
                        .ok_or_else(|| DashboardError::parse(&dataset, i + 1, date_column, s.as_str()))?,
                    Value::Null => return Err(DashboardError::parse(&dataset, i + 1, date_column, "")),
                };
                row[idx] = Value::Date(parsed);
            }
        }

        if let Some(channel) = channel {
            let label = Value::Text(channel.as_str().to_string());
            let channel_column = CanonicalColumn::Channel.as_str();
            match columns.iter().position(|c| c == channel_column) {
                Some(idx) => rows.iter_mut().for_each(|row| row[idx] = label.clone()),
                None => {
                    columns.push(channel_column.to_string());
                    rows.iter_mut().for_each(|row| row.push(label.clone()));
                }
            }
        }

        let columns: Vec<String> = columns
            .iter()
            .map(|c| self.kind.canonical_name(c).to_string())
            .collect();

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(DashboardError::duplicate_column(&dataset, column));
            }
        }

        debug!(dataset = %dataset, kind = ?self.kind, rows = rows.len(), "Normalized dataset");
        Ok(Table::new(dataset, columns, rows))
    }
}

/// Parse a date cell using the configured formats, then common timestamp
/// layouts truncated to their date.
pub fn parse_date(value: &str, formats: &[String]) -> Option<NaiveDate> {
    let value = value.trim();
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
}
