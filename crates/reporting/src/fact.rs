use chrono::NaiveDate;
use dashboard_core::{Channel, FactRow, Measures};
use serde::Serialize;

/// The session's fact table, or any filtered subset of it. Rows are kept
/// sorted by key and are never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FactTable {
    rows: Vec<FactRow>,
}

impl FactTable {
    pub fn new(mut rows: Vec<FactRow>) -> Self {
        rows.sort_by(|a, b| a.key.cmp(&b.key));
        Self { rows }
    }

    pub fn rows(&self) -> &[FactRow] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &FactRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Σ of every measure; all zero for an empty table.
    pub fn totals(&self) -> Measures {
        self.rows.iter().map(|r| &r.measures).sum()
    }

    /// Earliest and latest date, or `None` for an empty table.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.rows.first()?.date();
        let last = self.rows.last()?.date();
        Some((first, last))
    }

    /// Distinct channels in order of first appearance.
    pub fn channels(&self) -> Vec<Channel> {
        let mut seen = Vec::new();
        for row in &self.rows {
            if !seen.contains(&row.channel()) {
                seen.push(row.channel());
            }
        }
        seen
    }
}
