//! Typed extraction: turns a normalized [`Table`] into the record structs
//! the merger works with. Missing required columns surface here.

use crate::table::{Table, Value};
use chrono::NaiveDate;
use dashboard_core::{
    BusinessRecord, CanonicalColumn, Channel, DashboardError, DashboardResult, RawChannelRecord,
    SourceKind,
};
use std::collections::HashMap;

static NULL: Value = Value::Null;

/// Column positions for the canonical columns of one source kind.
struct ColumnMap<'t> {
    table: &'t Table,
    idx: HashMap<CanonicalColumn, usize>,
}

impl<'t> ColumnMap<'t> {
    fn for_kind(table: &'t Table, kind: SourceKind) -> DashboardResult<Self> {
        let mut idx = HashMap::new();
        for column in kind.required_columns() {
            let i = table
                .column_index(column.as_str())
                .ok_or_else(|| DashboardError::missing_column(table.dataset(), column.as_str()))?;
            idx.insert(*column, i);
        }
        if kind == SourceKind::Business {
            if let Some(i) = table.column_index(CanonicalColumn::Cogs.as_str()) {
                idx.insert(CanonicalColumn::Cogs, i);
            }
        }
        Ok(Self { table, idx })
    }

    fn cell<'r>(&self, row: &'r [Value], column: CanonicalColumn) -> &'r Value {
        self.idx
            .get(&column)
            .map(|&i| &row[i])
            .unwrap_or(&NULL)
    }

    fn error(&self, row: usize, column: CanonicalColumn, value: &Value) -> DashboardError {
        DashboardError::parse(self.table.dataset(), row, column.as_str(), value.display())
    }

    fn date(&self, row: usize, cells: &[Value]) -> DashboardResult<NaiveDate> {
        match self.cell(cells, CanonicalColumn::Date) {
            Value::Date(d) => Ok(*d),
            other => Err(self.error(row, CanonicalColumn::Date, other)),
        }
    }

    fn text(&self, cells: &[Value], column: CanonicalColumn) -> Option<String> {
        self.cell(cells, column).as_text().map(str::to_string)
    }

    fn count(&self, row: usize, cells: &[Value], column: CanonicalColumn) -> DashboardResult<Option<i64>> {
        let value = self.cell(cells, column);
        match value {
            Value::Null => Ok(None),
            Value::Text(s) => parse_count(s)
                .map(Some)
                .ok_or_else(|| self.error(row, column, value)),
            Value::Date(_) => Err(self.error(row, column, value)),
        }
    }

    fn amount(&self, row: usize, cells: &[Value], column: CanonicalColumn) -> DashboardResult<Option<f64>> {
        let value = self.cell(cells, column);
        match value {
            Value::Null => Ok(None),
            Value::Text(s) => parse_amount(s)
                .map(Some)
                .ok_or_else(|| self.error(row, column, value)),
            Value::Date(_) => Err(self.error(row, column, value)),
        }
    }
}

/// Strip a leading currency sign and thousands separators.
fn clean_number(raw: &str) -> String {
    let raw = raw.trim();
    let (sign, rest) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw),
    };
    let rest = rest.strip_prefix('$').unwrap_or(rest);
    format!("{sign}{}", rest.replace(',', ""))
}

/// Integer counts. Float text with no fractional part (`100.0`) is accepted.
pub fn parse_count(raw: &str) -> Option<i64> {
    let cleaned = clean_number(raw);
    cleaned.parse::<i64>().ok().or_else(|| {
        cleaned
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && v.fract() == 0.0)
            .map(|v| v as i64)
    })
}

pub fn parse_amount(raw: &str) -> Option<f64> {
    clean_number(raw)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Extract marketing records from a normalized marketing table.
pub fn channel_records(table: &Table) -> DashboardResult<Vec<RawChannelRecord>> {
    let map = ColumnMap::for_kind(table, SourceKind::Marketing)?;
    let mut records = Vec::with_capacity(table.len());

    for (i, cells) in table.rows().iter().enumerate() {
        let row = i + 1;
        let channel_cell = map.cell(cells, CanonicalColumn::Channel);
        let channel = channel_cell
            .as_text()
            .and_then(|s| s.parse::<Channel>().ok())
            .ok_or_else(|| map.error(row, CanonicalColumn::Channel, channel_cell))?;

        records.push(RawChannelRecord {
            date: map.date(row, cells)?,
            channel,
            state: map.text(cells, CanonicalColumn::State),
            campaign: map.text(cells, CanonicalColumn::Campaign),
            impressions: map.count(row, cells, CanonicalColumn::Impressions)?,
            clicks: map.count(row, cells, CanonicalColumn::Clicks)?,
            spend: map.amount(row, cells, CanonicalColumn::Spend)?,
            attributed_revenue: map.amount(row, cells, CanonicalColumn::AttributedRevenue)?,
        });
    }

    Ok(records)
}

/// Extract business records from a normalized business table.
pub fn business_records(table: &Table) -> DashboardResult<Vec<BusinessRecord>> {
    let map = ColumnMap::for_kind(table, SourceKind::Business)?;
    let mut records = Vec::with_capacity(table.len());

    for (i, cells) in table.rows().iter().enumerate() {
        let row = i + 1;
        records.push(BusinessRecord {
            date: map.date(row, cells)?,
            orders: map.count(row, cells, CanonicalColumn::Orders)?,
            new_orders: map.count(row, cells, CanonicalColumn::NewOrders)?,
            new_customers: map.count(row, cells, CanonicalColumn::NewCustomers)?,
            total_revenue: map.amount(row, cells, CanonicalColumn::TotalRevenue)?,
            gross_profit: map.amount(row, cells, CanonicalColumn::GrossProfit)?,
            cogs: map.amount(row, cells, CanonicalColumn::Cogs)?,
        });
    }

    Ok(records)
}
