//! Dataset merger — stacks the per-channel marketing tables and inner-joins
//! them to business outcomes on date.
//!
//! Marketing rows on a date with no business row are dropped. Business
//! measures repeat on every marketing row that shares their date.

use crate::records::{business_records, channel_records};
use crate::table::Table;
use chrono::NaiveDate;
use dashboard_core::{
    BusinessRecord, CanonicalColumn, DashboardError, DashboardResult, RawChannelRecord,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};

/// One marketing row paired with one business row of the same date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedRecord {
    pub marketing: RawChannelRecord,
    pub business: BusinessRecord,
}

#[derive(Debug, Clone, Default)]
pub struct MergeOutput {
    pub rows: Vec<JoinedRecord>,
    pub marketing_rows: usize,
    pub business_rows: usize,
    /// Marketing rows whose date had no business match.
    pub unmatched_marketing_rows: usize,
}

fn require_date(table: &Table) -> DashboardResult<()> {
    let date = CanonicalColumn::Date.as_str();
    match table.column_index(date) {
        Some(_) => Ok(()),
        None => Err(DashboardError::missing_column(table.dataset(), date)),
    }
}

/// Row-wise concatenation, preserving source order then row order.
pub fn concat_marketing(tables: &[Table]) -> DashboardResult<Vec<RawChannelRecord>> {
    let mut out = Vec::new();
    for table in tables {
        require_date(table)?;
        out.extend(channel_records(table)?);
    }
    Ok(out)
}

/// Inner join on date. Output follows marketing order; a marketing row
/// matching several business rows is emitted once per match, in business
/// file order.
pub fn inner_join(
    marketing: Vec<RawChannelRecord>,
    business: &[BusinessRecord],
) -> (Vec<JoinedRecord>, usize) {
    let mut by_date: HashMap<NaiveDate, Vec<&BusinessRecord>> = HashMap::new();
    for record in business {
        by_date.entry(record.date).or_default().push(record);
    }

    let mut joined = Vec::with_capacity(marketing.len());
    let mut unmatched = 0usize;
    for m in marketing {
        match by_date.get(&m.date) {
            Some(matches) => {
                for b in matches {
                    joined.push(JoinedRecord {
                        marketing: m.clone(),
                        business: (*b).clone(),
                    });
                }
            }
            None => unmatched += 1,
        }
    }
    (joined, unmatched)
}

/// Concatenate the normalized marketing tables and join them to the
/// normalized business table.
pub fn merge(marketing: &[Table], business: &Table) -> DashboardResult<MergeOutput> {
    require_date(business)?;
    let marketing_records = concat_marketing(marketing)?;
    let business_records = business_records(business)?;

    let marketing_rows = marketing_records.len();
    let business_rows = business_records.len();
    let (rows, unmatched) = inner_join(marketing_records, &business_records);

    if unmatched > 0 {
        warn!(
            dropped = unmatched,
            "Marketing rows without a business date were dropped by the join"
        );
    }
    info!(
        marketing_rows,
        business_rows,
        joined_rows = rows.len(),
        "Merged marketing and business datasets"
    );

    Ok(MergeOutput {
        rows,
        marketing_rows,
        business_rows,
        unmatched_marketing_rows: unmatched,
    })
}
