//! Aggregator — rolls joined rows up to one fact row per
//! (date, channel, state, campaign).

use crate::fact::FactTable;
use crate::merger::JoinedRecord;
use dashboard_core::{FactKey, FactRow, Measures};
use std::collections::BTreeMap;
use tracing::{info, warn};

impl From<&JoinedRecord> for Measures {
    /// Null cells contribute zero.
    fn from(row: &JoinedRecord) -> Self {
        let m = &row.marketing;
        let b = &row.business;
        Measures {
            impressions: m.impressions.unwrap_or(0),
            clicks: m.clicks.unwrap_or(0),
            spend: m.spend.unwrap_or(0.0),
            attributed_revenue: m.attributed_revenue.unwrap_or(0.0),
            orders: b.orders.unwrap_or(0),
            new_orders: b.new_orders.unwrap_or(0),
            new_customers: b.new_customers.unwrap_or(0),
            total_revenue: b.total_revenue.unwrap_or(0.0),
            gross_profit: b.gross_profit.unwrap_or(0.0),
        }
    }
}

fn key_of(row: &JoinedRecord) -> Option<FactKey> {
    Some(FactKey {
        date: row.marketing.date,
        channel: row.marketing.channel,
        state: row.marketing.state.clone()?,
        campaign: row.marketing.campaign.clone()?,
    })
}

/// Group and sum. Rows with a blank state or campaign have no group and
/// are left out.
pub fn aggregate(rows: &[JoinedRecord]) -> FactTable {
    let mut groups: BTreeMap<FactKey, Measures> = BTreeMap::new();
    let mut skipped = 0usize;

    for row in rows {
        match key_of(row) {
            Some(key) => *groups.entry(key).or_default() += Measures::from(row),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(skipped, "Rows with a blank state or campaign were excluded from the fact table");
    }

    let facts: Vec<FactRow> = groups
        .into_iter()
        .map(|(key, measures)| FactRow { key, measures })
        .collect();
    info!(input_rows = rows.len(), fact_rows = facts.len(), "Built fact table");
    FactTable::new(facts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dashboard_core::{BusinessRecord, Channel, RawChannelRecord};

    fn joined(day: u32, channel: Channel, state: Option<&str>, campaign: &str, spend: f64) -> JoinedRecord {
        let date = NaiveDate::from_ymd_opt(2025, 1, day).unwrap();
        JoinedRecord {
            marketing: RawChannelRecord {
                date,
                channel,
                state: state.map(str::to_string),
                campaign: Some(campaign.to_string()),
                impressions: Some(100),
                clicks: None,
                spend: Some(spend),
                attributed_revenue: Some(2.0 * spend),
            },
            business: BusinessRecord {
                date,
                orders: Some(5),
                new_orders: None,
                new_customers: Some(1),
                total_revenue: Some(500.0),
                gross_profit: Some(200.0),
                cogs: Some(300.0),
            },
        }
    }

    #[test]
    fn test_groups_on_full_key_and_sums_measures() {
        let rows = vec![
            joined(1, Channel::Facebook, Some("CA"), "X", 10.0),
            joined(1, Channel::Facebook, Some("CA"), "X", 5.0),
            joined(1, Channel::Facebook, Some("CA"), "Y", 1.0),
            joined(1, Channel::Google, Some("CA"), "X", 1.0),
        ];
        let facts = aggregate(&rows);
        assert_eq!(facts.len(), 3);

        let first = &facts.rows()[0];
        assert_eq!(first.key.campaign, "X");
        assert_eq!(first.key.channel, Channel::Facebook);
        assert_eq!(first.measures.impressions, 200);
        assert_eq!(first.measures.clicks, 0);
        assert_eq!(first.measures.orders, 10);
        assert_eq!(first.measures.new_orders, 0);
        assert!((first.measures.spend - 15.0).abs() < f64::EPSILON);
        assert!((first.measures.total_revenue - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_grouping_is_case_sensitive() {
        let rows = vec![
            joined(1, Channel::Facebook, Some("CA"), "X", 1.0),
            joined(1, Channel::Facebook, Some("ca"), "X", 1.0),
        ];
        assert_eq!(aggregate(&rows).len(), 2);
    }

    #[test]
    fn test_blank_state_rows_are_skipped() {
        let rows = vec![
            joined(1, Channel::Facebook, None, "X", 1.0),
            joined(2, Channel::Facebook, Some("NY"), "X", 1.0),
        ];
        let facts = aggregate(&rows);
        assert_eq!(facts.len(), 1);
        assert_eq!(facts.rows()[0].key.state, "NY");
    }

    #[test]
    fn test_aggregation_is_additive_over_partitions() {
        let rows = vec![
            joined(1, Channel::Facebook, Some("CA"), "X", 10.0),
            joined(1, Channel::Facebook, Some("CA"), "X", 5.0),
            joined(2, Channel::TikTok, Some("TX"), "Z", 7.0),
            joined(2, Channel::Google, Some("CA"), "X", 3.0),
        ];
        let (left, right) = rows.split_at(2);
        let whole = aggregate(&rows);
        let a = aggregate(left);
        let b = aggregate(right);

        for row in whole.iter() {
            let part_sum: Measures = a
                .iter()
                .chain(b.iter())
                .filter(|r| r.key == row.key)
                .map(|r| &r.measures)
                .sum();
            assert_eq!(part_sum, row.measures);
        }
        assert_eq!(whole.totals(), {
            let mut t = a.totals();
            t += b.totals();
            t
        });
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(&[]).is_empty());
    }
}
