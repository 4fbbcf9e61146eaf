//! State and campaign roll-ups of the current view.

use crate::fact::FactTable;
use dashboard_core::Channel;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSummaryRow {
    pub state: String,
    pub impressions: i64,
    pub attributed_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignSummaryRow {
    pub campaign: String,
    pub channel: Channel,
    pub state: String,
    pub spend: f64,
    pub attributed_revenue: f64,
}

/// Impressions and attributed revenue per state, sorted by state.
pub fn state_summary(view: &FactTable) -> Vec<StateSummaryRow> {
    let mut groups: BTreeMap<&str, (i64, f64)> = BTreeMap::new();
    for row in view.iter() {
        let entry = groups.entry(row.key.state.as_str()).or_default();
        entry.0 += row.measures.impressions;
        entry.1 += row.measures.attributed_revenue;
    }
    groups
        .into_iter()
        .map(|(state, (impressions, attributed_revenue))| StateSummaryRow {
            state: state.to_string(),
            impressions,
            attributed_revenue,
        })
        .collect()
}

/// Spend and attributed revenue per (campaign, channel, state).
pub fn campaign_summary(view: &FactTable) -> Vec<CampaignSummaryRow> {
    let mut groups: BTreeMap<(&str, Channel, &str), (f64, f64)> = BTreeMap::new();
    for row in view.iter() {
        let key = (row.key.campaign.as_str(), row.key.channel, row.key.state.as_str());
        let entry = groups.entry(key).or_default();
        entry.0 += row.measures.spend;
        entry.1 += row.measures.attributed_revenue;
    }
    groups
        .into_iter()
        .map(|((campaign, channel, state), (spend, attributed_revenue))| CampaignSummaryRow {
            campaign: campaign.to_string(),
            channel,
            state: state.to_string(),
            spend,
            attributed_revenue,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dashboard_core::{FactKey, FactRow, Measures};

    fn row(day: u32, channel: Channel, state: &str, campaign: &str, impressions: i64, spend: f64) -> FactRow {
        FactRow {
            key: FactKey {
                date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
                channel,
                state: state.into(),
                campaign: campaign.into(),
            },
            measures: Measures {
                impressions,
                spend,
                attributed_revenue: spend * 2.0,
                ..Measures::default()
            },
        }
    }

    fn view() -> FactTable {
        FactTable::new(vec![
            row(1, Channel::Facebook, "NY", "Spring", 100, 10.0),
            row(2, Channel::Facebook, "NY", "Spring", 50, 5.0),
            row(1, Channel::Google, "CA", "Spring", 10, 1.0),
            row(1, Channel::Google, "NY", "Brand", 1, 0.5),
        ])
    }

    #[test]
    fn test_state_summary() {
        let rows = state_summary(&view());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].state, "CA");
        assert_eq!(rows[0].impressions, 10);
        assert_eq!(rows[1].state, "NY");
        assert_eq!(rows[1].impressions, 151);
        assert!((rows[1].attributed_revenue - 31.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_campaign_summary_keys() {
        let rows = campaign_summary(&view());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].campaign, "Brand");
        assert_eq!(rows[1].campaign, "Spring");
        assert_eq!(rows[1].channel, Channel::Facebook);
        assert!((rows[1].spend - 15.0).abs() < f64::EPSILON);
        assert_eq!(rows[2].channel, Channel::Google);
        assert_eq!(rows[2].state, "CA");
    }

    #[test]
    fn test_empty_view_gives_empty_summaries() {
        let empty = FactTable::default();
        assert!(state_summary(&empty).is_empty());
        assert!(campaign_summary(&empty).is_empty());
    }
}
