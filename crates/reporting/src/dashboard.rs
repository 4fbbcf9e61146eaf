//! Dashboard views — everything the presentation layer needs for one
//! filter selection.

use crate::fact::FactTable;
use crate::filter;
use crate::funnel::{FunnelAnalyzer, FunnelResult};
use crate::kpi::{KpiCard, KpiSnapshot};
use crate::summary::{campaign_summary, state_summary, CampaignSummaryRow, StateSummaryRow};
use chrono::NaiveDate;
use dashboard_core::{ChannelSelector, DateRange, FilterSpec, Page};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformancePoint {
    pub date: NaiveDate,
    pub spend: f64,
    pub total_revenue: f64,
}

/// Daily spend and total revenue, one point per date in the view.
pub fn performance_series(view: &FactTable) -> Vec<PerformancePoint> {
    let mut by_date: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for row in view.iter() {
        let entry = by_date.entry(row.date()).or_default();
        entry.0 += row.measures.spend;
        entry.1 += row.measures.total_revenue;
    }
    by_date
        .into_iter()
        .map(|(date, (spend, total_revenue))| PerformancePoint {
            date,
            spend,
            total_revenue,
        })
        .collect()
}

/// Output of one recomputation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub filter: FilterSpec,
    pub row_count: usize,
    pub kpis: KpiSnapshot,
    pub performance: Vec<PerformancePoint>,
    pub funnel: FunnelResult,
    pub campaigns: Vec<CampaignSummaryRow>,
    pub states: Vec<StateSummaryRow>,
}

impl ViewState {
    pub fn compute(facts: &FactTable, filter: &FilterSpec) -> Self {
        let view = filter::apply(facts, filter);
        Self {
            filter: *filter,
            row_count: view.len(),
            kpis: KpiSnapshot::compute(&view),
            performance: performance_series(&view),
            funnel: FunnelAnalyzer::analyze(&view),
            campaigns: campaign_summary(&view),
            states: state_summary(&view),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// The slice of this state a single page renders.
    pub fn page(&self, page: Page) -> PageView {
        match page {
            Page::Overview => PageView::Overview {
                kpis: self.kpis,
                cards: self.kpis.cards(),
            },
            Page::Performance => PageView::Performance {
                points: self.performance.clone(),
            },
            Page::Funnel => PageView::Funnel {
                funnel: self.funnel.clone(),
            },
            Page::Campaigns => PageView::Campaigns {
                rows: self.campaigns.clone(),
            },
            Page::States => PageView::States {
                rows: self.states.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum PageView {
    Overview {
        kpis: KpiSnapshot,
        cards: Vec<KpiCard>,
    },
    Performance {
        points: Vec<PerformancePoint>,
    },
    Funnel {
        funnel: FunnelResult,
    },
    Campaigns {
        rows: Vec<CampaignSummaryRow>,
    },
    States {
        rows: Vec<StateSummaryRow>,
    },
}

/// Selector options derived from the fact table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardControls {
    pub pages: Vec<Page>,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    /// "All" first, then channels in order of first appearance.
    pub channel_options: Vec<ChannelSelector>,
}

impl DashboardControls {
    pub fn from_facts(facts: &FactTable) -> Self {
        let bounds = facts.date_bounds();
        let channel_options = std::iter::once(ChannelSelector::All)
            .chain(facts.channels().into_iter().map(ChannelSelector::Only))
            .collect();
        Self {
            pages: Page::ALL.to_vec(),
            min_date: bounds.map(|(min, _)| min),
            max_date: bounds.map(|(_, max)| max),
            channel_options,
        }
    }

    /// Whole date span, all channels. `None` when there are no facts.
    pub fn default_filter(&self) -> Option<FilterSpec> {
        Some(FilterSpec::new(
            DateRange::new(self.min_date?, self.max_date?),
            ChannelSelector::All,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::{Channel, FactKey, FactRow, Measures};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn row(day: u32, channel: Channel, state: &str, spend: f64) -> FactRow {
        FactRow {
            key: FactKey {
                date: d(day),
                channel,
                state: state.into(),
                campaign: "X".into(),
            },
            measures: Measures {
                impressions: 100,
                clicks: 10,
                spend,
                attributed_revenue: spend,
                orders: 1,
                total_revenue: 100.0,
                gross_profit: 10.0,
                ..Measures::default()
            },
        }
    }

    fn facts() -> FactTable {
        FactTable::new(vec![
            row(2, Channel::Google, "CA", 10.0),
            row(1, Channel::TikTok, "CA", 5.0),
            row(1, Channel::Google, "NY", 1.0),
        ])
    }

    #[test]
    fn test_performance_series_sums_per_date() {
        let points = performance_series(&facts());
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, d(1));
        assert!((points[0].spend - 6.0).abs() < f64::EPSILON);
        assert!((points[0].total_revenue - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_controls_from_facts() {
        let controls = DashboardControls::from_facts(&facts());
        assert_eq!(controls.pages.len(), 5);
        assert_eq!(controls.min_date, Some(d(1)));
        assert_eq!(controls.max_date, Some(d(2)));
        assert_eq!(
            controls.channel_options,
            vec![
                ChannelSelector::All,
                ChannelSelector::Only(Channel::Google),
                ChannelSelector::Only(Channel::TikTok),
            ]
        );
        let filter = controls.default_filter().unwrap();
        assert_eq!(filter.range, DateRange::new(d(1), d(2)));
        assert_eq!(filter.channel, ChannelSelector::All);
    }

    #[test]
    fn test_controls_for_empty_facts() {
        let controls = DashboardControls::from_facts(&FactTable::default());
        assert_eq!(controls.channel_options, vec![ChannelSelector::All]);
        assert_eq!(controls.default_filter(), None);
    }

    #[test]
    fn test_view_state_pages() {
        let filter = FilterSpec::new(DateRange::new(d(1), d(1)), ChannelSelector::Only(Channel::Google));
        let state = ViewState::compute(&facts(), &filter);
        assert_eq!(state.row_count, 1);
        assert_eq!(state.states.len(), 1);
        assert_eq!(state.states[0].state, "NY");

        match state.page(Page::Overview) {
            PageView::Overview { cards, .. } => assert_eq!(cards.len(), 8),
            other => panic!("unexpected view {other:?}"),
        }
        match state.page(Page::Funnel) {
            PageView::Funnel { funnel } => assert_eq!(funnel.steps.len(), 4),
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn test_empty_view_state_is_renderable() {
        let filter = FilterSpec::new(DateRange::new(d(9), d(10)), ChannelSelector::All);
        let state = ViewState::compute(&facts(), &filter);
        assert!(state.is_empty());
        assert!(state.performance.is_empty());
        assert!(state.campaigns.is_empty());
        assert_eq!(state.kpis.roas, None);
        let json = serde_json::to_value(state.page(Page::Overview)).unwrap();
        assert_eq!(json["page"], "overview");
        assert_eq!(json["kpis"]["ctr"], serde_json::Value::Null);
    }
}
