use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;

/// Marketing platform a spend row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Channel {
    Facebook,
    Google,
    TikTok,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Facebook, Channel::Google, Channel::TikTok];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Facebook => "Facebook",
            Channel::Google => "Google",
            Channel::TikTok => "TikTok",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "facebook" => Ok(Channel::Facebook),
            "google" => Ok(Channel::Google),
            "tiktok" => Ok(Channel::TikTok),
            other => Err(format!("unknown channel '{other}'")),
        }
    }
}

/// One row of a per-channel marketing file after normalization.
///
/// Measures stay optional here: a blank cell is a null, and nulls only
/// become zero when the aggregator sums a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawChannelRecord {
    pub date: NaiveDate,
    pub channel: Channel,
    pub state: Option<String>,
    pub campaign: Option<String>,
    pub impressions: Option<i64>,
    pub clicks: Option<i64>,
    pub spend: Option<f64>,
    pub attributed_revenue: Option<f64>,
}

/// One row of the business outcomes file. There is no channel or
/// geography on this side, so it joins to marketing rows by date only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub date: NaiveDate,
    pub orders: Option<i64>,
    pub new_orders: Option<i64>,
    pub new_customers: Option<i64>,
    pub total_revenue: Option<f64>,
    pub gross_profit: Option<f64>,
    pub cogs: Option<f64>,
}

/// Grain of the fact table. Field order is the sort order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FactKey {
    pub date: NaiveDate,
    pub channel: Channel,
    pub state: String,
    pub campaign: String,
}

/// The nine additive measures carried by every fact row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Measures {
    pub impressions: i64,
    pub clicks: i64,
    pub spend: f64,
    pub attributed_revenue: f64,
    pub orders: i64,
    pub new_orders: i64,
    pub new_customers: i64,
    pub total_revenue: f64,
    pub gross_profit: f64,
}

impl AddAssign for Measures {
    fn add_assign(&mut self, rhs: Self) {
        self.impressions += rhs.impressions;
        self.clicks += rhs.clicks;
        self.spend += rhs.spend;
        self.attributed_revenue += rhs.attributed_revenue;
        self.orders += rhs.orders;
        self.new_orders += rhs.new_orders;
        self.new_customers += rhs.new_customers;
        self.total_revenue += rhs.total_revenue;
        self.gross_profit += rhs.gross_profit;
    }
}

impl<'a> std::iter::Sum<&'a Measures> for Measures {
    fn sum<I: Iterator<Item = &'a Measures>>(iter: I) -> Self {
        iter.fold(Measures::default(), |mut acc, m| {
            acc += *m;
            acc
        })
    }
}

/// Aggregated row keyed by (date, channel, state, campaign).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactRow {
    #[serde(flatten)]
    pub key: FactKey,
    #[serde(flatten)]
    pub measures: Measures,
}

impl FactRow {
    pub fn date(&self) -> NaiveDate {
        self.key.date
    }

    pub fn channel(&self) -> Channel {
        self.key.channel
    }
}

// ─── Controls ───────────────────────────────────────────────────────────────

/// The five dashboard views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Overview,
    Performance,
    Funnel,
    Campaigns,
    States,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Overview,
        Page::Performance,
        Page::Funnel,
        Page::Campaigns,
        Page::States,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Overview => "Dashboard Overview",
            Page::Performance => "Performance Trends",
            Page::Funnel => "Marketing Funnel",
            Page::Campaigns => "Campaign Analysis",
            Page::States => "State Insights",
        }
    }
}

impl FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overview" | "dashboard" => Ok(Page::Overview),
            "performance" => Ok(Page::Performance),
            "funnel" => Ok(Page::Funnel),
            "campaigns" => Ok(Page::Campaigns),
            "states" => Ok(Page::States),
            other => Err(format!("unknown page '{other}'")),
        }
    }
}

/// Channel dropdown value: either every channel or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelSelector {
    All,
    Only(Channel),
}

impl ChannelSelector {
    pub fn matches(&self, channel: Channel) -> bool {
        match self {
            ChannelSelector::All => true,
            ChannelSelector::Only(selected) => *selected == channel,
        }
    }
}

impl fmt::Display for ChannelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelSelector::All => f.pad("All"),
            ChannelSelector::Only(channel) => channel.fmt(f),
        }
    }
}

impl FromStr for ChannelSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(ChannelSelector::All)
        } else {
            s.parse().map(ChannelSelector::Only)
        }
    }
}

/// Inclusive date range. A range with `start > end` contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub range: DateRange,
    pub channel: ChannelSelector,
}

impl FilterSpec {
    pub fn new(range: DateRange, channel: ChannelSelector) -> Self {
        Self { range, channel }
    }

    pub fn matches(&self, row: &FactRow) -> bool {
        self.range.contains(row.date()) && self.channel.matches(row.channel())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_channel_parse_is_case_insensitive() {
        assert_eq!("tiktok".parse::<Channel>().unwrap(), Channel::TikTok);
        assert_eq!(" Facebook ".parse::<Channel>().unwrap(), Channel::Facebook);
        assert!("bing".parse::<Channel>().is_err());
    }

    #[test]
    fn test_page_accepts_dashboard_alias() {
        assert_eq!("Dashboard".parse::<Page>().unwrap(), Page::Overview);
        assert_eq!("states".parse::<Page>().unwrap(), Page::States);
        assert_eq!(Page::Funnel.title(), "Marketing Funnel");
    }

    #[test]
    fn test_channel_selector_round_trip_and_matching() {
        let all: ChannelSelector = "ALL".parse().unwrap();
        assert_eq!(all, ChannelSelector::All);
        assert!(all.matches(Channel::Google));

        let google: ChannelSelector = "Google".parse().unwrap();
        assert_eq!(google.to_string(), "Google");
        assert!(google.matches(Channel::Google));
        assert!(!google.matches(Channel::TikTok));
    }

    #[test]
    fn test_date_range_is_inclusive_and_inverted_is_empty() {
        let range = DateRange::new(d(2025, 1, 1), d(2025, 1, 3));
        assert!(range.contains(d(2025, 1, 1)));
        assert!(range.contains(d(2025, 1, 3)));
        assert!(!range.contains(d(2025, 1, 4)));

        let inverted = DateRange::new(d(2025, 1, 3), d(2025, 1, 1));
        assert!(!inverted.contains(d(2025, 1, 2)));
        assert!(!inverted.contains(d(2025, 1, 1)));
    }

    #[test]
    fn test_measures_add_assign_sums_every_field() {
        let mut a = Measures {
            impressions: 100,
            clicks: 10,
            spend: 50.0,
            attributed_revenue: 80.0,
            orders: 5,
            new_orders: 2,
            new_customers: 1,
            total_revenue: 500.0,
            gross_profit: 200.0,
        };
        let b = a;
        a += b;
        assert_eq!(a.impressions, 200);
        assert_eq!(a.new_customers, 2);
        assert!((a.gross_profit - 400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fact_key_orders_by_date_then_channel() {
        let k1 = FactKey {
            date: d(2025, 1, 1),
            channel: Channel::TikTok,
            state: "CA".into(),
            campaign: "A".into(),
        };
        let k2 = FactKey {
            date: d(2025, 1, 2),
            channel: Channel::Facebook,
            state: "AL".into(),
            campaign: "A".into(),
        };
        let k3 = FactKey {
            channel: Channel::Google,
            ..k1.clone()
        };
        assert!(k1 < k2);
        assert!(k3 < k1);
    }
}
