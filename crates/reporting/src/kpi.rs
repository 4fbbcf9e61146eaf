//! KPI calculator — totals and ratios over the current view.
//!
//! Every ratio goes through [`safe_divide`]: a zero denominator yields
//! `None`, which renders as "N/A". An empty view therefore gives zero
//! totals and all-`None` ratios.

use crate::fact::FactTable;
use serde::Serialize;

/// `num / den`, or `None` when `den` is zero.
pub fn safe_divide(num: f64, den: f64) -> Option<f64> {
    if den == 0.0 {
        None
    } else {
        Some(num / den)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiSnapshot {
    pub total_spend: f64,
    pub total_revenue: f64,
    pub orders: i64,
    /// clicks / impressions
    pub ctr: Option<f64>,
    /// attributed revenue / spend
    pub roas: Option<f64>,
    /// spend / clicks
    pub avg_cpc: Option<f64>,
    /// total revenue / orders
    pub avg_order_value: Option<f64>,
    /// gross profit / total revenue
    pub profit_margin: Option<f64>,
}

impl KpiSnapshot {
    pub fn compute(view: &FactTable) -> Self {
        let t = view.totals();
        Self {
            total_spend: t.spend,
            total_revenue: t.total_revenue,
            orders: t.orders,
            ctr: safe_divide(t.clicks as f64, t.impressions as f64),
            roas: safe_divide(t.attributed_revenue, t.spend),
            avg_cpc: safe_divide(t.spend, t.clicks as f64),
            avg_order_value: safe_divide(t.total_revenue, t.orders as f64),
            profit_margin: safe_divide(t.gross_profit, t.total_revenue),
        }
    }

    /// The eight overview cards, in display order.
    pub fn cards(&self) -> Vec<KpiCard> {
        vec![
            KpiCard::new("Total Spend", format_currency(self.total_spend, 0)),
            KpiCard::new("Total Revenue", format_currency(self.total_revenue, 0)),
            KpiCard::new("Orders", group_thousands(&self.orders.to_string())),
            KpiCard::new("CTR", format_percent(self.ctr)),
            KpiCard::new("ROAS", format_ratio(self.roas)),
            KpiCard::new("Avg CPC", format_optional_currency(self.avg_cpc)),
            KpiCard::new("Avg Order Value", format_optional_currency(self.avg_order_value)),
            KpiCard::new("Profit Margin", format_percent(self.profit_margin)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiCard {
    pub title: String,
    pub value: String,
}

impl KpiCard {
    fn new(title: &str, value: String) -> Self {
        Self {
            title: title.to_string(),
            value,
        }
    }
}

pub const NOT_AVAILABLE: &str = "N/A";

/// Insert `,` every three digits of an unsigned integer string.
fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    format!("{sign}{out}")
}

/// `$1,234` / `$1,234.50` / `-$12.00`.
pub fn format_currency(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };
    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{sign}${}.{frac}", group_thousands(int_part)),
        None => format!("{sign}${}", group_thousands(int_part)),
    }
}

fn format_optional_currency(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format_currency(v, 2))
}

/// Ratio as a percentage with two decimals: `0.1` → `10.00%`.
pub fn format_percent(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{:.2}%", v * 100.0))
}

pub fn format_ratio(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.2}"))
}
