//! Canonical column names and the synonym tables that map source headers
//! onto them.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalColumn {
    Date,
    Channel,
    State,
    Campaign,
    Impressions,
    Clicks,
    Spend,
    AttributedRevenue,
    Orders,
    NewOrders,
    NewCustomers,
    TotalRevenue,
    GrossProfit,
    Cogs,
}

impl CanonicalColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalColumn::Date => "date",
            CanonicalColumn::Channel => "channel",
            CanonicalColumn::State => "state",
            CanonicalColumn::Campaign => "campaign",
            CanonicalColumn::Impressions => "impressions",
            CanonicalColumn::Clicks => "clicks",
            CanonicalColumn::Spend => "spend",
            CanonicalColumn::AttributedRevenue => "attributed_revenue",
            CanonicalColumn::Orders => "orders",
            CanonicalColumn::NewOrders => "new_orders",
            CanonicalColumn::NewCustomers => "new_customers",
            CanonicalColumn::TotalRevenue => "total_revenue",
            CanonicalColumn::GrossProfit => "gross_profit",
            CanonicalColumn::Cogs => "cogs",
        }
    }
}

impl fmt::Display for CanonicalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rename table and required-column set applies to a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Marketing,
    Business,
}

const MARKETING_SYNONYMS: &[(&str, CanonicalColumn)] = &[
    ("impression", CanonicalColumn::Impressions),
    ("attributed revenue", CanonicalColumn::AttributedRevenue),
];

const BUSINESS_SYNONYMS: &[(&str, CanonicalColumn)] = &[
    ("# of orders", CanonicalColumn::Orders),
    ("# of new orders", CanonicalColumn::NewOrders),
    ("new customers", CanonicalColumn::NewCustomers),
    ("total revenue", CanonicalColumn::TotalRevenue),
    ("gross profit", CanonicalColumn::GrossProfit),
    ("cogs", CanonicalColumn::Cogs),
];

const MARKETING_REQUIRED: &[CanonicalColumn] = &[
    CanonicalColumn::Date,
    CanonicalColumn::Channel,
    CanonicalColumn::State,
    CanonicalColumn::Campaign,
    CanonicalColumn::Impressions,
    CanonicalColumn::Clicks,
    CanonicalColumn::Spend,
    CanonicalColumn::AttributedRevenue,
];

const BUSINESS_REQUIRED: &[CanonicalColumn] = &[
    CanonicalColumn::Date,
    CanonicalColumn::Orders,
    CanonicalColumn::NewOrders,
    CanonicalColumn::NewCustomers,
    CanonicalColumn::TotalRevenue,
    CanonicalColumn::GrossProfit,
];

impl SourceKind {
    /// Lowercased source header → canonical column.
    pub fn synonyms(&self) -> &'static [(&'static str, CanonicalColumn)] {
        match self {
            SourceKind::Marketing => MARKETING_SYNONYMS,
            SourceKind::Business => BUSINESS_SYNONYMS,
        }
    }

    pub fn required_columns(&self) -> &'static [CanonicalColumn] {
        match self {
            SourceKind::Marketing => MARKETING_REQUIRED,
            SourceKind::Business => BUSINESS_REQUIRED,
        }
    }

    pub fn canonical_name<'a>(&self, column: &'a str) -> &'a str {
        self.synonyms()
            .iter()
            .find(|(synonym, _)| *synonym == column)
            .map(|(_, canonical)| canonical.as_str())
            .unwrap_or(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marketing_synonyms() {
        let kind = SourceKind::Marketing;
        assert_eq!(kind.canonical_name("impression"), "impressions");
        assert_eq!(kind.canonical_name("attributed revenue"), "attributed_revenue");
        assert_eq!(kind.canonical_name("clicks"), "clicks");
        // business headers are not renamed on marketing sources
        assert_eq!(kind.canonical_name("total revenue"), "total revenue");
    }

    #[test]
    fn test_business_synonyms() {
        let kind = SourceKind::Business;
        assert_eq!(kind.canonical_name("# of orders"), "orders");
        assert_eq!(kind.canonical_name("# of new orders"), "new_orders");
        assert_eq!(kind.canonical_name("gross profit"), "gross_profit");
        assert_eq!(kind.canonical_name("cogs"), "cogs");
    }

    #[test]
    fn test_canonical_names_are_fixed_points() {
        for kind in [SourceKind::Marketing, SourceKind::Business] {
            for column in kind.required_columns() {
                assert_eq!(kind.canonical_name(column.as_str()), column.as_str());
            }
        }
    }
}
