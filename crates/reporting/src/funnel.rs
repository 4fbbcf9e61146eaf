//! Funnel analysis — the fixed impressions → clicks → orders → revenue
//! progression over the current view.

use crate::fact::FactTable;
use crate::kpi::safe_divide;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStage {
    Impressions,
    Clicks,
    Orders,
    Revenue,
}

impl FunnelStage {
    pub const ORDERED: [FunnelStage; 4] = [
        FunnelStage::Impressions,
        FunnelStage::Clicks,
        FunnelStage::Orders,
        FunnelStage::Revenue,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FunnelStage::Impressions => "Impressions",
            FunnelStage::Clicks => "Clicks",
            FunnelStage::Orders => "Orders",
            FunnelStage::Revenue => "Revenue ($)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelStepResult {
    pub stage: FunnelStage,
    pub label: String,
    pub value: f64,
    /// This stage's value over the previous stage's; `None` for the first
    /// stage or when the previous stage is zero.
    pub conversion_from_previous: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelResult {
    pub steps: Vec<FunnelStepResult>,
}

pub struct FunnelAnalyzer;

impl FunnelAnalyzer {
    pub fn analyze(view: &FactTable) -> FunnelResult {
        let totals = view.totals();
        let mut steps: Vec<FunnelStepResult> = Vec::with_capacity(FunnelStage::ORDERED.len());

        for stage in FunnelStage::ORDERED {
            let value = match stage {
                FunnelStage::Impressions => totals.impressions as f64,
                FunnelStage::Clicks => totals.clicks as f64,
                FunnelStage::Orders => totals.orders as f64,
                FunnelStage::Revenue => totals.total_revenue,
            };
            let conversion_from_previous = steps
                .last()
                .and_then(|prev| safe_divide(value, prev.value));
            steps.push(FunnelStepResult {
                stage,
                label: stage.label().to_string(),
                value,
                conversion_from_previous,
            });
        }

        FunnelResult { steps }
    }
}
