//! Marketing reporting pipeline — load per-channel spend and business
//! outcome files, join them by date, aggregate to the daily
//! channel/state/campaign grain, and derive filtered KPIs and summaries.

pub mod aggregator;
pub mod dashboard;
pub mod fact;
pub mod filter;
pub mod funnel;
pub mod kpi;
pub mod merger;
pub mod normalizer;
pub mod pipeline;
pub mod records;
pub mod summary;
pub mod table;

pub use dashboard::{DashboardControls, PageView, ViewState};
pub use fact::FactTable;
pub use funnel::FunnelAnalyzer;
pub use kpi::{safe_divide, KpiSnapshot};
pub use normalizer::Normalizer;
pub use pipeline::DashboardPipeline;
pub use table::{Table, Value};
