//! Session pipeline — loads and joins the inputs once, then answers filter
//! changes against the immutable fact table.

use crate::aggregator::aggregate;
use crate::dashboard::{DashboardControls, ViewState};
use crate::fact::FactTable;
use crate::merger::merge;
use crate::normalizer::Normalizer;
use crate::table::Table;
use dashboard_core::{Channel, DataConfig, DashboardResult, FilterSpec, SourceKind};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct DashboardPipeline {
    facts: FactTable,
}

impl DashboardPipeline {
    /// Read every configured file and build the fact table. Any read,
    /// schema or parse failure aborts the load.
    pub fn load(config: &DataConfig) -> DashboardResult<Self> {
        let mut marketing = Vec::with_capacity(config.sources.len());
        for source in &config.sources {
            info!(channel = %source.channel, path = %source.path, "Loading marketing dataset");
            marketing.push((source.channel, Table::from_csv_path(&source.path)?));
        }
        info!(path = %config.business_path, "Loading business dataset");
        let business = Table::from_csv_path(&config.business_path)?;

        Self::from_tables(marketing, business, &config.date_formats)
    }

    /// Normalize → merge → aggregate over already-read tables.
    pub fn from_tables(
        marketing: Vec<(Channel, Table)>,
        business: Table,
        date_formats: &[String],
    ) -> DashboardResult<Self> {
        let marketing_normalizer = Normalizer::new(SourceKind::Marketing, date_formats);
        let business_normalizer = Normalizer::new(SourceKind::Business, date_formats);

        let marketing = marketing
            .into_iter()
            .map(|(channel, table)| marketing_normalizer.normalize(table, Some(channel)))
            .collect::<DashboardResult<Vec<_>>>()?;
        let business = business_normalizer.normalize(business, None)?;

        let merged = merge(&marketing, &business)?;
        let facts = aggregate(&merged.rows);
        Ok(Self::from_facts(facts))
    }

    pub fn from_facts(facts: FactTable) -> Self {
        Self { facts }
    }

    pub fn facts(&self) -> &FactTable {
        &self.facts
    }

    pub fn controls(&self) -> DashboardControls {
        DashboardControls::from_facts(&self.facts)
    }

    /// Pure function of the fact table and the filter.
    pub fn recompute(&self, filter: &FilterSpec) -> ViewState {
        let state = ViewState::compute(&self.facts, filter);
        debug!(
            start = %filter.range.start,
            end = %filter.range.end,
            channel = %filter.channel,
            rows = state.row_count,
            "Recomputed dashboard view"
        );
        state
    }
}
