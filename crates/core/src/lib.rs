//! Shared types for the marketing dashboard: error taxonomy, configuration,
//! canonical schema, and the typed records that flow through the pipeline.

pub mod config;
pub mod error;
pub mod schema;
pub mod types;

pub use crate::config::{AppConfig, ChannelSource, DataConfig};
pub use error::{DashboardError, DashboardResult};
pub use schema::{CanonicalColumn, SourceKind};
pub use types::{
    BusinessRecord, Channel, ChannelSelector, DateRange, FactKey, FactRow, FilterSpec, Measures,
    Page, RawChannelRecord,
};
