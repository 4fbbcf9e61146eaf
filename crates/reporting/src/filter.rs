//! Filter engine — date range and channel predicate over the fact table.

use crate::fact::FactTable;
use dashboard_core::FilterSpec;

/// Produce the current view. No match yields an empty table, including
/// the case where the range's start is after its end.
pub fn apply(facts: &FactTable, filter: &FilterSpec) -> FactTable {
    FactTable::new(facts.iter().filter(|row| filter.matches(row)).cloned().collect())
}
