use thiserror::Error;

pub type DashboardResult<T> = Result<T, DashboardError>;

/// Load-time failures. Anything raised here aborts session startup.
///
/// Zero denominators and empty filter results are not errors: they are
/// modelled as `None` ratios and empty tables by the reporting crate.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Schema error in {dataset}: {detail}")]
    Schema { dataset: String, detail: String },

    #[error("Parse error in {dataset}, row {row}, column '{column}': cannot parse '{value}'")]
    Parse {
        dataset: String,
        row: usize,
        column: String,
        value: String,
    },

    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl DashboardError {
    pub fn missing_column(dataset: impl Into<String>, column: &str) -> Self {
        Self::Schema {
            dataset: dataset.into(),
            detail: format!("missing required column '{column}'"),
        }
    }

    pub fn duplicate_column(dataset: impl Into<String>, column: &str) -> Self {
        Self::Schema {
            dataset: dataset.into(),
            detail: format!("column '{column}' appears more than once after normalization"),
        }
    }

    pub fn parse(
        dataset: impl Into<String>,
        row: usize,
        column: &str,
        value: impl Into<String>,
    ) -> Self {
        Self::Parse {
            dataset: dataset.into(),
            row,
            column: column.to_string(),
            value: value.into(),
        }
    }

    /// True for the two load-time categories the dashboard reports as fatal
    /// data problems rather than environment failures.
    pub fn is_data_error(&self) -> bool {
        matches!(self, Self::Schema { .. } | Self::Parse { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_message_names_dataset_and_column() {
        let err = DashboardError::missing_column("Google.csv", "date");
        assert_eq!(
            err.to_string(),
            "Schema error in Google.csv: missing required column 'date'"
        );
        assert!(err.is_data_error());
    }

    #[test]
    fn test_parse_error_message() {
        let err = DashboardError::parse("business.csv", 3, "date", "not-a-date");
        assert_eq!(
            err.to_string(),
            "Parse error in business.csv, row 3, column 'date': cannot parse 'not-a-date'"
        );
    }

    #[test]
    fn test_io_error_is_not_data_error() {
        let err: DashboardError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(!err.is_data_error());
    }
}
