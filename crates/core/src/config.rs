use crate::types::Channel;
use serde::Deserialize;

/// Root application configuration. Loaded from an optional TOML file and
/// environment variables with the prefix `MARKETING_DASHBOARD__`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataConfig,
}

/// Where the four input files live and how their dates are written.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_sources")]
    pub sources: Vec<ChannelSource>,
    #[serde(default = "default_business_path")]
    pub business_path: String,
    /// `chrono` format strings, tried in order.
    #[serde(default = "default_date_formats")]
    pub date_formats: Vec<String>,
}

/// A marketing file and the channel label stamped on its rows.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelSource {
    pub channel: Channel,
    pub path: String,
}

impl ChannelSource {
    pub fn new(channel: Channel, path: impl Into<String>) -> Self {
        Self {
            channel,
            path: path.into(),
        }
    }
}

// Default functions
fn default_sources() -> Vec<ChannelSource> {
    vec![
        ChannelSource::new(Channel::Facebook, "Facebook.csv"),
        ChannelSource::new(Channel::Google, "Google.csv"),
        ChannelSource::new(Channel::TikTok, "TikTok.csv"),
    ]
}
fn default_business_path() -> String {
    "business.csv".to_string()
}
fn default_date_formats() -> Vec<String> {
    ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d-%m-%Y"]
        .iter()
        .map(|f| f.to_string())
        .collect()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            business_path: default_business_path(),
            date_formats: default_date_formats(),
        }
    }
}

impl DataConfig {
    /// Replace the path of one channel's file, adding the channel if it
    /// was not configured.
    pub fn set_source_path(&mut self, channel: Channel, path: impl Into<String>) {
        let path = path.into();
        match self.sources.iter_mut().find(|s| s.channel == channel) {
            Some(source) => source.path = path,
            None => self.sources.push(ChannelSource::new(channel, path)),
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional config file, then environment
    /// variables (which win).
    pub fn load(file: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }
        let builder = builder.add_source(
            config::Environment::with_prefix("MARKETING_DASHBOARD")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("data.date_formats"),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
