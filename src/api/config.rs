use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};

use super::Selection;

pub const COINBASE_HISTORY_BASE_URL: &str = "https://www.coinbase.com/api/v2";
pub const COINBASE_SPOT_BASE_URL: &str = "https://api.coinbase.com/v2";

/// One tradable asset shown as a tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Symbol used in pricing-service requests and spot filtering, e.g. `BTC`.
    pub symbol: String,
    /// Display name, e.g. `Bitcoin`.
    pub name: String,
    #[serde(default)]
    pub fill_color: Option<String>,
    #[serde(default)]
    pub stroke_color: Option<String>,
}

impl AssetConfig {
    #[must_use]
    pub fn new(symbol: &str, name: &str) -> Self {
        Self {
            symbol: symbol.to_owned(),
            name: name.to_owned(),
            fill_color: None,
            stroke_color: None,
        }
    }

    #[must_use]
    pub fn with_colors(mut self, fill: &str, stroke: &str) -> Self {
        self.fill_color = Some(fill.to_owned());
        self.stroke_color = Some(stroke.to_owned());
        self
    }
}

/// One history window the user can pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationConfig {
    /// Period key sent to the pricing service, e.g. `week`.
    pub key: String,
    /// Short tab label, e.g. `1W`.
    pub codename: String,
    /// Table label, e.g. `past week`.
    pub humanize: String,
}

impl DurationConfig {
    #[must_use]
    pub fn new(key: &str, codename: &str, humanize: &str) -> Self {
        Self {
            key: key.to_owned(),
            codename: codename.to_owned(),
            humanize: humanize.to_owned(),
        }
    }
}

/// Static dashboard configuration.
///
/// Serializable so hosts can keep the asset list, windows and endpoints in a
/// JSON file instead of recompiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_assets")]
    pub assets: Vec<AssetConfig>,
    #[serde(default = "default_durations")]
    pub durations: Vec<DurationConfig>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_initial_selection")]
    pub initial_selection: Selection,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_chart_top_padding_px")]
    pub chart_top_padding_px: f64,
    #[serde(default = "default_history_base_url")]
    pub history_base_url: String,
    #[serde(default = "default_spot_base_url")]
    pub spot_base_url: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            assets: default_assets(),
            durations: default_durations(),
            currency: default_currency(),
            initial_selection: default_initial_selection(),
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            chart_top_padding_px: default_chart_top_padding_px(),
            history_base_url: default_history_base_url(),
            spot_base_url: default_spot_base_url(),
        }
    }
}

impl DashboardConfig {
    /// Parses and validates a JSON config. Missing fields take defaults.
    pub fn from_json_str(input: &str) -> DashboardResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            DashboardError::InvalidConfig(format!("failed to parse config json: {e}"))
        })?;
        config.validate()
    }

    pub fn to_json_pretty(&self) -> DashboardResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            DashboardError::InvalidConfig(format!("failed to serialize config json: {e}"))
        })
    }

    pub fn validate(self) -> DashboardResult<Self> {
        if self.assets.is_empty() {
            return Err(DashboardError::InvalidConfig(
                "at least one asset is required".to_owned(),
            ));
        }
        if self.durations.is_empty() {
            return Err(DashboardError::InvalidConfig(
                "at least one duration is required".to_owned(),
            ));
        }
        if self.currency.trim().is_empty() {
            return Err(DashboardError::InvalidConfig(
                "currency must not be empty".to_owned(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(DashboardError::InvalidConfig(
                "poll interval must be > 0".to_owned(),
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(DashboardError::InvalidConfig(
                "request timeout must be > 0".to_owned(),
            ));
        }
        if !self.chart_top_padding_px.is_finite() || self.chart_top_padding_px < 0.0 {
            return Err(DashboardError::InvalidConfig(
                "chart top padding must be finite and >= 0".to_owned(),
            ));
        }
        self.check_selection(self.initial_selection)?;
        Ok(self)
    }

    /// Fails with [`DashboardError::InvalidSelection`] when either index is
    /// outside the configured lists.
    pub fn check_selection(&self, selection: Selection) -> DashboardResult<()> {
        if selection.asset_index >= self.assets.len()
            || selection.duration_index >= self.durations.len()
        {
            return Err(DashboardError::InvalidSelection {
                asset_index: selection.asset_index,
                duration_index: selection.duration_index,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn asset(&self, index: usize) -> Option<&AssetConfig> {
        self.assets.get(index)
    }

    #[must_use]
    pub fn duration(&self, index: usize) -> Option<&DurationConfig> {
        self.durations.get(index)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Symbols kept when filtering spot quotes.
    #[must_use]
    pub fn supported_symbols(&self) -> Vec<String> {
        self.assets.iter().map(|a| a.symbol.clone()).collect()
    }

    #[must_use]
    pub fn with_currency(mut self, currency: &str) -> Self {
        self.currency = currency.to_owned();
        self
    }

    #[must_use]
    pub fn with_initial_selection(mut self, selection: Selection) -> Self {
        self.initial_selection = selection;
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_endpoints(mut self, history_base_url: &str, spot_base_url: &str) -> Self {
        self.history_base_url = history_base_url.trim_end_matches('/').to_owned();
        self.spot_base_url = spot_base_url.trim_end_matches('/').to_owned();
        self
    }
}

fn default_assets() -> Vec<AssetConfig> {
    vec![
        AssetConfig::new("BTC", "Bitcoin").with_colors("rgba(255, 184, 77, 0.2)", "#FFB84D"),
        AssetConfig::new("BCH", "Bitcoin Cash").with_colors("rgba(140, 198, 63, 0.2)", "#8CC63F"),
        AssetConfig::new("ETH", "Ethereum").with_colors("rgba(98, 126, 234, 0.2)", "#627EEA"),
        AssetConfig::new("LTC", "Litecoin").with_colors("rgba(180, 180, 180, 0.2)", "#B4B4B4"),
    ]
}

fn default_durations() -> Vec<DurationConfig> {
    vec![
        DurationConfig::new("hour", "1H", "past hour"),
        DurationConfig::new("day", "1D", "past day"),
        DurationConfig::new("week", "1W", "past week"),
        DurationConfig::new("month", "1M", "past month"),
        DurationConfig::new("year", "1Y", "past year"),
    ]
}

fn default_currency() -> String {
    "usd".to_owned()
}

fn default_initial_selection() -> Selection {
    Selection::new(0, 2)
}

fn default_poll_interval_ms() -> u64 {
    10_000
}

fn default_request_timeout_ms() -> u64 {
    12_000
}

fn default_chart_top_padding_px() -> f64 {
    20.0
}

fn default_history_base_url() -> String {
    COINBASE_HISTORY_BASE_URL.to_owned()
}

fn default_spot_base_url() -> String {
    COINBASE_SPOT_BASE_URL.to_owned()
}
