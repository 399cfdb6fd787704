use reqwest::Client;
use serde_json::Value;
use tracing::{debug, trace};

use crate::core::PriceHistory;
use crate::error::{DashboardError, DashboardResult};

use super::normalize::{normalize_price_history, normalize_spot_prices};
use super::{DashboardConfig, PriceDataSource, SpotQuote};

/// HTTP client for the Coinbase v2 price endpoints.
#[derive(Debug, Clone)]
pub struct CoinbaseClient {
    client: Client,
    history_base_url: String,
    spot_base_url: String,
    supported_symbols: Vec<String>,
}

impl CoinbaseClient {
    pub fn new(config: &DashboardConfig) -> DashboardResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| DashboardError::Network(format!("reqwest client error: {e}")))?;
        Ok(Self::with_client(client, config))
    }

    /// Uses a caller-provided `reqwest::Client`, e.g. one with a proxy.
    #[must_use]
    pub fn with_client(client: Client, config: &DashboardConfig) -> Self {
        Self {
            client,
            history_base_url: config.history_base_url.trim_end_matches('/').to_owned(),
            spot_base_url: config.spot_base_url.trim_end_matches('/').to_owned(),
            supported_symbols: config.supported_symbols(),
        }
    }

    #[must_use]
    pub fn history_url(&self, asset: &str, currency: &str, duration_key: &str) -> String {
        format!(
            "{}/prices/{}-{}/historic?period={}",
            self.history_base_url,
            asset.to_ascii_uppercase(),
            currency.to_ascii_uppercase(),
            duration_key
        )
    }

    #[must_use]
    pub fn spot_url(&self, currency: &str) -> String {
        format!(
            "{}/prices/{}/spot",
            self.spot_base_url,
            currency.to_ascii_uppercase()
        )
    }

    async fn get_json(&self, url: &str) -> DashboardResult<Value> {
        trace!(url, "pricing request");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DashboardError::Network(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::Network(format!(
                "request to {url} returned status {status}"
            )));
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_decode() {
                DashboardError::DataFormat(format!("response from {url} is not json: {e}"))
            } else {
                DashboardError::Network(format!("reading response from {url} failed: {e}"))
            }
        })
    }
}

impl PriceDataSource for CoinbaseClient {
    async fn fetch_price_history(
        &self,
        asset: &str,
        currency: &str,
        duration_key: &str,
    ) -> DashboardResult<PriceHistory> {
        let url = self.history_url(asset, currency, duration_key);
        let body = self.get_json(&url).await?;
        let history = normalize_price_history(&body)?;
        debug!(asset, currency, duration_key, count = history.len(), "fetched price history");
        Ok(history)
    }

    async fn fetch_spot_prices(&self, currency: &str) -> DashboardResult<Vec<SpotQuote>> {
        let url = self.spot_url(currency);
        let body = self.get_json(&url).await?;
        let quotes = normalize_spot_prices(&body, &self.supported_symbols)?;
        debug!(currency, count = quotes.len(), "fetched spot prices");
        Ok(quotes)
    }
}
