use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{PriceHistory, Trend, compute_trend};

/// The user's current choice of asset tab and duration tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub asset_index: usize,
    pub duration_index: usize,
}

impl Selection {
    #[must_use]
    pub fn new(asset_index: usize, duration_index: usize) -> Self {
        Self {
            asset_index,
            duration_index,
        }
    }

    #[must_use]
    pub fn with_asset(self, asset_index: usize) -> Self {
        Self {
            asset_index,
            ..self
        }
    }

    #[must_use]
    pub fn with_duration(self, duration_index: usize) -> Self {
        Self {
            duration_index,
            ..self
        }
    }
}

/// Current price of one asset in one currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotQuote {
    pub asset: String,
    pub currency: String,
    pub amount: f64,
}

/// Result of one successful fetch cycle, before it is bound to a selection.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedData {
    pub price_history: PriceHistory,
    pub spot_quotes: Vec<SpotQuote>,
}

/// Consistent pairing of history and spot quotes for one selection.
///
/// Published as a whole by the refresh controller; consumers never observe
/// history from one selection next to quotes from another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub price_history: PriceHistory,
    pub spot_quotes: Vec<SpotQuote>,
    pub selection: Selection,
    /// Symbol of the selected asset at fetch time.
    pub asset: String,
    pub fetched_at: DateTime<Utc>,
    /// Issue order of the fetch that produced this snapshot.
    pub sequence: u64,
}

impl Snapshot {
    /// Looks a quote up by asset symbol, ignoring case.
    #[must_use]
    pub fn spot_for(&self, asset: &str) -> Option<&SpotQuote> {
        self.spot_quotes
            .iter()
            .find(|quote| quote.asset.eq_ignore_ascii_case(asset))
    }

    /// Spot quote of the selected asset.
    #[must_use]
    pub fn selected_spot(&self) -> Option<&SpotQuote> {
        self.spot_for(&self.asset)
    }

    /// Trend of the selected asset's spot price over the displayed window.
    /// A missing quote gives [`Trend::ZERO`].
    #[must_use]
    pub fn trend(&self) -> Trend {
        self.selected_spot()
            .map_or(Trend::ZERO, |quote| {
                compute_trend(&self.price_history, quote.amount)
            })
    }
}
