//! Refresh pipeline: configuration, pricing-service access, the refresh
//! state machine and its async driver.

mod coinbase_client;
mod config;
mod dashboard_view;
mod data_source;
pub mod normalize;
mod refresh_controller;
mod refresh_service;
mod snapshot;
mod timer;

pub use coinbase_client::CoinbaseClient;
pub use config::{
    AssetConfig, COINBASE_HISTORY_BASE_URL, COINBASE_SPOT_BASE_URL, DashboardConfig,
    DurationConfig,
};
pub use dashboard_view::{AssetTab, DashboardView, DurationTab, TableCell};
pub use data_source::PriceDataSource;
pub use refresh_controller::{
    FetchOutcome, FetchRequest, FetchTicket, RefreshController, RefreshState, RefreshStats,
    StaleReason,
};
pub use refresh_service::{Command, RefreshHandle, RefreshService};
pub use snapshot::{FetchedData, Selection, SpotQuote, Snapshot};
pub use timer::{IntervalTimer, ManualTicker, ManualTimer, PollTimer, manual_timer};
