//! price-dashboard: refresh pipeline and chart geometry for a live
//! cryptocurrency price dashboard.
//!
//! The crate keeps one consistent snapshot of price history and spot quotes
//! for the user's selection, refreshed on selection changes and on a fixed
//! poll interval, and maps that data onto chart pixels for hover lookups.
//! Rendering is left to the host.

pub mod api;
pub mod core;
pub mod error;
pub mod format;
pub mod interaction;
pub mod telemetry;

pub use api::{DashboardConfig, RefreshController, RefreshService, Selection, Snapshot};
pub use error::{DashboardError, DashboardResult};
