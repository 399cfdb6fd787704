use thiserror::Error;

pub type DashboardResult<T> = Result<T, DashboardError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response format: {0}")]
    DataFormat(String),

    #[error("price history is empty")]
    EmptyHistory,

    #[error("invalid selection: asset_index={asset_index}, duration_index={duration_index}")]
    InvalidSelection {
        asset_index: usize,
        duration_index: usize,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
