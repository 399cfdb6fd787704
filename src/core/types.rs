use std::ops::Deref;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Container pixel size of the chart surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// One historical price sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub price: f64,
    pub time: DateTime<Utc>,
}

impl PricePoint {
    #[must_use]
    pub fn new(price: f64, time: DateTime<Utc>) -> Self {
        Self { price, time }
    }
}

/// Time-ordered price series for one (asset, currency, duration) triple.
///
/// Immutable once built. Clones share the same backing slice, so a history
/// can be handed to the chart and the table without copying and can be
/// compared by identity with [`PriceHistory::ptr_eq`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct PriceHistory {
    points: Arc<[PricePoint]>,
}

impl PriceHistory {
    /// Builds a history from samples in any order.
    ///
    /// Non-finite prices are dropped. The sort is stable, so samples sharing
    /// a timestamp keep their source order.
    #[must_use]
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        let original_count = points.len();
        points.retain(|point| point.price.is_finite());
        let filtered_count = original_count - points.len();
        if filtered_count > 0 {
            warn!(
                filtered_count,
                canonical_count = points.len(),
                "dropped non-finite prices from history"
            );
        }
        points.sort_by_key(|point| point.time);
        Self {
            points: points.into(),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            points: Arc::from(Vec::new()),
        }
    }

    #[must_use]
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Returns whether both histories are the same fetched series.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.points, &other.points)
    }
}

impl Default for PriceHistory {
    fn default() -> Self {
        Self::empty()
    }
}

impl Deref for PriceHistory {
    type Target = [PricePoint];

    fn deref(&self) -> &Self::Target {
        &self.points
    }
}

impl From<Vec<PricePoint>> for PriceHistory {
    fn from(points: Vec<PricePoint>) -> Self {
        Self::new(points)
    }
}

impl From<PriceHistory> for Vec<PricePoint> {
    fn from(history: PriceHistory) -> Self {
        history.points.to_vec()
    }
}
