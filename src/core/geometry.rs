use serde::{Deserialize, Serialize};

use crate::core::{PricePoint, PriceScale, Viewport, nearest_index_at};

/// Chart geometry derived from a container size and a price history.
///
/// Recomputed whenever either input changes; see
/// [`crate::interaction::HoverTracker`] for the cache that enforces this.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartGeometry {
    pub width_px: f64,
    pub height_px: f64,
    pub price_domain: (f64, f64),
    pub price_scale: PriceScale,
}

impl ChartGeometry {
    /// Returns `None` for an invalid viewport or an empty history.
    #[must_use]
    pub fn compute(
        viewport: Viewport,
        history: &[PricePoint],
        top_padding_px: f64,
    ) -> Option<Self> {
        if !viewport.is_valid() {
            return None;
        }
        let height_px = f64::from(viewport.height);
        let price_scale = PriceScale::from_history(history, height_px, top_padding_px).ok()?;
        Some(Self {
            width_px: f64::from(viewport.width),
            height_px,
            price_domain: price_scale.domain(),
            price_scale,
        })
    }

    #[must_use]
    pub fn price_to_pixel(&self, price: f64) -> f64 {
        self.price_scale.price_to_pixel(price)
    }

    /// Resolves the sample index under `pointer_x` for a series of `len` samples.
    #[must_use]
    pub fn index_at(&self, pointer_x: f64, len: usize) -> Option<usize> {
        nearest_index_at(pointer_x, self.width_px, len)
    }
}
