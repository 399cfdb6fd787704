use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::PricePoint;
use crate::error::{DashboardError, DashboardResult};

/// Affine map from a numeric domain onto a pixel range.
///
/// A collapsed domain (`start == end`) maps every value to the middle of the
/// range instead of dividing by zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(
        domain_start: f64,
        domain_end: f64,
        range_start: f64,
        range_end: f64,
    ) -> DashboardResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() {
            return Err(DashboardError::DataFormat(
                "scale domain must be finite".to_owned(),
            ));
        }
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(DashboardError::DataFormat(
                "scale range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            range_start,
            range_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let span = self.domain_end - self.domain_start;
        let normalized = if span == 0.0 {
            0.5
        } else {
            (value - self.domain_start) / span
        };
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    /// Maps a range value back into the domain. A collapsed range or domain
    /// resolves to the domain start.
    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let span = self.range_end - self.range_start;
        if span == 0.0 {
            return self.domain_start;
        }
        let normalized = (pixel - self.range_start) / span;
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }
}

/// Price axis mapped onto an inverted Y pixel axis.
///
/// The lowest price of the history lands on `height_px` (bottom edge) and the
/// highest on `top_padding_px`, so higher prices get smaller y. Padding larger
/// than the height is clamped to the height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceScale {
    linear: LinearScale,
}

impl PriceScale {
    /// Creates a price scale from an explicit price domain.
    pub fn new(
        price_min: f64,
        price_max: f64,
        height_px: f64,
        top_padding_px: f64,
    ) -> DashboardResult<Self> {
        if !height_px.is_finite() || height_px <= 0.0 {
            return Err(DashboardError::DataFormat(
                "price scale height must be finite and > 0".to_owned(),
            ));
        }
        let top_px = top_padding_px.clamp(0.0, height_px);
        let linear = LinearScale::new(price_min, price_max, height_px, top_px)?;
        Ok(Self { linear })
    }

    /// Fits the scale to the price extent of `history`.
    ///
    /// Fails with [`DashboardError::EmptyHistory`] when there is nothing to
    /// fit; callers are expected to guard on a non-empty history.
    pub fn from_history(
        history: &[PricePoint],
        height_px: f64,
        top_padding_px: f64,
    ) -> DashboardResult<Self> {
        let (min, max) = price_extent(history).ok_or(DashboardError::EmptyHistory)?;
        Self::new(min, max, height_px, top_padding_px)
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        self.linear.domain()
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.linear.range()
    }

    #[must_use]
    pub fn price_to_pixel(self, price: f64) -> f64 {
        self.linear.map(price)
    }

    #[must_use]
    pub fn pixel_to_price(self, pixel: f64) -> f64 {
        self.linear.invert(pixel)
    }
}

/// Returns `(min, max)` price over `history`, ignoring non-finite prices.
#[must_use]
pub fn price_extent(history: &[PricePoint]) -> Option<(f64, f64)> {
    let finite = || {
        history
            .iter()
            .map(|point| point.price)
            .filter(|price| price.is_finite())
            .map(OrderedFloat)
    };
    let min = finite().min()?;
    let max = finite().max()?;
    Some((min.0, max.0))
}

/// Maps a pointer offset to the proportional sample index.
///
/// `pointer_x / container_width_px` is clamped to `[0, 1]`; a zero or
/// non-finite width resolves to the first sample.
#[must_use]
pub fn nearest_index_at(pointer_x: f64, container_width_px: f64, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }

    let fraction = if container_width_px > 0.0 && container_width_px.is_finite() {
        let raw = pointer_x / container_width_px;
        if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 1.0) }
    } else {
        0.0
    };

    let last = len - 1;
    let index = (fraction * last as f64).round() as usize;
    Some(index.min(last))
}

/// Returns the history sample under a pointer at `pointer_x` pixels.
#[must_use]
pub fn nearest_sample_at(
    pointer_x: f64,
    container_width_px: f64,
    history: &[PricePoint],
) -> Option<PricePoint> {
    let index = nearest_index_at(pointer_x, container_width_px, history.len())?;
    history.get(index).copied()
}
