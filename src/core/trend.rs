use serde::{Deserialize, Serialize};

use crate::core::PricePoint;

/// Change of the current spot price relative to the start of the window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Trend {
    pub absolute_delta: f64,
    pub percent_delta: f64,
}

impl Trend {
    pub const ZERO: Self = Self {
        absolute_delta: 0.0,
        percent_delta: 0.0,
    };
}

/// Returns the earliest sample of `history`.
///
/// The minimum is searched explicitly rather than taken from position 0, so
/// unsorted input still resolves correctly. When several samples share the
/// earliest time the first one wins.
#[must_use]
pub fn reference_point(history: &[PricePoint]) -> Option<&PricePoint> {
    history.iter().min_by_key(|point| point.time)
}

/// Computes absolute and percent change of `current_spot` against the
/// earliest sample in `history`.
///
/// Never fails: an empty history gives [`Trend::ZERO`], and a zero or
/// non-finite reference price gives a zero percent change.
#[must_use]
pub fn compute_trend(history: &[PricePoint], current_spot: f64) -> Trend {
    let Some(reference) = reference_point(history) else {
        return Trend::ZERO;
    };
    let reference_price = reference.price;
    if !reference_price.is_finite() {
        return Trend::ZERO;
    }

    let absolute_delta = finite_or_zero(current_spot - reference_price);
    let percent_delta = if reference_price == 0.0 {
        0.0
    } else {
        finite_or_zero(((current_spot / reference_price) - 1.0) * 100.0)
    };

    Trend {
        absolute_delta,
        percent_delta,
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
