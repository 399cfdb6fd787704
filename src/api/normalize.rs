//! Pricing-service payload normalization.
//!
//! Pure functions from decoded JSON bodies to domain types, kept apart from
//! the HTTP client so the shape rules can be tested without a network.

use serde_json::Value;
use tracing::{debug, trace};

use crate::core::primitives::{parse_json_f64, parse_json_time};
use crate::core::{PriceHistory, PricePoint};
use crate::error::{DashboardError, DashboardResult};

use super::SpotQuote;

/// Normalizes a historic-prices body `{ "data": { "prices": [...] } }`.
///
/// Each entry needs a `price` and a `time`; the result is sorted ascending by
/// time with ties kept in source order.
pub fn normalize_price_history(body: &Value) -> DashboardResult<PriceHistory> {
    let entries = body
        .pointer("/data/prices")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            DashboardError::DataFormat("history response lacks data.prices list".to_owned())
        })?;

    let history = normalize_price_entries(entries)?;
    debug!(count = history.len(), "normalized price history");
    Ok(history)
}

/// Normalizes the raw list of history entries without the response envelope.
pub fn normalize_price_entries(entries: &[Value]) -> DashboardResult<PriceHistory> {
    let points = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| normalize_price_entry(index, entry))
        .collect::<DashboardResult<Vec<_>>>()?;
    Ok(PriceHistory::new(points))
}

fn normalize_price_entry(index: usize, entry: &Value) -> DashboardResult<PricePoint> {
    let price = entry.get("price").ok_or_else(|| {
        DashboardError::DataFormat(format!("history entry {index} lacks price"))
    })?;
    let time = entry.get("time").ok_or_else(|| {
        DashboardError::DataFormat(format!("history entry {index} lacks time"))
    })?;
    Ok(PricePoint::new(
        parse_json_f64(price, "price")?,
        parse_json_time(time)?,
    ))
}

/// Normalizes a spot-prices body `{ "data": [ { "base", "currency", "amount" } ] }`.
///
/// Quotes for assets outside `supported`, including entries without a `base`
/// symbol, are dropped rather than reported as errors. Symbol matching
/// ignores case; service order is preserved.
pub fn normalize_spot_prices<S: AsRef<str>>(
    body: &Value,
    supported: &[S],
) -> DashboardResult<Vec<SpotQuote>> {
    let entries = body
        .pointer("/data")
        .and_then(Value::as_array)
        .ok_or_else(|| DashboardError::DataFormat("spot response lacks data list".to_owned()))?;

    let mut quotes = Vec::with_capacity(supported.len());
    for (index, entry) in entries.iter().enumerate() {
        let Some(base) = entry.get("base").and_then(Value::as_str) else {
            trace!(index, "dropping spot quote without base symbol");
            continue;
        };
        if !supported
            .iter()
            .any(|symbol| symbol.as_ref().eq_ignore_ascii_case(base))
        {
            trace!(base, "dropping unsupported spot quote");
            continue;
        }

        let currency = entry
            .get("currency")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                DashboardError::DataFormat(format!("spot entry {index} lacks currency"))
            })?;
        let amount = entry.get("amount").ok_or_else(|| {
            DashboardError::DataFormat(format!("spot entry {index} lacks amount"))
        })?;

        quotes.push(SpotQuote {
            asset: base.to_owned(),
            currency: currency.to_owned(),
            amount: parse_json_f64(amount, "amount")?,
        });
    }

    debug!(
        received = entries.len(),
        kept = quotes.len(),
        "normalized spot prices"
    );
    Ok(quotes)
}
