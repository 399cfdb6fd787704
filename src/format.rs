//! Display formatting for prices, deltas and hover times.
//!
//! Output is for rendering only; nothing in the crate parses it back.

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Formats `amount` as en-US currency text, e.g. `$1,234.56` or `-€3.10`.
///
/// Currencies without a known symbol use the upper-case code as prefix
/// (`CHF 12.00`). Non-finite amounts format as an empty string.
#[must_use]
pub fn format_currency(amount: f64, currency_code: &str) -> String {
    let Some(text) = format_grouped(amount, 2) else {
        return String::new();
    };
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let prefix = match currency_symbol(currency_code) {
        Some(symbol) => symbol.to_owned(),
        None => format!("{} ", currency_code.to_ascii_uppercase()),
    };
    format!("{sign}{prefix}{digits}")
}

/// Like [`format_currency`] with a leading `+` for positive amounts.
#[must_use]
pub fn format_signed_currency(amount: f64, currency_code: &str) -> String {
    let text = format_currency(amount, currency_code);
    if amount > 0.0 && !text.is_empty() && !is_zero_at_precision(amount, 2) {
        format!("+{text}")
    } else {
        text
    }
}

/// Formats a percentage with two decimals, e.g. `80.00%`.
#[must_use]
pub fn format_percent(value: f64) -> String {
    match format_grouped(value, 2) {
        Some(text) => format!("{text}%"),
        None => String::new(),
    }
}

/// Like [`format_percent`] with a leading `+` for positive values.
#[must_use]
pub fn format_signed_percent(value: f64) -> String {
    let text = format_percent(value);
    if value > 0.0 && !text.is_empty() && !is_zero_at_precision(value, 2) {
        format!("+{text}")
    } else {
        text
    }
}

/// Formats a sample time in the viewer's offset, e.g. `1/2/2024, 3:04:05 PM`.
#[must_use]
pub fn format_hover_time(time: DateTime<Utc>, offset: FixedOffset) -> String {
    time.with_timezone(&offset)
        .format("%-m/%-d/%Y, %-I:%M:%S %p")
        .to_string()
}

fn currency_symbol(currency_code: &str) -> Option<&'static str> {
    match currency_code.to_ascii_lowercase().as_str() {
        "usd" => Some("$"),
        "eur" => Some("€"),
        "gbp" => Some("£"),
        "jpy" => Some("¥"),
        _ => None,
    }
}

fn round_decimal(value: f64, precision: u32) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero))
}

fn is_zero_at_precision(value: f64, precision: u32) -> bool {
    round_decimal(value, precision).is_none_or(|d| d.is_zero())
}

/// Rounds half away from zero and inserts `,` thousands separators.
fn format_grouped(value: f64, precision: u32) -> Option<String> {
    let rounded = round_decimal(value, precision)?;
    let prec = precision as usize;
    let text = format!("{:.prec$}", rounded.abs());
    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + integer.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.push('-');
    }
    for (idx, ch) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    Some(grouped)
}
