use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::error::{DashboardError, DashboardResult};

/// Parses a numeric JSON value that the pricing service may send either as a
/// number or as a decimal string.
pub fn parse_json_f64(value: &Value, field_name: &str) -> DashboardResult<f64> {
    let parsed = if let Some(v) = value.as_f64() {
        v
    } else if let Some(text) = value.as_str() {
        text.trim().parse::<f64>().map_err(|e| {
            DashboardError::DataFormat(format!("invalid {field_name} `{text}`: {e}"))
        })?
    } else {
        return Err(DashboardError::DataFormat(format!(
            "invalid {field_name} json value: {value}"
        )));
    };

    if !parsed.is_finite() {
        return Err(DashboardError::DataFormat(format!(
            "{field_name} must be finite, got {parsed}"
        )));
    }
    Ok(parsed)
}

/// Parses a timestamp sent as RFC 3339, a bare `YYYY-MM-DD` date (midnight
/// UTC), or unix seconds.
pub fn parse_json_time(value: &Value) -> DashboardResult<DateTime<Utc>> {
    if let Some(seconds) = value.as_f64() {
        return unix_seconds_to_datetime(seconds);
    }

    let Some(text) = value.as_str() else {
        return Err(DashboardError::DataFormat(format!(
            "invalid time json value: {value}"
        )));
    };
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    if let Ok(seconds) = text.parse::<f64>() {
        return unix_seconds_to_datetime(seconds);
    }

    Err(DashboardError::DataFormat(format!(
        "unrecognized time `{text}`"
    )))
}

fn unix_seconds_to_datetime(seconds: f64) -> DashboardResult<DateTime<Utc>> {
    if !seconds.is_finite() {
        return Err(DashboardError::DataFormat(
            "unix time must be finite".to_owned(),
        ));
    }
    let millis = (seconds * 1_000.0).round();
    if millis > i64::MAX as f64 || millis < i64::MIN as f64 {
        return Err(DashboardError::DataFormat(format!(
            "unix time out of range: {seconds}"
        )));
    }
    DateTime::<Utc>::from_timestamp_millis(millis as i64)
        .ok_or_else(|| DashboardError::DataFormat(format!("unix time out of range: {seconds}")))
}

