use chrono::{TimeZone, Utc};
use price_dashboard::api::normalize::{
    normalize_price_entries, normalize_price_history, normalize_spot_prices,
};
use price_dashboard::core::PriceHistory;
use price_dashboard::error::DashboardError;
use serde_json::json;

#[test]
fn history_is_sorted_ascending_by_time() {
    let body = json!({
        "data": {
            "prices": [
                { "price": "150.00", "time": "2024-01-02" },
                { "price": "100.00", "time": "2024-01-01" }
            ]
        }
    });

    let history = normalize_price_history(&body).expect("normalize");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].price, 100.0);
    assert_eq!(
        history[0].time,
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("valid time")
    );
    assert_eq!(history[1].price, 150.0);
}

#[test]
fn equal_timestamps_keep_source_order() {
    let entries = vec![
        json!({ "price": 3.0, "time": "2024-01-02T00:00:00Z" }),
        json!({ "price": 1.0, "time": "2024-01-01T00:00:00Z" }),
        json!({ "price": 2.0, "time": "2024-01-01T00:00:00Z" }),
    ];

    let history = normalize_price_entries(&entries).expect("normalize");
    let prices: Vec<f64> = history.iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![1.0, 2.0, 3.0]);
}

#[test]
fn time_accepts_rfc3339_and_unix_seconds() {
    let entries = vec![
        json!({ "price": "1.5", "time": "2024-03-01T12:30:00+02:00" }),
        json!({ "price": 2.5, "time": 1_709_289_000 }),
        json!({ "price": "3.5", "time": "1709289060" }),
    ];

    let history = normalize_price_entries(&entries).expect("normalize");
    let expected = Utc
        .with_ymd_and_hms(2024, 3, 1, 10, 30, 0)
        .single()
        .expect("valid time");
    assert_eq!(history[0].time, expected);
    assert_eq!(history[1].time, expected);
    assert_eq!(history[0].price, 1.5);
    assert_eq!(history[1].price, 2.5);
    assert_eq!(history[2].time, expected + chrono::Duration::seconds(60));
}

#[test]
fn missing_time_is_a_format_error() {
    let entries = vec![json!({ "price": "1.0" })];
    let err = normalize_price_entries(&entries).expect_err("missing time");
    assert!(matches!(err, DashboardError::DataFormat(_)));

    let entries = vec![json!({ "price": "1.0", "time": "yesterday" })];
    let err = normalize_price_entries(&entries).expect_err("bad time");
    assert!(matches!(err, DashboardError::DataFormat(_)));
}

#[test]
fn empty_price_list_is_an_empty_history() {
    let body = json!({ "data": { "prices": [] } });
    let history = normalize_price_history(&body).expect("normalize");
    assert!(history.is_empty());
}

#[test]
fn spot_quotes_are_filtered_to_supported_assets_in_service_order() {
    let body = json!({
        "data": [
            { "base": "ETH", "currency": "USD", "amount": "3100.25" },
            { "base": "DOGE", "currency": "USD", "amount": "0.08" },
            { "base": "BTC", "currency": "USD", "amount": "41000.00" },
            { "base": "XRP", "currency": "USD", "amount": "0.52" }
        ]
    });

    let quotes = normalize_spot_prices(&body, &["btc", "BCH", "ETH", "LTC"]).expect("normalize");
    let symbols: Vec<&str> = quotes.iter().map(|q| q.asset.as_str()).collect();
    assert_eq!(symbols, vec!["ETH", "BTC"]);
    assert_eq!(quotes[0].amount, 3100.25);
    assert_eq!(quotes[1].currency, "USD");
}

#[test]
fn spot_entry_without_base_is_dropped() {
    let body = json!({
        "data": [
            { "currency": "USD", "amount": "1.0" },
            { "base": 42, "currency": "USD", "amount": "2.0" },
            { "base": "BTC", "currency": "USD", "amount": "41000.00" }
        ]
    });
    let quotes = normalize_spot_prices(&body, &["BTC"]).expect("normalize");
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].asset, "BTC");
    assert_eq!(quotes[0].amount, 41_000.0);
}

#[test]
fn deserialized_history_is_sorted_and_finite() {
    let history: PriceHistory = serde_json::from_value(json!([
        { "price": 100.0, "time": "2024-01-02T00:00:00Z" },
        { "price": 90.0, "time": "2024-01-01T00:00:00Z" }
    ]))
    .expect("decode");
    let prices: Vec<f64> = history.iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![90.0, 100.0]);

    let encoded = serde_json::to_value(&history).expect("encode");
    assert_eq!(encoded.as_array().map(Vec::len), Some(2));
    assert_eq!(encoded[0]["price"], json!(90.0));
}

#[test]
fn unsupported_entry_with_broken_amount_is_ignored() {
    let body = json!({
        "data": [
            { "base": "DOGE", "currency": "USD", "amount": "n/a" },
            { "base": "LTC", "currency": "USD", "amount": 70.5 }
        ]
    });
    let quotes = normalize_spot_prices(&body, &["LTC"]).expect("normalize");
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].amount, 70.5);
}
