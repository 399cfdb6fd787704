use std::time::Duration;

use price_dashboard::api::{DashboardConfig, Selection};
use price_dashboard::error::DashboardError;

#[test]
fn default_config_matches_dashboard_layout() {
    let config = DashboardConfig::default();
    let symbols = config.supported_symbols();
    assert_eq!(symbols, vec!["BTC", "BCH", "ETH", "LTC"]);

    let keys: Vec<&str> = config.durations.iter().map(|d| d.key.as_str()).collect();
    assert_eq!(keys, vec!["hour", "day", "week", "month", "year"]);
    assert_eq!(config.currency, "usd");
    assert_eq!(config.initial_selection, Selection::new(0, 2));
    assert_eq!(config.chart_top_padding_px, 20.0);
    assert_eq!(config.poll_interval(), Duration::from_secs(10));
    assert!(config.clone().validate().is_ok());
}

#[test]
fn json_config_fills_missing_fields_with_defaults() {
    let config = DashboardConfig::from_json_str(
        r#"{
            "currency": "eur",
            "poll_interval_ms": 2500,
            "initial_selection": { "asset_index": 2, "duration_index": 0 }
        }"#,
    )
    .expect("config");

    assert_eq!(config.currency, "eur");
    assert_eq!(config.poll_interval(), Duration::from_millis(2_500));
    assert_eq!(config.initial_selection, Selection::new(2, 0));
    assert_eq!(config.assets.len(), 4);
    assert_eq!(config.request_timeout(), Duration::from_secs(12));
}

#[test]
fn json_round_trip_preserves_config() {
    let config = DashboardConfig::default().with_currency("gbp");
    let text = config.to_json_pretty().expect("serialize");
    let parsed = DashboardConfig::from_json_str(&text).expect("parse");
    assert_eq!(parsed, config);
}

#[test]
fn malformed_json_is_invalid_config() {
    let err = DashboardConfig::from_json_str("{ not json").expect_err("parse failure");
    assert!(matches!(err, DashboardError::InvalidConfig(_)));
}

#[test]
fn validation_rejects_unusable_values() {
    let empty_assets = DashboardConfig {
        assets: Vec::new(),
        ..DashboardConfig::default()
    };
    assert!(matches!(
        empty_assets.validate(),
        Err(DashboardError::InvalidConfig(_))
    ));

    let zero_interval = DashboardConfig {
        poll_interval_ms: 0,
        ..DashboardConfig::default()
    };
    assert!(zero_interval.validate().is_err());

    let negative_padding = DashboardConfig {
        chart_top_padding_px: -1.0,
        ..DashboardConfig::default()
    };
    assert!(negative_padding.validate().is_err());

    let blank_currency = DashboardConfig::default().with_currency("  ");
    assert!(blank_currency.validate().is_err());
}

#[test]
fn initial_selection_must_be_in_range() {
    let config = DashboardConfig::default().with_initial_selection(Selection::new(0, 5));
    assert_eq!(
        config.validate(),
        Err(DashboardError::InvalidSelection {
            asset_index: 0,
            duration_index: 5,
        })
    );
}

#[test]
fn endpoints_drop_trailing_slash() {
    let config =
        DashboardConfig::default().with_endpoints("http://localhost:8080/", "http://spot/v2/");
    assert_eq!(config.history_base_url, "http://localhost:8080");
    assert_eq!(config.spot_base_url, "http://spot/v2");
}
