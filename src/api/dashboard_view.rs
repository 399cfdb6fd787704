use serde::{Deserialize, Serialize};

use crate::core::Trend;
use crate::format::{format_currency, format_signed_currency, format_signed_percent};

use super::{DashboardConfig, Selection, Snapshot};

/// One value of the price table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    pub label: String,
    pub value: f64,
    pub text: String,
    pub show_plus: bool,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetTab {
    pub symbol: String,
    pub name: String,
    /// Formatted spot price, empty until a quote is known.
    pub price_text: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationTab {
    pub codename: String,
    pub selected: bool,
}

/// Everything the dashboard shows besides the chart, derived from one
/// snapshot.
///
/// Tabs follow the live `selection`. The table and title follow the
/// snapshot's own selection, so they never pair one asset's label with
/// another asset's numbers while a new fetch is pending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub title: String,
    pub asset_tabs: Vec<AssetTab>,
    pub duration_tabs: Vec<DurationTab>,
    pub spot: TableCell,
    pub delta: TableCell,
    pub delta_percent: TableCell,
    pub trend: Trend,
    pub fill_color: Option<String>,
    pub stroke_color: Option<String>,
}

impl DashboardView {
    #[must_use]
    pub fn build(
        config: &DashboardConfig,
        selection: Selection,
        snapshot: Option<&Snapshot>,
    ) -> Self {
        let currency = config.currency.as_str();
        let shown = snapshot.map_or(selection, |s| s.selection);
        let asset = config.asset(shown.asset_index);
        let symbol = asset.map_or("", |a| a.symbol.as_str());
        let asset_name = asset.map_or("", |a| a.name.as_str());
        let duration_label = config
            .duration(shown.duration_index)
            .map_or("", |d| d.humanize.as_str());

        let spot_amount = snapshot
            .and_then(|s| s.selected_spot())
            .map(|quote| quote.amount);
        let trend = snapshot.map_or(Trend::ZERO, Snapshot::trend);

        let asset_tabs = config
            .assets
            .iter()
            .enumerate()
            .map(|(index, asset)| AssetTab {
                symbol: asset.symbol.clone(),
                name: asset.name.clone(),
                price_text: snapshot
                    .and_then(|s| s.spot_for(&asset.symbol))
                    .map(|quote| format_currency(quote.amount, currency))
                    .unwrap_or_default(),
                selected: index == selection.asset_index,
            })
            .collect();

        let duration_tabs = config
            .durations
            .iter()
            .enumerate()
            .map(|(index, duration)| DurationTab {
                codename: duration.codename.clone(),
                selected: index == selection.duration_index,
            })
            .collect();

        let spot_value = spot_amount.unwrap_or(0.0);
        let title = match spot_amount {
            Some(amount) => format!(
                "{}: {}",
                symbol.to_ascii_uppercase(),
                format_currency(amount, currency)
            ),
            None => symbol.to_ascii_uppercase(),
        };

        Self {
            title,
            asset_tabs,
            duration_tabs,
            spot: TableCell {
                label: format!("{asset_name} price"),
                value: spot_value,
                text: format_currency(spot_value, currency),
                show_plus: false,
                visible: true,
            },
            delta: TableCell {
                label: format!("{duration_label} ({currency})"),
                value: trend.absolute_delta,
                text: format_signed_currency(trend.absolute_delta, currency),
                show_plus: trend.absolute_delta > 0.0,
                visible: !duration_label.is_empty(),
            },
            delta_percent: TableCell {
                label: format!("{duration_label} (%)"),
                value: trend.percent_delta,
                text: format_signed_percent(trend.percent_delta),
                show_plus: trend.percent_delta > 0.0,
                visible: !duration_label.is_empty(),
            },
            trend,
            fill_color: asset.and_then(|a| a.fill_color.clone()),
            stroke_color: asset.and_then(|a| a.stroke_color.clone()),
        }
    }
}
