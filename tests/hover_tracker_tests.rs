use std::sync::Arc;

use chrono::{FixedOffset, TimeZone, Utc};
use price_dashboard::api::{Selection, Snapshot, SpotQuote};
use price_dashboard::core::{PriceHistory, PricePoint, Viewport};
use price_dashboard::interaction::HoverTracker;

fn snapshot(prices: &[f64]) -> Arc<Snapshot> {
    let points = prices
        .iter()
        .enumerate()
        .map(|(index, price)| {
            let time = Utc
                .timestamp_opt(1_704_067_200 + index as i64 * 3_600, 0)
                .single()
                .expect("valid time");
            PricePoint::new(*price, time)
        })
        .collect();
    Arc::new(Snapshot {
        price_history: PriceHistory::new(points),
        spot_quotes: vec![SpotQuote {
            asset: "BTC".to_owned(),
            currency: "USD".to_owned(),
            amount: prices.last().copied().unwrap_or_default(),
        }],
        selection: Selection::new(0, 2),
        asset: "BTC".to_owned(),
        fetched_at: Utc::now(),
        sequence: 1,
    })
}

fn attached_tracker(width: u32, height: u32) -> HoverTracker {
    let mut tracker = HoverTracker::new(Viewport::new(width, height), 20.0);
    tracker.attach();
    tracker
}

#[test]
fn pointer_resolves_sample_and_vertical_position() {
    let mut tracker = attached_tracker(800, 420);
    tracker.on_snapshot(snapshot(&[100.0, 300.0, 200.0, 150.0, 250.0]));

    let hover = tracker.on_pointer_move(200.0).expect("hover");
    assert!(hover.visible);
    assert_eq!(hover.index, Some(1));
    assert_eq!(hover.x, 200.0);
    assert_eq!(hover.point.expect("point").price, 300.0);
    assert_eq!(hover.y, 20.0);

    let hover = tracker.on_pointer_move(0.0).expect("hover");
    assert_eq!(hover.y, 420.0);
}

#[test]
fn resize_before_pointer_query_uses_new_width() {
    let mut tracker = attached_tracker(800, 300);
    tracker.on_snapshot(snapshot(&[1.0, 2.0, 3.0, 4.0, 5.0]));

    let before = tracker.on_pointer_move(400.0).expect("hover");
    assert_eq!(before.index, Some(2));
    let revision = tracker.geometry_revision();

    tracker.on_resize(Viewport::new(400, 300));
    let after = tracker.on_pointer_move(400.0).expect("hover");
    assert_eq!(after.index, Some(4));
    assert_eq!(tracker.geometry_revision(), revision + 1);
    assert_eq!(tracker.geometry().expect("geometry").width_px, 400.0);
}

#[test]
fn geometry_is_reused_until_inputs_change() {
    let mut tracker = attached_tracker(800, 300);
    tracker.on_snapshot(snapshot(&[1.0, 2.0]));

    tracker.on_pointer_move(10.0);
    tracker.on_pointer_move(20.0);
    tracker.on_resize(Viewport::new(800, 300));
    tracker.on_pointer_move(30.0);
    assert_eq!(tracker.geometry_revision(), 1);

    tracker.on_snapshot(snapshot(&[1.0, 2.0]));
    tracker.on_pointer_move(30.0);
    assert_eq!(tracker.geometry_revision(), 2);
}

#[test]
fn empty_history_hides_cursor() {
    let mut tracker = attached_tracker(800, 300);
    assert!(tracker.on_pointer_move(100.0).is_none());

    tracker.on_snapshot(snapshot(&[]));
    assert!(tracker.on_pointer_move(100.0).is_none());
    assert!(!tracker.hover().visible);
}

#[test]
fn pointer_leave_hides_cursor() {
    let mut tracker = attached_tracker(800, 300);
    tracker.on_snapshot(snapshot(&[10.0, 20.0]));
    tracker.on_pointer_move(799.0).expect("hover");

    tracker.on_pointer_leave();
    assert!(!tracker.hover().visible);
    let offset = FixedOffset::east_opt(0).expect("offset");
    assert!(tracker.hover().labels("usd", offset).is_none());
}

#[test]
fn hover_labels_format_price_and_time() {
    let mut tracker = attached_tracker(800, 300);
    tracker.on_snapshot(snapshot(&[41_000.0, 42_500.5]));
    let hover = tracker.on_pointer_move(800.0).expect("hover");

    let offset = FixedOffset::east_opt(0).expect("offset");
    let labels = hover.labels("usd", offset).expect("labels");
    assert_eq!(labels.price, "$42,500.50");
    assert_eq!(labels.time, "1/1/2024, 1:00:00 AM");
}

#[test]
fn detached_tracker_ignores_events() {
    let mut tracker = HoverTracker::new(Viewport::new(800, 300), 20.0);
    tracker.on_snapshot(snapshot(&[1.0, 2.0]));
    tracker.on_resize(Viewport::new(400, 300));
    assert!(tracker.on_pointer_move(100.0).is_none());
    assert_eq!(tracker.viewport(), Viewport::new(800, 300));

    tracker.attach();
    tracker.on_snapshot(snapshot(&[1.0, 2.0]));
    assert!(tracker.on_pointer_move(100.0).is_some());

    tracker.detach();
    assert!(!tracker.is_attached());
    assert!(tracker.geometry().is_none());
    assert!(tracker.on_pointer_move(100.0).is_none());
}
