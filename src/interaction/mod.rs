use std::sync::Arc;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::api::Snapshot;
use crate::core::{ChartGeometry, PriceHistory, PricePoint, Viewport};
use crate::format::{format_currency, format_hover_time};

/// Hover cursor exposed to the host: raw pointer x plus the resolved sample.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HoverState {
    pub visible: bool,
    pub x: f64,
    pub y: f64,
    pub index: Option<usize>,
    pub point: Option<PricePoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverLabels {
    pub price: String,
    pub time: String,
}

impl HoverState {
    /// Formats the hovered sample for the top (price) and bottom (time) boxes.
    #[must_use]
    pub fn labels(&self, currency_code: &str, offset: FixedOffset) -> Option<HoverLabels> {
        let point = self.point.filter(|_| self.visible)?;
        Some(HoverLabels {
            price: format_currency(point.price, currency_code),
            time: format_hover_time(point.time, offset),
        })
    }
}

#[derive(Debug, Clone)]
struct GeometryKey {
    viewport: Viewport,
    history: PriceHistory,
}

impl GeometryKey {
    fn matches(&self, viewport: Viewport, history: &PriceHistory) -> bool {
        self.viewport == viewport && self.history.ptr_eq(history)
    }
}

/// Pointer and resize listener for the price chart.
///
/// Keeps chart geometry cached per (container size, history) and checks that
/// key on every pointer query, so a query issued after a resize is always
/// answered with geometry for the new size. Events are ignored unless the
/// tracker is attached.
#[derive(Debug, Clone)]
pub struct HoverTracker {
    attached: bool,
    viewport: Viewport,
    top_padding_px: f64,
    snapshot: Option<Arc<Snapshot>>,
    cache: Option<(GeometryKey, Option<ChartGeometry>)>,
    geometry_revision: u64,
    hover: HoverState,
}

impl HoverTracker {
    /// Creates a detached tracker; call [`Self::attach`] to start listening.
    #[must_use]
    pub fn new(viewport: Viewport, top_padding_px: f64) -> Self {
        Self {
            attached: false,
            viewport,
            top_padding_px,
            snapshot: None,
            cache: None,
            geometry_revision: 0,
            hover: HoverState::default(),
        }
    }

    pub fn attach(&mut self) {
        self.attached = true;
    }

    /// Stops listening and drops data and geometry.
    pub fn detach(&mut self) {
        self.attached = false;
        self.snapshot = None;
        self.cache = None;
        self.hover = HoverState::default();
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn hover(&self) -> HoverState {
        self.hover
    }

    /// Number of geometry recomputations so far.
    #[must_use]
    pub fn geometry_revision(&self) -> u64 {
        self.geometry_revision
    }

    pub fn on_resize(&mut self, viewport: Viewport) {
        if !self.attached || viewport == self.viewport {
            return;
        }
        trace!(width = viewport.width, height = viewport.height, "chart resized");
        self.viewport = viewport;
        self.cache = None;
    }

    pub fn on_snapshot(&mut self, snapshot: Arc<Snapshot>) {
        if !self.attached {
            return;
        }
        self.snapshot = Some(snapshot);
        self.cache = None;
    }

    /// Resolves the sample under `pointer_x` and positions the cursor on it.
    ///
    /// Returns `None` (and hides the cursor) while there is no data to hover.
    pub fn on_pointer_move(&mut self, pointer_x: f64) -> Option<HoverState> {
        if !self.attached {
            return None;
        }

        let Some(geometry) = self.geometry() else {
            self.hover = HoverState::default();
            return None;
        };
        let history = &self.snapshot.as_ref()?.price_history;
        let index = geometry.index_at(pointer_x, history.len())?;
        let point = *history.get(index)?;

        self.hover = HoverState {
            visible: true,
            x: pointer_x,
            y: geometry.price_to_pixel(point.price),
            index: Some(index),
            point: Some(point),
        };
        Some(self.hover)
    }

    pub fn on_pointer_leave(&mut self) {
        if !self.attached {
            return;
        }
        self.hover.visible = false;
    }

    /// Geometry for the current container size and data, recomputed when
    /// either changed since the last call.
    pub fn geometry(&mut self) -> Option<ChartGeometry> {
        let history = self.snapshot.as_ref()?.price_history.clone();
        if let Some((key, geometry)) = &self.cache {
            if key.matches(self.viewport, &history) {
                return *geometry;
            }
        }

        let geometry = ChartGeometry::compute(self.viewport, &history, self.top_padding_px);
        self.geometry_revision += 1;
        trace!(
            revision = self.geometry_revision,
            width = self.viewport.width,
            height = self.viewport.height,
            samples = history.len(),
            "recomputed chart geometry"
        );
        self.cache = Some((
            GeometryKey {
                viewport: self.viewport,
                history,
            },
            geometry,
        ));
        geometry
    }
}
