use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::error::{DashboardError, DashboardResult};

use super::{DashboardConfig, FetchedData, Selection, Snapshot};

/// Fetch lifecycle state of the refresh controller.
///
/// `Error` holds after the latest fetch failed, until the next tick or
/// selection change issues a retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefreshState {
    Idle,
    Fetching,
    Error,
}

/// Concrete pricing-service parameters resolved from a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub asset: String,
    pub currency: String,
    pub duration_key: String,
}

/// Handle for one issued fetch cycle.
///
/// Captures the selection at issue time; completion compares it against the
/// controller's selection at that later moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub sequence: u64,
    pub selection: Selection,
    pub request: FetchRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    /// The user picked something else while the fetch was in flight.
    SelectionChanged {
        requested: Selection,
        current: Selection,
    },
    /// A later fetch for the same selection already published or is pending.
    Superseded { sequence: u64, newer_sequence: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Published(Arc<Snapshot>),
    Discarded(StaleReason),
    Failed(DashboardError),
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RefreshStats {
    pub issued: u64,
    pub published: u64,
    pub discarded: u64,
    pub failed: u64,
    pub skipped_ticks: u64,
}

/// Owner of the current selection and the last published snapshot.
///
/// The controller never awaits anything. Entry points hand out
/// [`FetchTicket`]s, the caller performs the fetch, and [`Self::complete`]
/// decides whether the result is published, discarded as stale, or recorded
/// as a failure that keeps the previous snapshot.
#[derive(Debug)]
pub struct RefreshController {
    config: DashboardConfig,
    selection: Selection,
    state: RefreshState,
    snapshot: Option<Arc<Snapshot>>,
    next_sequence: u64,
    pending_sequence: Option<u64>,
    published_sequence: Option<u64>,
    last_error: Option<DashboardError>,
    started: bool,
    alive: bool,
    stats: RefreshStats,
}

impl RefreshController {
    pub fn new(config: DashboardConfig) -> DashboardResult<Self> {
        let config = config.validate()?;
        let selection = config.initial_selection;
        Ok(Self {
            config,
            selection,
            state: RefreshState::Idle,
            snapshot: None,
            next_sequence: 0,
            pending_sequence: None,
            published_sequence: None,
            last_error: None,
            started: false,
            alive: true,
            stats: RefreshStats::default(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    #[must_use]
    pub fn state(&self) -> RefreshState {
        self.state
    }

    /// Last published snapshot, if any cycle has succeeded yet.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.clone()
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&DashboardError> {
        self.last_error.as_ref()
    }

    #[must_use]
    pub fn stats(&self) -> RefreshStats {
        self.stats
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Issues the initial fetch. Later calls return `None`.
    pub fn start(&mut self) -> Option<FetchTicket> {
        if !self.alive || self.started {
            return None;
        }
        self.started = true;
        info!(
            asset_index = self.selection.asset_index,
            duration_index = self.selection.duration_index,
            "refresh controller started"
        );
        self.issue()
    }

    /// Stores a user selection and issues a fetch for it, even while another
    /// fetch is still outstanding. Re-selecting the current selection is a
    /// no-op.
    pub fn on_selection_change(
        &mut self,
        selection: Selection,
    ) -> DashboardResult<Option<FetchTicket>> {
        if !self.alive {
            return Ok(None);
        }
        self.config.check_selection(selection)?;
        if selection == self.selection {
            trace!(?selection, "selection unchanged");
            return Ok(None);
        }

        debug!(from = ?self.selection, to = ?selection, "selection changed");
        self.selection = selection;
        self.started = true;
        Ok(self.issue())
    }

    /// Issues a poll fetch unless one is already outstanding.
    pub fn on_timer_tick(&mut self) -> Option<FetchTicket> {
        if !self.alive {
            return None;
        }
        if self.state == RefreshState::Fetching {
            self.stats.skipped_ticks += 1;
            trace!(
                pending_sequence = ?self.pending_sequence,
                skipped_ticks = self.stats.skipped_ticks,
                "timer tick skipped while fetching"
            );
            return None;
        }
        self.issue()
    }

    /// Applies the result of the fetch described by `ticket`.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: DashboardResult<FetchedData>,
    ) -> FetchOutcome {
        if !self.alive {
            trace!(sequence = ticket.sequence, "ignoring completion after shutdown");
            return FetchOutcome::Shutdown;
        }

        if let Some(reason) = self.stale_reason(ticket) {
            self.stats.discarded += 1;
            debug!(sequence = ticket.sequence, ?reason, "discarding stale fetch result");
            return FetchOutcome::Discarded(reason);
        }

        let is_latest = self.pending_sequence == Some(ticket.sequence);
        match result {
            Ok(data) => {
                if is_latest {
                    self.pending_sequence = None;
                    self.transition(RefreshState::Idle);
                }
                let snapshot = Arc::new(self.build_snapshot(ticket, data));
                self.snapshot = Some(Arc::clone(&snapshot));
                self.published_sequence = Some(ticket.sequence);
                self.last_error = None;
                self.stats.published += 1;
                debug!(
                    sequence = ticket.sequence,
                    asset = %snapshot.asset,
                    history_len = snapshot.price_history.len(),
                    quotes = snapshot.spot_quotes.len(),
                    "published snapshot"
                );
                FetchOutcome::Published(snapshot)
            }
            Err(err) if is_latest => {
                self.pending_sequence = None;
                self.transition(RefreshState::Error);
                warn!(
                    sequence = ticket.sequence,
                    asset = %ticket.request.asset,
                    duration = %ticket.request.duration_key,
                    error = %err,
                    "price fetch failed; keeping previous snapshot"
                );
                self.stats.failed += 1;
                self.last_error = Some(err.clone());
                FetchOutcome::Failed(err)
            }
            Err(err) => {
                let newer_sequence = self.pending_sequence.unwrap_or(ticket.sequence);
                self.stats.discarded += 1;
                debug!(
                    sequence = ticket.sequence,
                    newer_sequence,
                    error = %err,
                    "ignoring failure of superseded fetch"
                );
                FetchOutcome::Discarded(StaleReason::Superseded {
                    sequence: ticket.sequence,
                    newer_sequence,
                })
            }
        }
    }

    /// Stops the controller. Every later call is a no-op and late
    /// completions never touch the snapshot.
    pub fn shutdown(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.pending_sequence = None;
        self.state = RefreshState::Idle;
        info!(
            published = self.stats.published,
            failed = self.stats.failed,
            discarded = self.stats.discarded,
            "refresh controller shut down"
        );
    }

    fn stale_reason(&self, ticket: &FetchTicket) -> Option<StaleReason> {
        if ticket.selection != self.selection {
            return Some(StaleReason::SelectionChanged {
                requested: ticket.selection,
                current: self.selection,
            });
        }
        match self.published_sequence {
            Some(published) if ticket.sequence <= published => Some(StaleReason::Superseded {
                sequence: ticket.sequence,
                newer_sequence: published,
            }),
            _ => None,
        }
    }

    fn issue(&mut self) -> Option<FetchTicket> {
        let request = self.resolve_request(self.selection)?;
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.pending_sequence = Some(sequence);
        self.stats.issued += 1;
        self.transition(RefreshState::Fetching);
        debug!(
            sequence,
            asset = %request.asset,
            currency = %request.currency,
            duration = %request.duration_key,
            "issuing price fetch"
        );
        Some(FetchTicket {
            sequence,
            selection: self.selection,
            request,
        })
    }

    fn resolve_request(&self, selection: Selection) -> Option<FetchRequest> {
        let asset = self.config.asset(selection.asset_index)?;
        let duration = self.config.duration(selection.duration_index)?;
        Some(FetchRequest {
            asset: asset.symbol.clone(),
            currency: self.config.currency.clone(),
            duration_key: duration.key.clone(),
        })
    }

    fn build_snapshot(&self, ticket: &FetchTicket, data: FetchedData) -> Snapshot {
        let snapshot = Snapshot {
            price_history: data.price_history,
            spot_quotes: data.spot_quotes,
            selection: ticket.selection,
            asset: ticket.request.asset.clone(),
            fetched_at: Utc::now(),
            sequence: ticket.sequence,
        };
        if snapshot.selected_spot().is_none() {
            warn!(
                asset = %snapshot.asset,
                "spot response has no quote for the selected asset"
            );
        }
        snapshot
    }

    fn transition(&mut self, next: RefreshState) {
        if self.state != next {
            trace!(from = ?self.state, to = ?next, "refresh state transition");
            self.state = next;
        }
    }
}
