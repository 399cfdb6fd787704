use std::sync::Arc;

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::error::DashboardResult;

use super::{
    DashboardConfig, FetchOutcome, FetchTicket, FetchedData, PollTimer, PriceDataSource,
    RefreshController, RefreshStats, Selection, Snapshot,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SelectionChanged(Selection),
    Shutdown,
}

/// Cloneable sender for UI events into a running [`RefreshService`].
#[derive(Debug, Clone)]
pub struct RefreshHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl RefreshHandle {
    /// Forwards a selection change. Returns `false` once the service stopped.
    pub fn select(&self, selection: Selection) -> bool {
        self.commands.send(Command::SelectionChanged(selection)).is_ok()
    }

    /// Asks the service to stop. Dropping every handle has the same effect.
    pub fn shutdown(&self) -> bool {
        self.commands.send(Command::Shutdown).is_ok()
    }
}

/// Async driver around a [`RefreshController`].
///
/// Runs on one thread: fetch cycles are polled inside the service's own
/// future, never spawned, so the data source does not need to be `Send`.
/// Published snapshots are broadcast through a `watch` channel, which hands
/// readers whole `Arc<Snapshot>` values only.
pub struct RefreshService<S, T> {
    controller: RefreshController,
    source: S,
    timer: T,
    commands: mpsc::UnboundedReceiver<Command>,
    snapshots: watch::Sender<Option<Arc<Snapshot>>>,
}

impl<S: PriceDataSource, T: PollTimer> RefreshService<S, T> {
    pub fn new(
        config: DashboardConfig,
        source: S,
        timer: T,
    ) -> DashboardResult<(Self, RefreshHandle)> {
        let controller = RefreshController::new(config)?;
        let (commands_tx, commands) = mpsc::unbounded_channel();
        let (snapshots, _) = watch::channel(None);
        Ok((
            Self {
                controller,
                source,
                timer,
                commands,
                snapshots,
            },
            RefreshHandle {
                commands: commands_tx,
            },
        ))
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Snapshot>>> {
        self.snapshots.subscribe()
    }

    #[must_use]
    pub fn controller(&self) -> &RefreshController {
        &self.controller
    }

    /// Drives fetches until shutdown is requested or every handle is dropped.
    ///
    /// Returns the controller's counters. Fetches still in flight at that
    /// point are dropped without publishing.
    pub async fn run(self) -> RefreshStats {
        let Self {
            mut controller,
            source,
            mut timer,
            mut commands,
            snapshots,
        } = self;

        let mut pending = FuturesUnordered::new();
        if let Some(ticket) = controller.start() {
            pending.push(run_cycle(&source, ticket));
        }

        loop {
            tokio::select! {
                biased;

                command = commands.recv() => match command {
                    Some(Command::SelectionChanged(selection)) => {
                        match controller.on_selection_change(selection) {
                            Ok(Some(ticket)) => pending.push(run_cycle(&source, ticket)),
                            Ok(None) => {}
                            Err(err) => warn!(error = %err, "rejected selection change"),
                        }
                    }
                    Some(Command::Shutdown) | None => break,
                },

                Some((ticket, result)) = pending.next(), if !pending.is_empty() => {
                    if let FetchOutcome::Published(snapshot) = controller.complete(&ticket, result) {
                        snapshots.send_replace(Some(snapshot));
                    }
                }

                () = timer.tick() => {
                    if let Some(ticket) = controller.on_timer_tick() {
                        pending.push(run_cycle(&source, ticket));
                    }
                }
            }
        }

        debug!(in_flight = pending.len(), "dropping in-flight fetches");
        drop(pending);
        controller.shutdown();
        info!("refresh service stopped");
        controller.stats()
    }
}

/// Fetches history and spot quotes for one ticket concurrently.
async fn run_cycle<S: PriceDataSource>(
    source: &S,
    ticket: FetchTicket,
) -> (FetchTicket, DashboardResult<FetchedData>) {
    let request = &ticket.request;
    let result = tokio::try_join!(
        source.fetch_price_history(&request.asset, &request.currency, &request.duration_key),
        source.fetch_spot_prices(&request.currency),
    )
    .map(|(price_history, spot_quotes)| FetchedData {
        price_history,
        spot_quotes,
    });
    (ticket, result)
}
