//! Dashboard Runtime
//!
//! A single task owns the [`DashboardState`] and the tick source. Fetch
//! results, ticks and user intents all arrive on one channel and are applied
//! in arrival order, so no locking is needed.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use super::event::{DashboardEvent, Intent, Payload};
use super::state::{Action, DashboardState};
use crate::api::CheckinSource;
use crate::playback::Ticker;

/// Sends user intents into a running dashboard
#[derive(Debug, Clone)]
pub struct DashboardHandle {
    tx: mpsc::UnboundedSender<DashboardEvent>,
}

impl DashboardHandle {
    /// Send an intent; returns false once the dashboard has stopped
    pub fn send(&self, intent: Intent) -> bool {
        self.tx.send(DashboardEvent::Intent(intent)).is_ok()
    }

    pub fn toggle(&self) -> bool {
        self.send(Intent::TogglePlay)
    }

    pub fn reset(&self) -> bool {
        self.send(Intent::Reset)
    }

    pub fn reload(&self) -> bool {
        self.send(Intent::Reload)
    }

    pub fn quit(&self) -> bool {
        self.send(Intent::Quit)
    }
}

/// The dashboard event loop
pub struct Dashboard {
    source: Arc<dyn CheckinSource>,
    state: DashboardState,
    ticker: Ticker<DashboardEvent>,
    tx: mpsc::UnboundedSender<DashboardEvent>,
    rx: mpsc::UnboundedReceiver<DashboardEvent>,
}

impl Dashboard {
    /// Create a dashboard reading from `source`, ticking every `tick_interval`
    pub fn new(source: Arc<dyn CheckinSource>, tick_interval: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let ticker = Ticker::new(tick_interval, tx.clone());

        Self {
            source,
            state: DashboardState::new(),
            ticker,
            tx,
            rx,
        }
    }

    /// Handle for sending intents, usable before and during [`run`](Self::run)
    pub fn handle(&self) -> DashboardHandle {
        DashboardHandle {
            tx: self.tx.clone(),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Load the data, then process events until a quit intent
    ///
    /// `on_frame` is called with the initial state and after every applied
    /// event. Returns the final state.
    pub async fn run<F>(mut self, mut on_frame: F) -> DashboardState
    where
        F: FnMut(&DashboardState),
    {
        self.spawn_fetches(self.state.generation());
        on_frame(&self.state);

        while let Some(event) = self.rx.recv().await {
            if let DashboardEvent::Tick(tick) = &event {
                if !self.ticker.accepts(*tick) {
                    tracing::debug!(session = tick.session, "Dropping tick from cancelled session");
                    continue;
                }
            }

            self.log_event(&event);

            let (state, actions) = std::mem::take(&mut self.state).reduce(event);
            self.state = state;

            let mut quit = false;
            for action in actions {
                match action {
                    Action::StartTicker => {
                        let session = self.ticker.start();
                        tracing::info!(
                            session,
                            index = self.state.playback.index(),
                            total = self.state.playback.len(),
                            "Playback started"
                        );
                    }
                    Action::StopTicker => {
                        if self.ticker.is_active() {
                            tracing::info!(
                                index = self.state.playback.index(),
                                status = %self.state.playback.status(),
                                "Playback stopped"
                            );
                        }
                        self.ticker.stop();
                    }
                    Action::Fetch { generation } => self.spawn_fetches(generation),
                    Action::Quit => quit = true,
                }
            }

            on_frame(&self.state);

            if quit {
                break;
            }
        }

        self.ticker.stop();
        self.state
    }

    fn log_event(&self, event: &DashboardEvent) {
        match event {
            DashboardEvent::Loaded {
                generation,
                payload,
            } => {
                if *generation != self.state.generation() {
                    tracing::debug!(
                        generation,
                        current = self.state.generation(),
                        panel = payload.panel(),
                        "Discarding stale load result"
                    );
                    return;
                }
                match payload {
                    Payload::Stats(Err(e)) | Payload::Timeline(Err(e)) | Payload::Checkins(Err(e)) => {
                        tracing::warn!(
                            panel = payload.panel(),
                            error_code = e.code(),
                            error = %e,
                            "Panel failed to load"
                        );
                    }
                    Payload::Checkins(Ok(checkins)) => {
                        tracing::info!(count = checkins.len(), "Check-ins loaded");
                    }
                    Payload::Timeline(Ok(weeks)) => {
                        tracing::info!(weeks = weeks.len(), "Weekly timeline loaded");
                    }
                    Payload::Stats(Ok(_)) => tracing::info!("Summary stats loaded"),
                }
            }
            DashboardEvent::Tick(tick) => {
                tracing::debug!(session = tick.session, index = self.state.playback.index(), "Tick");
            }
            DashboardEvent::Intent(intent) => tracing::debug!(?intent, "User intent"),
        }
    }

    /// Issue the three independent fetches for a load generation
    fn spawn_fetches(&self, generation: u64) {
        tracing::info!(generation, "Loading dashboard data");

        let source = Arc::clone(&self.source);
        self.spawn_load(generation, async move { Payload::Stats(source.fetch_stats().await) });

        let source = Arc::clone(&self.source);
        self.spawn_load(generation, async move {
            Payload::Timeline(source.fetch_weekly_timeline().await)
        });

        let source = Arc::clone(&self.source);
        self.spawn_load(generation, async move {
            Payload::Checkins(source.fetch_geo_checkins().await)
        });
    }

    fn spawn_load<F>(&self, generation: u64, load: F)
    where
        F: Future<Output = Payload> + Send + 'static,
    {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let payload = load.await;
            // The receiver is gone only after the loop has exited
            let _ = tx.send(DashboardEvent::Loaded {
                generation,
                payload,
            });
        });
    }
}
