//! Tick Source
//!
//! A cancellable background task that emits one [`Tick`] per period into the
//! owner's event channel. At most one task is alive per `Ticker`.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Smallest period accepted by [`Ticker::new`]
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// One elapsed period of a tick session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Session that produced this tick
    pub session: u64,
}

struct ActiveSession {
    id: u64,
    handle: JoinHandle<()>,
}

/// Owner of the (single) tick task
pub struct Ticker<T> {
    period: Duration,
    tx: mpsc::UnboundedSender<T>,
    active: Option<ActiveSession>,
    next_session: u64,
}

impl<T> Ticker<T>
where
    T: From<Tick> + Send + 'static,
{
    /// Create a stopped ticker that will deliver into `tx`
    pub fn new(period: Duration, tx: mpsc::UnboundedSender<T>) -> Self {
        Self {
            period: period.max(MIN_TICK_INTERVAL),
            tx,
            active: None,
            next_session: 1,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start ticking, returning the session id
    ///
    /// If a session is already running it is kept and its id returned.
    pub fn start(&mut self) -> u64 {
        if let Some(active) = &self.active {
            return active.id;
        }

        let id = self.next_session;
        self.next_session += 1;

        let period = self.period;
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            // First tick after one full period, not immediately
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if tx.send(T::from(Tick { session: id })).is_err() {
                    break;
                }
            }
        });

        tracing::debug!(session = id, period_ms = period.as_millis() as u64, "Tick source started");
        self.active = Some(ActiveSession { id, handle });
        id
    }
}

impl<T> Ticker<T> {
    /// Cancel the running session, if any
    pub fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            active.handle.abort();
            tracing::debug!(session = active.id, "Tick source stopped");
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Id of the running session
    pub fn session(&self) -> Option<u64> {
        self.active.as_ref().map(|a| a.id)
    }

    /// Whether a tick belongs to the running session
    pub fn accepts(&self, tick: Tick) -> bool {
        self.session() == Some(tick.session)
    }
}

impl<T> Drop for Ticker<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(rx: &mut mpsc::UnboundedReceiver<Tick>) -> Vec<Tick> {
        let mut ticks = Vec::new();
        while let Ok(tick) = rx.try_recv() {
            ticks.push(tick);
        }
        ticks
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_at_fixed_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = Ticker::new(Duration::from_millis(100), tx);

        let session = ticker.start();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(drain(&mut rx).is_empty());

        tokio::time::sleep(Duration::from_millis(300)).await;
        let ticks = drain(&mut rx);
        assert_eq!(ticks.len(), 3);
        assert!(ticks.iter().all(|t| t.session == session));
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_twice_keeps_one_session() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = Ticker::new(Duration::from_millis(100), tx);

        let first = ticker.start();
        let second = ticker.start();
        assert_eq!(first, second);

        tokio::time::sleep(Duration::from_millis(450)).await;
        assert_eq!(drain(&mut rx).len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = Ticker::new(Duration::from_millis(100), tx);

        ticker.start();
        tokio::time::sleep(Duration::from_millis(250)).await;
        ticker.stop();
        assert!(!ticker.is_active());
        assert_eq!(drain(&mut rx).len(), 2);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_uses_new_session() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = Ticker::new(Duration::from_millis(100), tx);

        let first = ticker.start();
        ticker.stop();
        let second = ticker.start();
        assert_ne!(first, second);
        assert!(!ticker.accepts(Tick { session: first }));
        assert!(ticker.accepts(Tick { session: second }));

        tokio::time::sleep(Duration::from_millis(150)).await;
        let ticks = drain(&mut rx);
        assert_eq!(ticks, vec![Tick { session: second }]);
    }

    #[test]
    fn test_zero_period_clamped() {
        let (tx, _rx) = mpsc::unbounded_channel::<Tick>();
        let ticker = Ticker::new(Duration::ZERO, tx);
        assert_eq!(ticker.period(), MIN_TICK_INTERVAL);
    }
}
