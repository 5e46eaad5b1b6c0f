//! Playback Controller
//!
//! Replays check-ins in order, revealing one per tick.
//!
//! ## Architecture
//!
//! - **State**: pure reducer over `(index, status)` producing tick effects
//! - **Ticker**: the cancellable task that produces ticks
//!
//! The runtime owning both applies each [`Effect`] to the [`Ticker`] right
//! after the transition, and drops ticks the ticker no longer
//! [accepts](Ticker::accepts).

mod state;
mod ticker;

pub use state::{Command, Effect, PlaybackState, PlaybackStatus};
pub use ticker::{Tick, Ticker, MIN_TICK_INTERVAL};

/// Default tick period
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;
