//! Check-in Dashboard
//!
//! Ties the data loader, the playback controller and the view projection
//! together.
//!
//! ## Data Flow
//!
//! 1. The runtime issues three independent fetches (stats, weekly timeline,
//!    geo check-ins); each result fills its own [`Panel`]
//! 2. Play/pause/reset intents drive the playback state machine
//! 3. Ticks from the single active tick source advance the playback index
//! 4. Every frame renders from [`DashboardState`], deriving the visible
//!    check-ins on demand

mod event;
mod runtime;
mod state;

pub use event::{DashboardEvent, Intent, Payload};
pub use runtime::{Dashboard, DashboardHandle};
pub use state::{Action, DashboardState, Panel};
