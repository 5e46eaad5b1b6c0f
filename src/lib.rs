//! # Swarm Insights
//!
//! A terminal dashboard for check-in history. It loads summary statistics,
//! a weekly activity timeline and the list of geo-tagged check-ins from a
//! stats API, then replays the check-ins one by one like a time machine.
//!
//! ## Modules
//!
//! - [`api`]: HTTP client for the stats API
//! - [`playback`]: Playback state machine and tick source
//! - [`view`]: Derived values (visible prefix, year, marker styles)
//! - [`dashboard`]: State record, events and the event loop
//! - [`render`]: Text presentation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use swarm_insights::{ApiClient, ApiClientConfig, Dashboard, PlaybackStatus};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(ApiClientConfig::default())?;
//!     let dashboard = Dashboard::new(Arc::new(client), Duration::from_millis(100));
//!
//!     let handle = dashboard.handle();
//!     let mut started = false;
//!
//!     let state = dashboard
//!         .run(|state| {
//!             if !started && state.checkins.ready().is_some() {
//!                 started = true;
//!                 handle.toggle();
//!             } else if state.playback.status() == PlaybackStatus::Finished
//!                 || state.checkins.error().is_some()
//!             {
//!                 handle.quit();
//!             }
//!         })
//!         .await;
//!
//!     println!("Replayed {} check-ins", state.visible_points().len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod model;
pub mod playback;
pub mod render;
pub mod telemetry;
pub mod view;

// Re-export top-level types for convenience
pub use api::{ApiClient, ApiClientConfig, CheckinSource, FetchError, FetchResult};

pub use config::{Config, ConfigError, LoggingConfig, PlaybackConfig};

pub use dashboard::{Dashboard, DashboardEvent, DashboardHandle, DashboardState, Intent, Panel};

pub use model::{GeoCheckin, SummaryStats, ValidationError, WeeklyBucket};

pub use playback::{Command, Effect, PlaybackState, PlaybackStatus, Tick, Ticker};

pub use render::{render_frame, RenderOptions};
