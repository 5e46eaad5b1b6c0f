//! Dashboard Events
//!
//! Everything that can change dashboard state arrives as a
//! [`DashboardEvent`] on the runtime's channel.

use crate::api::FetchResult;
use crate::model::{GeoCheckin, SummaryStats, WeeklyBucket};
use crate::playback::Tick;

/// User intents emitted by the presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Play,
    Pause,
    /// The play/pause button
    TogglePlay,
    Reset,
    /// Fetch everything again
    Reload,
    Quit,
}

impl Intent {
    /// Parse a line of keyboard input (`p`, `r`, `l`, `q`, ...)
    pub fn from_input(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "" | "p" | "toggle" => Some(Intent::TogglePlay),
            "play" => Some(Intent::Play),
            "pause" => Some(Intent::Pause),
            "r" | "reset" => Some(Intent::Reset),
            "l" | "reload" => Some(Intent::Reload),
            "q" | "quit" | "exit" => Some(Intent::Quit),
            _ => None,
        }
    }
}

/// Result of one of the three fetches
#[derive(Debug, Clone)]
pub enum Payload {
    Stats(FetchResult<SummaryStats>),
    Timeline(FetchResult<Vec<WeeklyBucket>>),
    Checkins(FetchResult<Vec<GeoCheckin>>),
}

impl Payload {
    /// Panel name for logs
    pub fn panel(&self) -> &'static str {
        match self {
            Payload::Stats(_) => "stats",
            Payload::Timeline(_) => "timeline",
            Payload::Checkins(_) => "checkins",
        }
    }
}

/// Input to the dashboard runtime
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    /// A fetch finished for the given load generation
    Loaded { generation: u64, payload: Payload },
    Tick(Tick),
    Intent(Intent),
}

impl From<Tick> for DashboardEvent {
    fn from(tick: Tick) -> Self {
        DashboardEvent::Tick(tick)
    }
}

impl From<Intent> for DashboardEvent {
    fn from(intent: Intent) -> Self {
        DashboardEvent::Intent(intent)
    }
}
