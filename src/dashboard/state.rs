//! Dashboard State
//!
//! The single state record owned by the dashboard runtime. Transitions are
//! pure: [`DashboardState::reduce`] consumes the state and returns the next
//! one together with the actions the runtime must carry out.

use crate::api::FetchError;
use crate::model::{GeoCheckin, SummaryStats, WeeklyBucket};
use crate::playback::{self, Command, PlaybackState};
use crate::view;

use super::event::{DashboardEvent, Intent, Payload};

/// One independently loaded slot of dashboard data
#[derive(Debug, Clone, PartialEq)]
pub enum Panel<T> {
    Loading,
    Ready(T),
    Failed(FetchError),
}

impl<T> Panel<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Panel::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Panel::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Panel::Loading)
    }
}

impl<T> Default for Panel<T> {
    fn default() -> Self {
        Panel::Loading
    }
}

impl<T> From<Result<T, FetchError>> for Panel<T> {
    fn from(result: Result<T, FetchError>) -> Self {
        match result {
            Ok(value) => Panel::Ready(value),
            Err(e) => Panel::Failed(e),
        }
    }
}

/// Side effects requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    StartTicker,
    StopTicker,
    /// Issue the three fetches for a load generation
    Fetch { generation: u64 },
    Quit,
}

impl From<playback::Effect> for Option<Action> {
    fn from(effect: playback::Effect) -> Self {
        match effect {
            playback::Effect::None => None,
            playback::Effect::StartTicker => Some(Action::StartTicker),
            playback::Effect::StopTicker => Some(Action::StopTicker),
        }
    }
}

/// Everything the presentation needs, in one place
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardState {
    generation: u64,
    pub stats: Panel<SummaryStats>,
    pub timeline: Panel<Vec<WeeklyBucket>>,
    pub checkins: Panel<Vec<GeoCheckin>>,
    pub playback: PlaybackState,
}

impl DashboardState {
    /// Initial state: every panel loading, generation 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Current load generation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether every panel has settled
    pub fn is_loaded(&self) -> bool {
        !self.stats.is_loading() && !self.timeline.is_loading() && !self.checkins.is_loading()
    }

    /// The full check-in list, empty until loaded
    pub fn checkins(&self) -> &[GeoCheckin] {
        self.checkins.ready().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check-ins revealed so far
    pub fn visible_points(&self) -> &[GeoCheckin] {
        view::visible_prefix(self.checkins(), self.playback.index())
    }

    /// The check-in drawn with emphasis
    pub fn emphasized_point(&self) -> Option<&GeoCheckin> {
        view::emphasized(self.visible_points())
    }

    /// Year shown by the time machine panel
    pub fn display_year(&self) -> String {
        view::display_year(self.visible_points())
    }

    /// Fraction of the playback completed
    pub fn progress(&self) -> f64 {
        view::progress(self.playback.index(), self.playback.len())
    }

    /// Apply an event, returning the next state and the actions to perform
    pub fn reduce(self, event: DashboardEvent) -> (Self, Vec<Action>) {
        match event {
            DashboardEvent::Loaded {
                generation,
                payload,
            } => {
                if generation != self.generation {
                    return (self, Vec::new());
                }
                self.loaded(payload)
            }
            DashboardEvent::Tick(_) => self.playback_command(Command::Tick),
            DashboardEvent::Intent(intent) => match intent {
                Intent::Play => self.playback_command(Command::Play),
                Intent::Pause => self.playback_command(Command::Pause),
                Intent::TogglePlay => self.playback_command(Command::Toggle),
                Intent::Reset => self.playback_command(Command::Reset),
                Intent::Reload => self.reload(),
                Intent::Quit => (self, vec![Action::StopTicker, Action::Quit]),
            },
        }
    }

    fn playback_command(mut self, command: Command) -> (Self, Vec<Action>) {
        let (playback, effect) = self.playback.reduce(command);
        self.playback = playback;
        let action: Option<Action> = effect.into();
        (self, action.into_iter().collect())
    }

    fn loaded(mut self, payload: Payload) -> (Self, Vec<Action>) {
        let mut actions = Vec::new();
        match payload {
            Payload::Stats(result) => self.stats = result.into(),
            Payload::Timeline(result) => self.timeline = result.into(),
            Payload::Checkins(result) => {
                // A new list restarts playback from the beginning
                if self.playback.is_playing() {
                    actions.push(Action::StopTicker);
                }
                self.checkins = result.into();
                self.playback = PlaybackState::new(self.checkins().len());
            }
        }
        (self, actions)
    }

    fn reload(self) -> (Self, Vec<Action>) {
        let mut actions = Vec::new();
        if self.playback.is_playing() {
            actions.push(Action::StopTicker);
        }

        let generation = self.generation + 1;
        actions.push(Action::Fetch { generation });

        let next = Self {
            generation,
            ..Self::default()
        };
        (next, actions)
    }
}
