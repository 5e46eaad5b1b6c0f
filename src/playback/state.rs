//! Playback State Machine
//!
//! Pure transitions over `(index, status)`. The reducer never touches timers;
//! it reports what should happen to the tick source through [`Effect`].

/// Lifecycle of a playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// Nothing revealed yet
    Idle,
    /// Revealing one check-in per tick
    Playing,
    /// Stopped mid-way, resumable
    Paused,
    /// Every check-in revealed
    Finished,
}

impl std::fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackStatus::Idle => write!(f, "idle"),
            PlaybackStatus::Playing => write!(f, "playing"),
            PlaybackStatus::Paused => write!(f, "paused"),
            PlaybackStatus::Finished => write!(f, "finished"),
        }
    }
}

/// Input to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play,
    Pause,
    /// Play/pause button: pause while playing, play otherwise
    Toggle,
    Reset,
    /// One period of the tick source elapsed
    Tick,
}

/// What the runtime must do with the tick source after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Effect {
    None,
    StartTicker,
    StopTicker,
}

/// Playback position over a list of `len` check-ins
///
/// Invariants: `index <= len`; `status == Finished` iff playback reached
/// `len` through play or ticks; `status == Idle` implies `index == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackState {
    index: usize,
    len: usize,
    status: PlaybackStatus,
}

impl PlaybackState {
    /// Fresh idle state over a list of `len` check-ins
    pub fn new(len: usize) -> Self {
        Self {
            index: 0,
            len,
            status: PlaybackStatus::Idle,
        }
    }

    /// Number of check-ins revealed
    pub fn index(&self) -> usize {
        self.index
    }

    /// Length of the list being played back
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    /// Apply a command, returning the next state and the tick source effect
    pub fn reduce(self, command: Command) -> (Self, Effect) {
        match command {
            Command::Play => self.play(),
            Command::Pause => self.pause(),
            Command::Toggle => {
                if self.is_playing() {
                    self.pause()
                } else {
                    self.play()
                }
            }
            Command::Reset => {
                let effect = if self.is_playing() {
                    Effect::StopTicker
                } else {
                    Effect::None
                };
                (Self::new(self.len), effect)
            }
            Command::Tick => self.tick(),
        }
    }

    fn play(self) -> (Self, Effect) {
        match self.status {
            PlaybackStatus::Idle | PlaybackStatus::Paused => {
                if self.index >= self.len {
                    // Nothing left to reveal; settle without scheduling
                    (self.finished(), Effect::None)
                } else {
                    (
                        Self {
                            status: PlaybackStatus::Playing,
                            ..self
                        },
                        Effect::StartTicker,
                    )
                }
            }
            PlaybackStatus::Playing | PlaybackStatus::Finished => (self, Effect::None),
        }
    }

    fn pause(self) -> (Self, Effect) {
        if self.is_playing() {
            (
                Self {
                    status: PlaybackStatus::Paused,
                    ..self
                },
                Effect::StopTicker,
            )
        } else {
            (self, Effect::None)
        }
    }

    fn tick(self) -> (Self, Effect) {
        if !self.is_playing() {
            return (self, Effect::None);
        }

        let index = self.index + 1;
        if index >= self.len {
            (self.finished(), Effect::StopTicker)
        } else {
            (Self { index, ..self }, Effect::None)
        }
    }

    fn finished(self) -> Self {
        Self {
            index: self.len,
            len: self.len,
            status: PlaybackStatus::Finished,
        }
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(state: PlaybackState, commands: &[Command]) -> PlaybackState {
        commands.iter().fold(state, |s, c| s.reduce(*c).0)
    }

    #[test]
    fn test_play_from_idle() {
        let (state, effect) = PlaybackState::new(3).reduce(Command::Play);
        assert_eq!(state.status(), PlaybackStatus::Playing);
        assert_eq!(state.index(), 0);
        assert_eq!(effect, Effect::StartTicker);
    }

    #[test]
    fn test_ticks_reach_finished() {
        for len in 0..6 {
            for ticks in 0..8 {
                let mut state = PlaybackState::new(len).reduce(Command::Play).0;
                for _ in 0..ticks {
                    state = state.reduce(Command::Tick).0;
                }
                assert_eq!(state.index(), ticks.min(len), "len={len} ticks={ticks}");
                if ticks >= len {
                    assert_eq!(state.status(), PlaybackStatus::Finished);
                    assert!(!state.is_playing());
                } else {
                    assert_eq!(state.status(), PlaybackStatus::Playing);
                }
            }
        }
    }

    #[test]
    fn test_last_tick_stops_ticker() {
        let state = run(PlaybackState::new(2), &[Command::Play, Command::Tick]);
        let (state, effect) = state.reduce(Command::Tick);
        assert_eq!(state.status(), PlaybackStatus::Finished);
        assert_eq!(state.index(), 2);
        assert_eq!(effect, Effect::StopTicker);
    }

    #[test]
    fn test_pause_resume_keeps_index() {
        let state = run(
            PlaybackState::new(10),
            &[Command::Play, Command::Tick, Command::Tick, Command::Tick],
        );
        let (paused, effect) = state.reduce(Command::Pause);
        assert_eq!(paused.status(), PlaybackStatus::Paused);
        assert_eq!(paused.index(), 3);
        assert_eq!(effect, Effect::StopTicker);

        let (resumed, effect) = paused.reduce(Command::Play);
        assert_eq!(resumed.status(), PlaybackStatus::Playing);
        assert_eq!(resumed.index(), 3);
        assert_eq!(effect, Effect::StartTicker);

        assert_eq!(resumed.reduce(Command::Tick).0.index(), 4);
    }

    #[test]
    fn test_ticks_ignored_unless_playing() {
        let idle = PlaybackState::new(4);
        assert_eq!(idle.reduce(Command::Tick), (idle, Effect::None));

        let paused = run(idle, &[Command::Play, Command::Tick, Command::Pause]);
        assert_eq!(paused.reduce(Command::Tick), (paused, Effect::None));

        let finished = run(idle, &[Command::Play, Command::Tick, Command::Tick, Command::Tick, Command::Tick]);
        assert_eq!(finished.status(), PlaybackStatus::Finished);
        assert_eq!(finished.reduce(Command::Tick), (finished, Effect::None));
    }

    #[test]
    fn test_reset_from_every_state() {
        let states = [
            PlaybackState::new(5),
            run(PlaybackState::new(5), &[Command::Play, Command::Tick, Command::Tick]),
            run(PlaybackState::new(5), &[Command::Play, Command::Tick, Command::Pause]),
            run(PlaybackState::new(1), &[Command::Play, Command::Tick]),
        ];

        for state in states {
            let was_playing = state.is_playing();
            let (reset, effect) = state.reduce(Command::Reset);
            assert_eq!(reset.index(), 0);
            assert_eq!(reset.status(), PlaybackStatus::Idle);
            assert!(!reset.is_playing());
            assert_eq!(reset.len(), state.len());
            let expected = if was_playing { Effect::StopTicker } else { Effect::None };
            assert_eq!(effect, expected);
        }
    }

    #[test]
    fn test_empty_list_play_finishes_without_ticker() {
        let (state, effect) = PlaybackState::new(0).reduce(Command::Play);
        assert_eq!(state.status(), PlaybackStatus::Finished);
        assert_eq!(state.index(), 0);
        assert_eq!(effect, Effect::None);
    }

    #[test]
    fn test_play_twice_schedules_once() {
        let (state, first) = PlaybackState::new(5).reduce(Command::Play);
        let (again, second) = state.reduce(Command::Play);
        assert_eq!(first, Effect::StartTicker);
        assert_eq!(second, Effect::None);
        assert_eq!(again, state);
    }

    #[test]
    fn test_play_after_finished_is_noop() {
        let finished = run(PlaybackState::new(1), &[Command::Play, Command::Tick]);
        assert_eq!(finished.reduce(Command::Play), (finished, Effect::None));
        assert_eq!(finished.reduce(Command::Toggle), (finished, Effect::None));
    }

    #[test]
    fn test_toggle() {
        let (playing, effect) = PlaybackState::new(3).reduce(Command::Toggle);
        assert!(playing.is_playing());
        assert_eq!(effect, Effect::StartTicker);

        let (paused, effect) = playing.reduce(Command::Toggle);
        assert_eq!(paused.status(), PlaybackStatus::Paused);
        assert_eq!(effect, Effect::StopTicker);
    }

    #[test]
    fn test_three_point_scenario() {
        let state = run(PlaybackState::new(3), &[Command::Play, Command::Tick, Command::Tick]);
        assert_eq!(state.status(), PlaybackStatus::Playing);
        assert_eq!(state.index(), 2);

        let (state, _) = state.reduce(Command::Tick);
        assert_eq!(state.status(), PlaybackStatus::Finished);
        assert_eq!(state.index(), 3);

        let (state, effect) = run(PlaybackState::new(3), &[Command::Play, Command::Tick, Command::Tick])
            .reduce(Command::Reset);
        assert_eq!((state.index(), state.status()), (0, PlaybackStatus::Idle));
        assert_eq!(effect, Effect::StopTicker);
    }
}
