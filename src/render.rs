//! Terminal Presentation
//!
//! Renders a [`DashboardState`] as plain text: stat cards, the weekly
//! activity chart, the time machine panel and the most recent map markers.
//! Rendering holds no state.

use std::fmt::Write;

use crate::dashboard::{DashboardState, Panel};
use crate::model::WeeklyBucket;
use crate::playback::PlaybackStatus;
use crate::view;

/// Text shown in place of a value that is still loading
pub const LOADING: &str = "...";
/// Text shown in place of a value whose panel failed
pub const UNAVAILABLE: &str = "unavailable";

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Layout settings
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Width of the chart and progress bar, in characters
    pub width: usize,
    /// How many of the most recent markers to list
    pub marker_history: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 60,
            marker_history: 10,
        }
    }
}

/// Render one full frame
pub fn render_frame(state: &DashboardState, options: &RenderOptions) -> String {
    let mut out = String::new();
    out.push_str("Swarm Insights\n");
    out.push_str("Your life, visualized through check-ins.\n\n");
    out.push_str(&stat_cards(state));
    out.push('\n');
    out.push_str(&activity_chart(&state.timeline, options.width));
    out.push('\n');
    out.push_str(&time_machine(state, options.width));
    out.push('\n');
    out.push_str(&map_markers(state, options.marker_history));
    out
}

fn panel_value<T>(panel: &Panel<T>, format: impl Fn(&T) -> String) -> String {
    match panel {
        Panel::Loading => LOADING.to_string(),
        Panel::Ready(value) => format(value),
        Panel::Failed(_) => UNAVAILABLE.to_string(),
    }
}

/// The four headline cards
pub fn stat_cards(state: &DashboardState) -> String {
    let cards = [
        ("Total Check-ins", panel_value(&state.stats, |s| s.total_checkins.to_string())),
        ("Unique Venues", panel_value(&state.stats, |s| s.unique_venues.to_string())),
        ("Top City", panel_value(&state.stats, |s| s.top_city.clone())),
        (
            "Total Distance",
            panel_value(&state.stats, |s| format!("{:.0} km", s.total_distance_km)),
        ),
    ];

    let mut out = String::new();
    for (label, value) in cards {
        let _ = writeln!(out, "  {:<16} {}", label, value);
    }
    if let Some(e) = state.stats.error() {
        let _ = writeln!(out, "  ! stats unavailable: {}", e);
    }
    out
}

/// Sparkline of weekly counts with year labels under both ends
pub fn activity_chart(timeline: &Panel<Vec<WeeklyBucket>>, width: usize) -> String {
    let mut out = String::from("Activity Over Time\n");
    match timeline {
        Panel::Loading => {
            let _ = writeln!(out, "  {}", LOADING);
        }
        Panel::Failed(e) => {
            let _ = writeln!(out, "  ! timeline unavailable: {}", e);
        }
        Panel::Ready(weeks) if weeks.is_empty() => {
            out.push_str("  no check-ins yet\n");
        }
        Panel::Ready(weeks) => {
            let counts: Vec<u64> = weeks.iter().map(|w| w.count).collect();
            let line = sparkline(&counts, width);
            let peak = counts.iter().copied().max().unwrap_or(0);
            let _ = writeln!(out, "  {}  peak {}/week", line, peak);

            let first = weeks.first().map(WeeklyBucket::year_label).unwrap_or_default();
            let last = weeks.last().map(WeeklyBucket::year_label).unwrap_or_default();
            let span = line.chars().count();
            let gap = span.saturating_sub(first.len() + last.len()).max(1);
            let _ = writeln!(out, "  {}{}{}", first, " ".repeat(gap), last);
        }
    }
    out
}

/// Downsample `values` to at most `width` columns (max per column)
pub fn sparkline(values: &[u64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }

    let columns = values.len().min(width);
    let buckets: Vec<u64> = (0..columns)
        .map(|c| {
            let start = c * values.len() / columns;
            let end = ((c + 1) * values.len() / columns).max(start + 1);
            values[start..end].iter().copied().max().unwrap_or(0)
        })
        .collect();

    let max = buckets.iter().copied().max().unwrap_or(0);
    buckets
        .iter()
        .map(|&v| {
            if max == 0 {
                SPARK_LEVELS[0]
            } else {
                // Widened so huge counts cannot overflow
                let level = v as u128 * (SPARK_LEVELS.len() as u128 - 1) / max as u128;
                SPARK_LEVELS[level as usize]
            }
        })
        .collect()
}

/// `[█████░░░░░]` style bar
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}

/// Year, play state and progress
pub fn time_machine(state: &DashboardState, width: usize) -> String {
    let playback = &state.playback;
    let control = match playback.status() {
        PlaybackStatus::Playing => "|| pause",
        PlaybackStatus::Finished => "done",
        PlaybackStatus::Idle | PlaybackStatus::Paused => "> play",
    };

    let mut out = String::from("Time Machine\n");
    let _ = writeln!(out, "  {}   {}   [r] reset", state.display_year(), control);
    let _ = writeln!(
        out,
        "  {} {}/{}",
        progress_bar(state.progress(), width),
        playback.index(),
        playback.len()
    );
    out
}

/// The most recent visible markers, newest last
pub fn map_markers(state: &DashboardState, history: usize) -> String {
    let mut out = String::from("Map\n");
    match &state.checkins {
        Panel::Loading => {
            let _ = writeln!(out, "  {}", LOADING);
            return out;
        }
        Panel::Failed(e) => {
            let _ = writeln!(out, "  ! check-ins unavailable: {}", e);
            return out;
        }
        Panel::Ready(_) => {}
    }

    let visible = state.visible_points();
    if visible.is_empty() {
        out.push_str("  (press play to start the journey)\n");
        return out;
    }

    let skip = visible.len().saturating_sub(history);
    for marker in view::markers(visible).skip(skip) {
        let checkin = marker.checkin;
        let bullet = if marker.emphasized { "◉" } else { "·" };
        let venue = if checkin.venue_name.is_empty() {
            "Unknown venue"
        } else {
            checkin.venue_name.as_str()
        };
        let _ = write!(
            out,
            "  {} {:<28} ({:>8.3}, {:>9.3})  {}",
            bullet,
            venue,
            checkin.lat,
            checkin.lng,
            checkin.local_date()
        );
        if let Some(shout) = checkin.shout_text() {
            let _ = write!(out, "  \"{}\"", shout);
        }
        out.push('\n');
    }
    out
}
