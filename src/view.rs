//! Derived View Projection
//!
//! Pure functions of the check-in list and the playback index. Nothing here
//! is stored; callers recompute on every frame.

use crate::model::GeoCheckin;

/// Year placeholder shown before any check-in is revealed
pub const EMPTY_YEAR: &str = "----";

/// The revealed prefix `checkins[0..index)`
pub fn visible_prefix(checkins: &[GeoCheckin], index: usize) -> &[GeoCheckin] {
    &checkins[..index.min(checkins.len())]
}

/// The most recently revealed check-in
pub fn emphasized(visible: &[GeoCheckin]) -> Option<&GeoCheckin> {
    visible.last()
}

/// Year of the most recent visible check-in, or the placeholder
pub fn display_year(visible: &[GeoCheckin]) -> String {
    emphasized(visible)
        .and_then(GeoCheckin::year)
        .map(|year| year.to_string())
        .unwrap_or_else(|| EMPTY_YEAR.to_string())
}

/// Fraction of the list revealed, in `[0, 1]`
pub fn progress(index: usize, len: usize) -> f64 {
    if len == 0 {
        0.0
    } else {
        index.min(len) as f64 / len as f64
    }
}

/// Visual weight of a map marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub radius: u8,
    pub weight: u8,
    pub fill_opacity: f32,
    pub color: &'static str,
}

impl MarkerStyle {
    /// Style of the most recent check-in
    pub const EMPHASIZED: MarkerStyle = MarkerStyle {
        radius: 12,
        weight: 3,
        fill_opacity: 0.8,
        color: "#60a5fa",
    };

    /// Style of every other revealed check-in
    pub const REGULAR: MarkerStyle = MarkerStyle {
        radius: 5,
        weight: 1,
        fill_opacity: 0.4,
        color: "#3b82f6",
    };
}

/// A revealed check-in with its marker style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker<'a> {
    pub checkin: &'a GeoCheckin,
    pub emphasized: bool,
    pub style: MarkerStyle,
}

/// Markers for the visible prefix, in playback order
pub fn markers(visible: &[GeoCheckin]) -> impl Iterator<Item = Marker<'_>> + '_ {
    let last = visible.len().checked_sub(1);
    visible.iter().enumerate().map(move |(i, checkin)| {
        let emphasized = Some(i) == last;
        Marker {
            checkin,
            emphasized,
            style: if emphasized {
                MarkerStyle::EMPHASIZED
            } else {
                MarkerStyle::REGULAR
            },
        }
    })
}
