//! Core data types for the Swarm Insights dashboard
//!
//! These mirror the JSON payloads served by the stats API:
//! - `SummaryStats`: headline numbers for the stat cards
//! - `WeeklyBucket`: one point of the weekly activity chart
//! - `GeoCheckin`: one geo-tagged check-in, in playback order

use chrono::{DateTime, Datelike, Local, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Label used when the API has no top city
pub const UNKNOWN_CITY: &str = "Unknown";

/// Headline statistics across the whole check-in history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryStats {
    pub total_checkins: u64,
    pub unique_venues: u64,
    /// Most visited city, "Unknown" when the API sends null
    #[serde(default = "unknown_city", deserialize_with = "null_as_unknown_city")]
    pub top_city: String,
    pub total_distance_km: f64,
}

fn unknown_city() -> String {
    UNKNOWN_CITY.to_string()
}

fn null_as_unknown_city<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(unknown_city))
}

impl SummaryStats {
    /// Check the invariants the API is expected to uphold
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.total_distance_km.is_finite() || self.total_distance_km < 0.0 {
            return Err(ValidationError::Distance(self.total_distance_km));
        }
        Ok(())
    }
}

/// Check-in count for one calendar week
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklyBucket {
    /// Week label, `YYYY-MM-DD` of the week end
    pub week: String,
    pub count: u64,
}

impl WeeklyBucket {
    pub fn new(week: impl Into<String>, count: u64) -> Self {
        Self {
            week: week.into(),
            count,
        }
    }

    /// Year part of the week label, used for axis ticks
    pub fn year_label(&self) -> &str {
        self.week.split('-').next().unwrap_or(&self.week)
    }
}

/// A geo-tagged check-in
///
/// The order of a `Vec<GeoCheckin>` is the playback order. The API sorts by
/// timestamp; nothing downstream re-sorts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeoCheckin {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub venue_name: String,
    pub lat: f64,
    pub lng: f64,
    /// Unix timestamp in seconds
    pub timestamp: i64,
    #[serde(default)]
    pub shout: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl GeoCheckin {
    /// Create a check-in at the given position and time
    pub fn new(
        id: impl Into<String>,
        venue_name: impl Into<String>,
        lat: f64,
        lng: f64,
        timestamp: i64,
    ) -> Self {
        Self {
            id: id.into(),
            venue_name: venue_name.into(),
            lat,
            lng,
            timestamp,
            shout: None,
        }
    }

    /// Builder method: attach a shout
    pub fn shout(mut self, shout: impl Into<String>) -> Self {
        self.shout = Some(shout.into());
        self
    }

    /// Check-in time in UTC, if the timestamp is representable
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    /// Calendar year of the check-in (UTC)
    pub fn year(&self) -> Option<i32> {
        self.datetime().map(|dt| dt.year())
    }

    /// Date in the viewer's local time zone, for marker popups
    pub fn local_date(&self) -> String {
        self.datetime()
            .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Non-empty shout text, if any
    pub fn shout_text(&self) -> Option<&str> {
        self.shout.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Check that the coordinates are on the globe
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(ValidationError::Latitude {
                id: self.id.clone(),
                lat: self.lat,
            });
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(ValidationError::Longitude {
                id: self.id.clone(),
                lng: self.lng,
            });
        }
        Ok(())
    }
}

/// Index of the first check-in whose timestamp is earlier than its predecessor
pub fn first_out_of_order(checkins: &[GeoCheckin]) -> Option<usize> {
    checkins
        .windows(2)
        .position(|pair| pair[1].timestamp < pair[0].timestamp)
        .map(|i| i + 1)
}

/// Payload invariant violations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("check-in {id} has latitude {lat} outside [-90, 90]")]
    Latitude { id: String, lat: f64 },

    #[error("check-in {id} has longitude {lng} outside [-180, 180]")]
    Longitude { id: String, lng: f64 },

    #[error("total distance {0} km is not a non-negative number")]
    Distance(f64),
}
