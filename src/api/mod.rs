//! Stats API Access
//!
//! The dashboard reads three resources from an external API:
//!
//! - `GET /api/stats` - Summary statistics
//! - `GET /api/timeline/weekly` - Weekly check-in counts
//! - `GET /api/checkins/geo` - Geo-tagged check-ins, oldest first
//!
//! [`CheckinSource`] is the seam the dashboard depends on; [`ApiClient`] is
//! the HTTP implementation.

pub mod client;
pub mod error;

pub use client::{ApiClient, ApiClientConfig};
pub use error::{FetchError, FetchResult};

use async_trait::async_trait;

use crate::model::{GeoCheckin, SummaryStats, WeeklyBucket};

/// Source of dashboard data
#[async_trait]
pub trait CheckinSource: Send + Sync {
    /// Fetch the headline statistics
    async fn fetch_stats(&self) -> FetchResult<SummaryStats>;

    /// Fetch weekly check-in counts in chronological order
    async fn fetch_weekly_timeline(&self) -> FetchResult<Vec<WeeklyBucket>>;

    /// Fetch geo-tagged check-ins in playback order
    async fn fetch_geo_checkins(&self) -> FetchResult<Vec<GeoCheckin>>;
}
