//! Core data models for the near-Earth object feed
//!
//! This module contains the upstream NeoWs payload types, the normalized
//! summary served to clients, and the pipeline that turns one into the other.

pub mod feed;
pub mod neows;
pub mod normalize;
pub mod parse;
pub mod today;

pub use feed::FeedResponse;
pub use neows::{ErrorKind, FeedFetcher, FetchError, NeoWsClient};
pub use normalize::normalize_for_date;
pub use today::TodayService;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Average Earth-Moon distance in kilometers (one lunar distance)
pub const LUNAR_DISTANCE_KM: f64 = 384_400.0;

/// Orbiting body reported when upstream gives none
pub const DEFAULT_ORBITING_BODY: &str = "Earth";

/// A near-Earth object as seen on one target date
///
/// Numeric fields use `NaN` for "unknown"; it serializes as JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeoSummary {
    /// Upstream identifier, empty if missing
    pub id: String,
    /// Display name, empty if missing
    pub name: String,
    /// Potentially hazardous asteroid flag
    pub is_hazardous: bool,
    /// Minimum estimated diameter in meters
    #[serde(deserialize_with = "nan_if_null")]
    pub diameter_min_meters: f64,
    /// Maximum estimated diameter in meters
    #[serde(deserialize_with = "nan_if_null")]
    pub diameter_max_meters: f64,
    /// When the selected close approach happens
    pub close_approach_time: DateTime<Utc>,
    /// Body the object passes, "Earth" if unknown
    pub orbiting_body: String,
    /// Miss distance in kilometers
    #[serde(deserialize_with = "nan_if_null")]
    pub miss_distance_km: f64,
    /// Miss distance in lunar distances
    #[serde(deserialize_with = "nan_if_null")]
    pub miss_distance_lunar: f64,
    /// Relative velocity in km/s
    #[serde(deserialize_with = "nan_if_null")]
    pub relative_velocity_km_per_sec: f64,
}

impl NeoSummary {
    /// Field-wise equality that treats two `NaN`s as equal
    pub fn same_as(&self, other: &Self) -> bool {
        fn same(a: f64, b: f64) -> bool {
            a == b || (a.is_nan() && b.is_nan())
        }
        self.id == other.id
            && self.name == other.name
            && self.is_hazardous == other.is_hazardous
            && same(self.diameter_min_meters, other.diameter_min_meters)
            && same(self.diameter_max_meters, other.diameter_max_meters)
            && self.close_approach_time == other.close_approach_time
            && self.orbiting_body == other.orbiting_body
            && same(self.miss_distance_km, other.miss_distance_km)
            && same(self.miss_distance_lunar, other.miss_distance_lunar)
            && same(
                self.relative_velocity_km_per_sec,
                other.relative_velocity_km_per_sec,
            )
    }
}

fn nan_if_null<'de, D: serde::Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::NAN))
}
