use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// One statute mile in meters; the nominal split unit.
pub const MILE_METERS: f64 = 1609.344;
/// Standard 5K race distance in meters.
pub const FIVE_KM_METERS: f64 = 5_000.0;
/// Standard 10K race distance in meters.
pub const TEN_KM_METERS: f64 = 10_000.0;

/// Mile-normalized pace in seconds per mile, `0.0` when there is no distance.
pub fn pace_seconds_per_mile(duration_seconds: f64, distance_meters: f64) -> f64 {
    if distance_meters <= 0.0 {
        return 0.0;
    }
    duration_seconds / (distance_meters / MILE_METERS)
}

/// A raw, as-parsed track point. Elevation and timestamp may be missing at
/// this layer; ingestion decides what is fatal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPointData {
    pub lat: f64,
    pub lon: f64,
    pub elevation: Option<f64>,
    pub timestamp: Option<OffsetDateTime>,
}

/// A validated track point inside a [`Run`]. Every point carries a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub lat: f64,
    pub lon: f64,
    pub elevation: Option<f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
}

/// A fixed-distance (or final partial) portion of a run.
///
/// Splits are contiguous: `split[i].end_distance == split[i + 1].start_distance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    /// Cumulative distance at which this split opened, in meters.
    pub start_distance: f64,
    /// Cumulative distance at which this split closed, in meters.
    pub end_distance: f64,
    /// Elapsed time within the split, in seconds.
    pub duration: f64,
    /// Mile-normalized pace over the split, in seconds per mile.
    pub pace: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
}

impl Split {
    /// Distance covered by this split, in meters.
    pub fn length(&self) -> f64 {
        self.end_distance - self.start_distance
    }
}

/// A fully ingested run. Created once per successful ingest, read-only after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    /// Opaque identifier, conventionally the uploaded file name.
    pub file_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    pub points: Vec<TrackPoint>,
    /// Total distance in meters.
    pub total_distance: f64,
    /// Total duration in seconds, floored at zero.
    pub total_duration: f64,
    /// Average pace in seconds per mile, `0.0` for zero-distance runs.
    pub avg_pace: f64,
    /// Sum of positive elevation deltas, in meters.
    pub elevation_gain: f64,
    pub splits: Vec<Split>,
}

/// A journal entry attached to the log; counted by achievement rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

impl Story {
    pub fn new(title: String, body: String, date: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            body,
            date,
        }
    }
}

/// A winning effort, value-copied at computation time. Field names follow the
/// persisted snapshot layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestEffort {
    /// File name of the run the effort came from.
    pub file_name: String,
    /// Elapsed time of the effort, in seconds.
    pub time: f64,
    /// Mile-normalized pace, in seconds per mile.
    pub pace: f64,
    /// Distance covered by the effort, in meters.
    pub distance: f64,
    /// Start of the owning run.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// Start of the effort window within the run.
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
}

/// The all-time PR snapshot. Every field stays `None` until the underlying
/// condition has been met at least once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalRecords {
    pub fastest_mile: Option<BestEffort>,
    #[serde(rename = "fastest5K")]
    pub fastest_5k: Option<BestEffort>,
    #[serde(rename = "fastest10K")]
    pub fastest_10k: Option<BestEffort>,
    pub longest_run_distance: Option<BestEffort>,
    pub longest_run_time: Option<BestEffort>,
}

/// PR categories a single new run can beat (see `records::check_for_new_prs`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrCategory {
    FastestMile,
    Fastest5K,
    Fastest10K,
    LongestDistance,
    LongestDuration,
}
