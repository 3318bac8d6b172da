//! Track ingestion: turns raw point lists into immutable [`Run`] values with
//! distance, duration, elevation, and split metrics attached.

use tracing::{debug, warn};

use crate::errors::AppError;
use crate::gpx_import;
use crate::models::{pace_seconds_per_mile, Run, TrackPoint, TrackPointData};
use crate::splits;

/// Mean Earth radius in meters, as used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates in meters.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Validates raw points and computes run metrics.
///
/// Fails with [`AppError::MalformedTrack`] when the track is empty or any
/// point is missing its timestamp. Distance accumulates pairwise haversine
/// legs, elevation gain sums positive deltas only, and duration is the last
/// timestamp minus the first, floored at zero.
pub fn ingest_track(
    file_name: impl Into<String>,
    points: &[TrackPointData],
) -> Result<Run, AppError> {
    let file_name = file_name.into();

    if points.is_empty() {
        return Err(AppError::MalformedTrack(format!(
            "{file_name}: track contains no points"
        )));
    }

    let mut validated = Vec::with_capacity(points.len());
    for (i, point) in points.iter().enumerate() {
        let Some(time) = point.timestamp else {
            return Err(AppError::MalformedTrack(format!(
                "{file_name}: point {i} has no timestamp"
            )));
        };
        validated.push(TrackPoint {
            lat: point.lat,
            lon: point.lon,
            elevation: point.elevation,
            time,
        });
    }

    let mut total_distance = 0.0;
    let mut elevation_gain = 0.0;
    for pair in validated.windows(2) {
        total_distance += haversine_distance(pair[0].lat, pair[0].lon, pair[1].lat, pair[1].lon);
        if let (Some(prev), Some(curr)) = (pair[0].elevation, pair[1].elevation)
            && curr > prev
        {
            elevation_gain += curr - prev;
        }
    }

    let start_time = validated[0].time;
    let end_time = validated[validated.len() - 1].time;
    let raw_duration = (end_time - start_time).as_seconds_f64();
    if raw_duration < 0.0 {
        warn!("Track {file_name} ends before it starts; clamping duration to 0");
    }
    let total_duration = raw_duration.max(0.0);
    let avg_pace = pace_seconds_per_mile(total_duration, total_distance);
    let splits = splits::generate_splits(&validated);

    debug!(
        "Ingested {file_name}: {:.0} m, {:.0} s, {} splits",
        total_distance,
        total_duration,
        splits.len()
    );

    Ok(Run {
        file_name,
        start_time,
        points: validated,
        total_distance,
        total_duration,
        avg_pace,
        elevation_gain,
        splits,
    })
}

/// Parses GPX bytes and ingests the result in one step.
pub fn ingest_gpx(file_name: &str, data: &[u8]) -> Result<Run, AppError> {
    let points = gpx_import::parse_gpx(data)?;
    ingest_track(file_name, &points)
}
