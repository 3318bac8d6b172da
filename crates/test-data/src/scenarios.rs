//! Deterministic scenario fixtures.
//!
//! Pace-exact tracks for verifying split and best-effort math end to end:
//! points run due north at fixed spacing, timed so each mile is covered at a
//! chosen pace. No jitter, no terrain, no randomness.

use runlog::models::{TrackPointData, MILE_METERS};
use time::{Duration, OffsetDateTime};

/// Meters of northward travel per degree of latitude.
const METERS_PER_DEGREE_LAT: f64 = 111_195.0;
/// Point spacing in meters.
const SPACING_M: f64 = 10.0;

/// A track covering one mile per entry of `paces`, each mile at that pace in
/// seconds per mile.
pub fn mile_paced_points(start: OffsetDateTime, paces: &[f64]) -> Vec<TrackPointData> {
    assert!(!paces.is_empty(), "at least one mile pace required");
    let total = paces.len() as f64 * MILE_METERS;

    let mut points = vec![point_at(0.0, start)];
    let mut covered = 0.0;
    let mut elapsed = 0.0;
    while covered < total {
        let mile = ((covered / MILE_METERS) as usize).min(paces.len() - 1);
        covered += SPACING_M;
        elapsed += SPACING_M * paces[mile] / MILE_METERS;
        points.push(point_at(covered, start + Duration::seconds_f64(elapsed)));
    }
    points
}

/// A track at one constant pace over the given distance.
pub fn steady_points(start: OffsetDateTime, distance_m: f64, pace: f64) -> Vec<TrackPointData> {
    let mut points = vec![point_at(0.0, start)];
    let mut covered = 0.0;
    let mut elapsed = 0.0;
    while covered < distance_m {
        covered += SPACING_M;
        elapsed += SPACING_M * pace / MILE_METERS;
        points.push(point_at(covered, start + Duration::seconds_f64(elapsed)));
    }
    points
}

/// A steady track with every timestamp stripped; ingesting it must fail.
pub fn points_without_timestamps(distance_m: f64) -> Vec<TrackPointData> {
    steady_points(OffsetDateTime::UNIX_EPOCH, distance_m, 600.0)
        .into_iter()
        .map(|p| TrackPointData {
            timestamp: None,
            ..p
        })
        .collect()
}

fn point_at(distance_m: f64, time: OffsetDateTime) -> TrackPointData {
    TrackPointData {
        lat: 40.0 + distance_m / METERS_PER_DEGREE_LAT,
        lon: -105.0,
        elevation: Some(1650.0),
        timestamp: Some(time),
    }
}
