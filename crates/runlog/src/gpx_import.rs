//! GPX file import.
//!
//! Parsing is lenient: points without elevation or timestamps are passed
//! through as-is, and ingestion decides what the track as a whole needs.

use time::OffsetDateTime;
use tracing::debug;

use crate::errors::AppError;
use crate::models::TrackPointData;

/// Parses GPX bytes into raw track points, flattening all tracks and segments
/// in document order.
pub fn parse_gpx(data: &[u8]) -> Result<Vec<TrackPointData>, AppError> {
    let gpx = gpx::read(data).map_err(|e| AppError::GpxParsing(e.to_string()))?;

    let mut points = Vec::new();
    for track in &gpx.tracks {
        for segment in &track.segments {
            for point in &segment.points {
                points.push(TrackPointData {
                    lat: point.point().y(),
                    lon: point.point().x(),
                    elevation: point.elevation,
                    timestamp: point.time.map(OffsetDateTime::from),
                });
            }
        }
    }

    debug!("Parsed GPX file: {} points", points.len());
    Ok(points)
}
