//! Mile split derivation.
//!
//! Splits partition a run's cumulative distance into whole-mile pieces plus a
//! final partial. A split closes at the first point where the distance since
//! the split opened reaches one mile, so non-final splits land slightly over
//! a mile depending on point spacing.

use time::OffsetDateTime;

use crate::ingest::haversine_distance;
use crate::models::{pace_seconds_per_mile, Split, TrackPoint, MILE_METERS};

/// Derives the contiguous mile splits of a track. Tracks with fewer than two
/// points, or with no distance at all, have no splits.
pub fn generate_splits(points: &[TrackPoint]) -> Vec<Split> {
    if points.len() < 2 {
        return Vec::new();
    }

    let mut splits = Vec::new();
    let mut cumulative = 0.0;
    let mut open_distance = 0.0;
    let mut open_time = points[0].time;

    for pair in points.windows(2) {
        cumulative += haversine_distance(pair[0].lat, pair[0].lon, pair[1].lat, pair[1].lon);
        if cumulative - open_distance >= MILE_METERS {
            splits.push(close_split(open_distance, cumulative, open_time, pair[1].time));
            open_distance = cumulative;
            open_time = pair[1].time;
        }
    }

    // Whatever is left after the last full mile becomes the final partial.
    if cumulative > open_distance {
        let last = &points[points.len() - 1];
        splits.push(close_split(open_distance, cumulative, open_time, last.time));
    }

    splits
}

fn close_split(
    start_distance: f64,
    end_distance: f64,
    start_time: OffsetDateTime,
    end_time: OffsetDateTime,
) -> Split {
    let duration = (end_time - start_time).as_seconds_f64().max(0.0);
    let length = end_distance - start_distance;
    Split {
        start_distance,
        end_distance,
        duration,
        pace: pace_seconds_per_mile(duration, length),
        start_time,
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;
    use time::Duration;

    use super::*;

    /// Straight northward track with evenly spaced points. `spacing_m` is
    /// approximate; the haversine legs land within a meter of it.
    fn track(count: usize, spacing_m: f64, seconds_per_point: f64) -> Vec<TrackPoint> {
        let base = datetime!(2024-06-01 07:00 UTC);
        let deg_per_meter = 1.0 / 111_195.0;
        (0..count)
            .map(|i| TrackPoint {
                lat: 40.0 + i as f64 * spacing_m * deg_per_meter,
                lon: -105.0,
                elevation: None,
                time: base + Duration::seconds_f64(i as f64 * seconds_per_point),
            })
            .collect()
    }

    #[test]
    fn test_no_points_no_splits() {
        assert!(generate_splits(&[]).is_empty());
        let single = track(1, 0.0, 0.0);
        assert!(generate_splits(&single).is_empty());
    }

    #[test]
    fn test_zero_distance_no_splits() {
        let base = datetime!(2024-06-01 07:00 UTC);
        let points: Vec<TrackPoint> = (0..5)
            .map(|i| TrackPoint {
                lat: 40.0,
                lon: -105.0,
                elevation: None,
                time: base + Duration::seconds(i * 10),
            })
            .collect();
        assert!(generate_splits(&points).is_empty());
    }

    #[test]
    fn test_two_miles_and_partial() {
        // 249 legs of ~10 m is ~2490 m: one full mile plus a partial.
        let points = track(250, 10.0, 4.0);
        let splits = generate_splits(&points);
        assert_eq!(splits.len(), 2);

        assert_eq!(splits[0].start_distance, 0.0);
        assert!(splits[0].length() >= MILE_METERS);
        assert!(splits[0].length() < MILE_METERS + 15.0);

        // Contiguity: each split starts where the previous ended.
        assert_eq!(splits[1].start_distance, splits[0].end_distance);
        assert!(splits[1].length() < MILE_METERS);
    }

    #[test]
    fn test_split_paces_are_mile_normalized() {
        // 10 m every 4 s is just under a 10:44 mile.
        let points = track(200, 10.0, 4.0);
        let splits = generate_splits(&points);
        assert!(!splits.is_empty());
        for split in &splits {
            let expected = pace_seconds_per_mile(split.duration, split.length());
            assert!((split.pace - expected).abs() < 1e-9);
            // 10 m / 4 s = 2.5 m/s, one mile takes ~643.7 s.
            assert!((split.pace - 643.7).abs() < 5.0, "pace {}", split.pace);
        }
    }

    #[test]
    fn test_contiguous_three_mile_run() {
        let points = track(520, 10.0, 5.0);
        let splits = generate_splits(&points);
        assert_eq!(splits.len(), 4);
        for pair in splits.windows(2) {
            assert_eq!(pair[0].end_distance, pair[1].start_distance);
        }
        let total: f64 = splits.iter().map(Split::length).sum();
        assert!((total - splits[splits.len() - 1].end_distance).abs() < 1e-6);
    }

    #[test]
    fn test_exact_mile_has_no_empty_partial() {
        // Build a two-point track whose single leg is beyond one mile: a
        // single split, no zero-length trailing partial.
        let base = datetime!(2024-06-01 07:00 UTC);
        let points = vec![
            TrackPoint {
                lat: 40.0,
                lon: -105.0,
                elevation: None,
                time: base,
            },
            TrackPoint {
                lat: 40.0 + 1700.0 / 111_195.0,
                lon: -105.0,
                elevation: None,
                time: base + Duration::seconds(600),
            },
        ];
        let splits = generate_splits(&points);
        assert_eq!(splits.len(), 1);
        assert!(splits[0].length() > MILE_METERS);
    }

    #[test]
    fn test_final_partial_start_time() {
        let points = track(250, 10.0, 4.0);
        let splits = generate_splits(&points);
        assert_eq!(splits.len(), 2);
        // The partial opens at the point that closed the first mile.
        let partial_start = splits[1].start_time;
        assert!(partial_start > splits[0].start_time);
        let first_mile_end = splits[0].start_time + Duration::seconds_f64(splits[0].duration);
        assert_eq!(partial_start, first_mile_end);
    }
}
