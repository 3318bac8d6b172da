//! Best-effort search: fastest mile, fastest 5K/10K segment, and longest run
//! by distance and by duration, computed across the whole run collection.
//!
//! Segment distances are matched with a tolerance band because split
//! boundaries almost never land exactly on 5000 or 10000 meters. Paces are
//! always mile-normalized so efforts of slightly different lengths compare
//! fairly.

use crate::models::{
    pace_seconds_per_mile, BestEffort, PersonalRecords, Run, FIVE_KM_METERS, MILE_METERS,
    TEN_KM_METERS,
};

/// Minimum fraction of a mile a split must cover to count as a full mile.
pub const FULL_MILE_TOLERANCE: f64 = 0.99;
/// Lower edge of the segment acceptance band, as a fraction of the target.
pub const SEGMENT_MIN_RATIO: f64 = 0.95;
/// Upper edge of the segment acceptance band, as a fraction of the target.
pub const SEGMENT_MAX_RATIO: f64 = 1.05;
/// Once a growing window passes this fraction of the target it can never
/// re-enter the band, so the scan for that start index stops.
pub const SEGMENT_ABORT_RATIO: f64 = 1.10;

/// Computes a fresh PR snapshot from the full collection. Runs that cannot
/// satisfy a category simply do not contribute; an empty collection yields a
/// snapshot of `None`s.
pub fn calculate_best_efforts(runs: &[Run]) -> PersonalRecords {
    PersonalRecords {
        fastest_mile: find_fastest_mile(runs),
        fastest_5k: find_fastest_segment(runs, FIVE_KM_METERS),
        fastest_10k: find_fastest_segment(runs, TEN_KM_METERS),
        longest_run_distance: longest_run_by_distance(runs),
        longest_run_time: longest_run_by_duration(runs),
    }
}

/// The lowest-pace full-mile split across all runs. Partial splits shorter
/// than [`FULL_MILE_TOLERANCE`] of a mile are ignored. Ties keep the first
/// effort encountered in collection order.
pub fn find_fastest_mile(runs: &[Run]) -> Option<BestEffort> {
    let mut best: Option<BestEffort> = None;
    for run in runs {
        for split in &run.splits {
            if split.length() < FULL_MILE_TOLERANCE * MILE_METERS {
                continue;
            }
            let replace = match &best {
                None => true,
                Some(current) => split.pace < current.pace,
            };
            if replace {
                best = Some(BestEffort {
                    file_name: run.file_name.clone(),
                    time: split.duration,
                    pace: split.pace,
                    distance: split.length(),
                    date: run.start_time,
                    start_time: split.start_time,
                });
            }
        }
    }
    best
}

/// The lowest-pace contiguous split window whose distance falls within the
/// acceptance band around `target_meters`.
///
/// For each start split the window grows one split at a time; the first
/// window inside the band is that start's candidate and the scan moves on.
/// Runs shorter than the lower band edge are skipped outright.
pub fn find_fastest_segment(runs: &[Run], target_meters: f64) -> Option<BestEffort> {
    let min_distance = SEGMENT_MIN_RATIO * target_meters;
    let max_distance = SEGMENT_MAX_RATIO * target_meters;
    let abort_distance = SEGMENT_ABORT_RATIO * target_meters;

    let mut best: Option<BestEffort> = None;
    for run in runs {
        if run.total_distance < min_distance {
            continue;
        }
        for start in 0..run.splits.len() {
            let mut distance = 0.0;
            let mut duration = 0.0;
            for split in &run.splits[start..] {
                distance += split.length();
                duration += split.duration;
                if distance >= min_distance && distance <= max_distance {
                    let pace = pace_seconds_per_mile(duration, distance);
                    let replace = match &best {
                        None => true,
                        Some(current) => pace < current.pace,
                    };
                    if replace {
                        best = Some(BestEffort {
                            file_name: run.file_name.clone(),
                            time: duration,
                            pace,
                            distance,
                            date: run.start_time,
                            start_time: run.splits[start].start_time,
                        });
                    }
                    // First window in the band wins for this start index.
                    break;
                }
                if distance > abort_distance {
                    // The window only grows; the band is out of reach.
                    break;
                }
            }
        }
    }
    best
}

/// The run with the strictly greatest total distance; earlier runs win ties.
pub fn longest_run_by_distance(runs: &[Run]) -> Option<BestEffort> {
    let mut best: Option<&Run> = None;
    for run in runs {
        let replace = match best {
            None => true,
            Some(current) => run.total_distance > current.total_distance,
        };
        if replace {
            best = Some(run);
        }
    }
    best.map(whole_run_effort)
}

/// The run with the strictly greatest total duration; earlier runs win ties.
pub fn longest_run_by_duration(runs: &[Run]) -> Option<BestEffort> {
    let mut best: Option<&Run> = None;
    for run in runs {
        let replace = match best {
            None => true,
            Some(current) => run.total_duration > current.total_duration,
        };
        if replace {
            best = Some(run);
        }
    }
    best.map(whole_run_effort)
}

fn whole_run_effort(run: &Run) -> BestEffort {
    BestEffort {
        file_name: run.file_name.clone(),
        time: run.total_duration,
        pace: run.avg_pace,
        distance: run.total_distance,
        date: run.start_time,
        start_time: run.start_time,
    }
}
