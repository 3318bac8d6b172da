//! Personal-record snapshot maintenance and persistence.
//!
//! The snapshot is always recomputed from the full run collection and written
//! wholesale; there is no per-category patching. Reads degrade softly: a
//! missing or undecodable stored value simply yields no snapshot.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::best_efforts;
use crate::models::{BestEffort, PersonalRecords, PrCategory, Run};
use crate::storage::{Storage, StorageError};

/// Fixed storage key of the persisted snapshot.
pub const RECORDS_STORAGE_KEY: &str = "personal_records";

/// Persisted layout: the snapshot plus a write timestamp. The timestamp
/// lives only in storage so that recomputing identical records stays
/// idempotent in memory.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecords {
    #[serde(flatten)]
    records: PersonalRecords,
    #[serde(with = "time::serde::rfc3339")]
    last_updated: OffsetDateTime,
}

/// Owns the PR snapshot lifecycle against a [`Storage`] backend.
pub struct RecordsStore {
    storage: Arc<dyn Storage>,
}

impl RecordsStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Recomputes the snapshot from the full collection and overwrites the
    /// stored copy. Persistence failures are logged, never fatal: the fresh
    /// snapshot is returned regardless.
    pub fn update_best_efforts(&self, runs: &[Run]) -> PersonalRecords {
        let records = best_efforts::calculate_best_efforts(runs);
        info!("Recomputed personal records from {} runs", runs.len());
        if let Err(e) = self.save(&records) {
            warn!("Failed to persist personal records: {e}");
        }
        records
    }

    fn save(&self, records: &PersonalRecords) -> Result<(), StorageError> {
        let stored = StoredRecords {
            records: records.clone(),
            last_updated: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&stored)?;
        self.storage.set(RECORDS_STORAGE_KEY, &json)
    }

    /// Restores the persisted snapshot. Returns `None` when nothing has been
    /// stored yet, the backend is unreachable, or the value is corrupt; the
    /// next recompute rebuilds and rewrites it either way.
    pub fn load(&self) -> Option<PersonalRecords> {
        let raw = match self.storage.get(RECORDS_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read stored personal records: {e}");
                return None;
            }
        };
        match serde_json::from_str::<StoredRecords>(&raw) {
            Ok(stored) => Some(stored.records),
            Err(e) => {
                warn!("Discarding corrupt personal records snapshot: {e}");
                None
            }
        }
    }

    /// Judges a single run against an existing snapshot and lists the
    /// categories it beats.
    ///
    /// This is a display-oriented pre-check: segment efforts here come from
    /// the new run alone, while the snapshot's efforts were searched across
    /// all runs, so the verdicts can differ from what the authoritative
    /// recompute concludes.
    pub fn check_for_new_prs(current: &PersonalRecords, new_run: &Run) -> Vec<PrCategory> {
        let candidate = best_efforts::calculate_best_efforts(std::slice::from_ref(new_run));

        let mut beaten = Vec::new();
        if beats_pace(&candidate.fastest_mile, &current.fastest_mile) {
            beaten.push(PrCategory::FastestMile);
        }
        if beats_pace(&candidate.fastest_5k, &current.fastest_5k) {
            beaten.push(PrCategory::Fastest5K);
        }
        if beats_pace(&candidate.fastest_10k, &current.fastest_10k) {
            beaten.push(PrCategory::Fastest10K);
        }
        if beats_metric(
            &candidate.longest_run_distance,
            &current.longest_run_distance,
            |e| e.distance,
        ) {
            beaten.push(PrCategory::LongestDistance);
        }
        if beats_metric(&candidate.longest_run_time, &current.longest_run_time, |e| {
            e.time
        }) {
            beaten.push(PrCategory::LongestDuration);
        }
        beaten
    }
}

/// Lower pace wins; any effort beats an empty category.
fn beats_pace(candidate: &Option<BestEffort>, current: &Option<BestEffort>) -> bool {
    match (candidate, current) {
        (Some(c), Some(b)) => c.pace < b.pace,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Strictly greater metric wins; any effort beats an empty category.
fn beats_metric(
    candidate: &Option<BestEffort>,
    current: &Option<BestEffort>,
    metric: fn(&BestEffort) -> f64,
) -> bool {
    match (candidate, current) {
        (Some(c), Some(b)) => metric(c) > metric(b),
        (Some(_), None) => true,
        (None, _) => false,
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;
    use time::Duration;

    use super::*;
    use crate::models::{pace_seconds_per_mile, Split, MILE_METERS};
    use crate::storage::MemoryStorage;

    fn mile_run(file_name: &str, paces: &[f64]) -> Run {
        let base = datetime!(2024-06-01 07:00 UTC);
        let mut splits = Vec::new();
        let mut elapsed = 0.0;
        for (i, &pace) in paces.iter().enumerate() {
            splits.push(Split {
                start_distance: i as f64 * MILE_METERS,
                end_distance: (i + 1) as f64 * MILE_METERS,
                duration: pace,
                pace,
                start_time: base + Duration::seconds_f64(elapsed),
            });
            elapsed += pace;
        }
        let total = paces.len() as f64 * MILE_METERS;
        Run {
            file_name: file_name.to_string(),
            start_time: base,
            points: Vec::new(),
            total_distance: total,
            total_duration: elapsed,
            avg_pace: pace_seconds_per_mile(elapsed, total),
            elevation_gain: 0.0,
            splits,
        }
    }

    fn store() -> (RecordsStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        (RecordsStore::new(storage.clone()), storage)
    }

    #[test]
    fn test_update_persists_and_loads_back() {
        let (store, _storage) = store();
        let runs = vec![mile_run("a.gpx", &[540.0, 510.0])];

        let records = store.update_best_efforts(&runs);
        assert!(records.fastest_mile.is_some());

        let restored = store.load().unwrap();
        assert_eq!(restored, records);
    }

    #[test]
    fn test_load_missing_is_none() {
        let (store, _storage) = store();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_load_corrupt_degrades_to_none() {
        let (store, storage) = store();
        storage.set(RECORDS_STORAGE_KEY, "{not json").unwrap();
        assert!(store.load().is_none());

        // A following recompute overwrites the corrupt value.
        store.update_best_efforts(&[mile_run("a.gpx", &[540.0])]);
        assert!(store.load().is_some());
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let (store, _storage) = store();
        let runs = vec![mile_run("a.gpx", &[540.0, 510.0, 555.0])];

        let first = store.update_best_efforts(&runs);
        let second = store.update_best_efforts(&runs);
        assert_eq!(first, second);
    }

    #[test]
    fn test_removal_recompute_can_regress_records() {
        let (store, _storage) = store();
        let fast = mile_run("fast.gpx", &[480.0]);
        let slow = mile_run("slow.gpx", &[560.0]);

        let records = store.update_best_efforts(&[fast, slow.clone()]);
        assert_eq!(records.fastest_mile.as_ref().unwrap().pace, 480.0);

        // Deleting the fast run and recomputing moves the record backwards.
        let records = store.update_best_efforts(&[slow]);
        assert_eq!(records.fastest_mile.as_ref().unwrap().pace, 560.0);
    }

    #[test]
    fn test_persisted_layout_field_names() {
        let (store, storage) = store();
        store.update_best_efforts(&[mile_run("a.gpx", &[540.0])]);

        let raw = storage.get(RECORDS_STORAGE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let object = value.as_object().unwrap();
        for key in [
            "fastestMile",
            "fastest5K",
            "fastest10K",
            "longestRunDistance",
            "longestRunTime",
            "lastUpdated",
        ] {
            assert!(object.contains_key(key), "missing {key}");
        }
        assert!(value["fastestMile"]["fileName"].is_string());
        assert!(value["fastest5K"].is_null());
        // Dates are ISO-8601 strings.
        let date = value["fastestMile"]["date"].as_str().unwrap();
        assert!(date.starts_with("2024-06-01T07:00:00"));
    }

    #[test]
    fn test_check_for_new_prs_against_empty_snapshot() {
        let current = PersonalRecords::default();
        let run = mile_run("first.gpx", &[540.0]);
        let beaten = RecordsStore::check_for_new_prs(&current, &run);
        assert_eq!(
            beaten,
            vec![
                PrCategory::FastestMile,
                PrCategory::LongestDistance,
                PrCategory::LongestDuration,
            ]
        );
    }

    #[test]
    fn test_check_for_new_prs_beats_only_faster() {
        let baseline = vec![mile_run("old.gpx", &[510.0, 520.0, 530.0, 540.0])];
        let (store, _storage) = store();
        let current = store.update_best_efforts(&baseline);

        // Slower mile, shorter run: nothing beaten.
        let dull = mile_run("dull.gpx", &[555.0]);
        assert!(RecordsStore::check_for_new_prs(&current, &dull).is_empty());

        // Faster mile but still shorter than the four-miler.
        let quick = mile_run("quick.gpx", &[495.0]);
        assert_eq!(
            RecordsStore::check_for_new_prs(&current, &quick),
            vec![PrCategory::FastestMile]
        );
    }

    #[test]
    fn test_pre_check_can_diverge_from_recompute() {
        // The pre-check judges a run against whatever snapshot it is handed.
        // Two seven-mile runs, a snapshot that predates both: the pre-check
        // reports the new run as a 10K PR, while the authoritative recompute
        // assigns that record to the other run.
        let rocket = mile_run("rocket.gpx", &[450.0; 7]);
        let new = mile_run("new.gpx", &[500.0; 7]);
        let stale = PersonalRecords::default();

        let beaten = RecordsStore::check_for_new_prs(&stale, &new);
        assert!(beaten.contains(&PrCategory::Fastest10K));

        let (store, _storage) = store();
        let recomputed = store.update_best_efforts(&[rocket, new]);
        assert_eq!(recomputed.fastest_10k.unwrap().file_name, "rocket.gpx");
    }
}
