//! Run history facade.
//!
//! `RunHistory` owns the run and story collections and keeps the derived
//! state (PR snapshot, achievement unlocks) consistent with them. Every
//! mutation goes through [`RunHistory::recompute`] with an explicit trigger;
//! nothing recomputes behind the caller's back.

use std::sync::Arc;

use tracing::debug;

use crate::achievements::AchievementEngine;
use crate::catalog::{Achievement, AchievementContext};
use crate::errors::AppError;
use crate::models::{PersonalRecords, PrCategory, Run, Story};
use crate::records::RecordsStore;
use crate::repository::RunRepository;
use crate::storage::Storage;

/// What changed since the last recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecomputeTrigger {
    RunAdded,
    RunRemoved,
    StoryAdded,
    FullRefresh,
}

pub struct RunHistory {
    runs: Vec<Run>,
    stories: Vec<Story>,
    records_store: RecordsStore,
    records: PersonalRecords,
    achievements: AchievementEngine,
}

impl RunHistory {
    /// Creates an empty history over the given storage, restoring any
    /// persisted PR snapshot and unlocked achievements.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let records_store = RecordsStore::new(storage.clone());
        let records = records_store.load().unwrap_or_default();
        let achievements = AchievementEngine::new(storage);
        Self {
            runs: Vec::new(),
            stories: Vec::new(),
            records_store,
            records,
            achievements,
        }
    }

    /// Hydrates a history with every run the repository holds for the user,
    /// then runs a full refresh.
    pub fn from_repository(
        repository: &dyn RunRepository,
        user_id: &str,
        storage: Arc<dyn Storage>,
    ) -> Result<Self, AppError> {
        let mut history = Self::new(storage);
        history.runs = repository
            .list(user_id)?
            .into_iter()
            .map(|stored| stored.run)
            .collect();
        history.recompute(RecomputeTrigger::FullRefresh);
        Ok(history)
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    /// The current PR snapshot, as of the last recompute.
    pub fn records(&self) -> &PersonalRecords {
        &self.records
    }

    pub fn achievements(&self) -> &AchievementEngine {
        &self.achievements
    }

    pub fn achievements_mut(&mut self) -> &mut AchievementEngine {
        &mut self.achievements
    }

    /// Appends a run and recomputes.
    ///
    /// The returned categories are a display hint: the run judged in
    /// isolation against the snapshot from before the append. The recompute
    /// that follows is authoritative and may disagree.
    pub fn add_run(&mut self, run: Run) -> Vec<PrCategory> {
        let beaten = RecordsStore::check_for_new_prs(&self.records, &run);
        self.runs.push(run);
        self.recompute(RecomputeTrigger::RunAdded);
        beaten
    }

    /// Removes a run by file name. Recomputes only when something was
    /// actually removed; records may move backwards as a result.
    pub fn remove_run(&mut self, file_name: &str) -> bool {
        let before = self.runs.len();
        self.runs.retain(|r| r.file_name != file_name);
        let removed = self.runs.len() != before;
        if removed {
            self.recompute(RecomputeTrigger::RunRemoved);
        }
        removed
    }

    pub fn add_story(&mut self, story: Story) {
        self.stories.push(story);
        self.recompute(RecomputeTrigger::StoryAdded);
    }

    /// Rebuilds derived state. Run-shaped triggers refresh the PR snapshot
    /// first; story triggers skip straight to achievements. Returns any
    /// newly unlocked achievements.
    pub fn recompute(&mut self, trigger: RecomputeTrigger) -> Vec<&'static Achievement> {
        debug!("Recompute triggered: {trigger:?}");
        match trigger {
            RecomputeTrigger::RunAdded
            | RecomputeTrigger::RunRemoved
            | RecomputeTrigger::FullRefresh => {
                self.records = self.records_store.update_best_efforts(&self.runs);
            }
            RecomputeTrigger::StoryAdded => {}
        }
        let ctx = AchievementContext {
            runs: &self.runs,
            stories: &self.stories,
            records: &self.records,
        };
        self.achievements.check(&ctx)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;
    use time::{Duration, OffsetDateTime};

    use super::*;
    use crate::models::{pace_seconds_per_mile, Split, MILE_METERS};
    use crate::repository::MemoryRunRepository;
    use crate::storage::MemoryStorage;

    fn mile_run(file_name: &str, start_time: OffsetDateTime, paces: &[f64]) -> Run {
        let mut splits = Vec::new();
        let mut elapsed = 0.0;
        for (i, &pace) in paces.iter().enumerate() {
            splits.push(Split {
                start_distance: i as f64 * MILE_METERS,
                end_distance: (i + 1) as f64 * MILE_METERS,
                duration: pace,
                pace,
                start_time: start_time + Duration::seconds_f64(elapsed),
            });
            elapsed += pace;
        }
        let total = paces.len() as f64 * MILE_METERS;
        Run {
            file_name: file_name.to_string(),
            start_time,
            points: Vec::new(),
            total_distance: total,
            total_duration: elapsed,
            avg_pace: pace_seconds_per_mile(elapsed, total),
            elevation_gain: 0.0,
            splits,
        }
    }

    #[test]
    fn test_add_run_updates_records_and_achievements() {
        let storage = Arc::new(MemoryStorage::new());
        let mut history = RunHistory::new(storage);

        let beaten = history.add_run(mile_run(
            "first.gpx",
            datetime!(2024-06-01 07:00 UTC),
            &[540.0, 520.0],
        ));
        assert!(beaten.contains(&PrCategory::FastestMile));
        assert!(history.records().fastest_mile.is_some());
        assert!(history.achievements().state().is_unlocked("first-run"));
        assert_eq!(history.runs().len(), 1);
    }

    #[test]
    fn test_remove_run_regresses_records_but_not_unlocks() {
        let storage = Arc::new(MemoryStorage::new());
        let mut history = RunHistory::new(storage);
        let base = datetime!(2024-06-01 07:00 UTC);

        history.add_run(mile_run("slow.gpx", base, &[560.0]));
        history.add_run(mile_run("fast.gpx", base + Duration::days(1), &[470.0]));
        assert_eq!(history.records().fastest_mile.as_ref().unwrap().pace, 470.0);
        assert!(history.achievements().state().is_unlocked("sub-eight-mile"));

        assert!(history.remove_run("fast.gpx"));
        assert_eq!(history.records().fastest_mile.as_ref().unwrap().pace, 560.0);
        // The record regressed; the unlock is permanent.
        assert!(history.achievements().state().is_unlocked("sub-eight-mile"));
    }

    #[test]
    fn test_remove_unknown_run_is_noop() {
        let storage = Arc::new(MemoryStorage::new());
        let mut history = RunHistory::new(storage);
        history.add_run(mile_run("a.gpx", datetime!(2024-06-01 07:00 UTC), &[540.0]));

        assert!(!history.remove_run("missing.gpx"));
        assert_eq!(history.runs().len(), 1);
    }

    #[test]
    fn test_story_trigger_skips_record_refresh() {
        let storage = Arc::new(MemoryStorage::new());
        let mut history = RunHistory::new(storage);
        history.add_run(mile_run("a.gpx", datetime!(2024-06-01 07:00 UTC), &[540.0]));
        let records_before = history.records().clone();

        history.add_story(Story::new(
            "Morning loop".to_string(),
            "Cool and quiet".to_string(),
            datetime!(2024-06-01 20:00 UTC),
        ));
        assert_eq!(history.records(), &records_before);
        assert!(history.achievements().state().is_unlocked("first-story"));
    }

    #[test]
    fn test_from_repository_hydrates_and_refreshes() {
        let repository = MemoryRunRepository::new();
        let base = datetime!(2024-06-01 07:00 UTC);
        repository
            .add("alice", mile_run("a.gpx", base, &[540.0]))
            .unwrap();
        repository
            .add("alice", mile_run("b.gpx", base + Duration::days(1), &[520.0]))
            .unwrap();

        let storage = Arc::new(MemoryStorage::new());
        let history = RunHistory::from_repository(&repository, "alice", storage).unwrap();
        assert_eq!(history.runs().len(), 2);
        assert_eq!(history.records().fastest_mile.as_ref().unwrap().pace, 520.0);
        assert!(history.achievements().state().is_unlocked("first-run"));
    }

    #[test]
    fn test_state_survives_restart_via_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let base = datetime!(2024-06-01 07:00 UTC);
        {
            let mut history = RunHistory::new(storage.clone());
            history.add_run(mile_run("a.gpx", base, &[540.0]));
        }

        // A new history over the same storage restores the snapshot without
        // any runs loaded.
        let history = RunHistory::new(storage);
        assert!(history.runs().is_empty());
        assert_eq!(history.records().fastest_mile.as_ref().unwrap().pace, 540.0);
        assert!(history.achievements().state().is_unlocked("first-run"));
    }

    #[test]
    fn test_full_refresh_idempotent() {
        let storage = Arc::new(MemoryStorage::new());
        let mut history = RunHistory::new(storage);
        history.add_run(mile_run("a.gpx", datetime!(2024-06-01 07:00 UTC), &[540.0]));

        let records_before = history.records().clone();
        let newly = history.recompute(RecomputeTrigger::FullRefresh);
        assert!(newly.is_empty());
        assert_eq!(history.records(), &records_before);
    }
}
