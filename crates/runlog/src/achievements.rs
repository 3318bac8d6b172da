//! Achievement unlock tracking.
//!
//! The unlocked set only ever grows: rules whose inputs later regress (a
//! deleted run, a lowered record) keep their unlocks. Unlocks persist as a
//! JSON array of catalog IDs; unknown or corrupt stored data degrades to an
//! empty set and the next check rebuilds whatever is still true.

use std::sync::Arc;

use tracing::{info, warn};

use crate::catalog::{self, Achievement, AchievementContext};
use crate::storage::{Storage, StorageError};

/// Fixed storage key of the persisted unlock list.
pub const ACHIEVEMENTS_STORAGE_KEY: &str = "unlocked_achievements";

/// Unlock state: the persistent ID set plus the transient newly-unlocked
/// list shown to the user once. Fields are private so the set stays
/// append-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AchievementState {
    unlocked: Vec<String>,
    newly_unlocked: Vec<String>,
}

impl AchievementState {
    /// Unlocked IDs in unlock order.
    pub fn unlocked_ids(&self) -> &[String] {
        &self.unlocked
    }

    /// IDs unlocked since the last [`AchievementState::clear_newly_unlocked`].
    pub fn newly_unlocked(&self) -> &[String] {
        &self.newly_unlocked
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.iter().any(|u| u == id)
    }

    /// Called after the newly-unlocked list has been displayed.
    pub fn clear_newly_unlocked(&mut self) {
        self.newly_unlocked.clear();
    }

    fn record(&mut self, id: &str) {
        if !self.is_unlocked(id) {
            self.unlocked.push(id.to_string());
            self.newly_unlocked.push(id.to_string());
        }
    }
}

/// Evaluates the catalog against the log and keeps the unlock state current.
pub struct AchievementEngine {
    storage: Arc<dyn Storage>,
    state: AchievementState,
}

impl AchievementEngine {
    /// Restores previously unlocked IDs from storage; missing or corrupt
    /// data starts the state empty.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let state = AchievementState {
            unlocked: load_unlocked(storage.as_ref()),
            newly_unlocked: Vec::new(),
        };
        Self { storage, state }
    }

    pub fn state(&self) -> &AchievementState {
        &self.state
    }

    /// Resolves the newly-unlocked IDs to their catalog definitions.
    pub fn newly_unlocked(&self) -> Vec<&'static Achievement> {
        self.state
            .newly_unlocked
            .iter()
            .filter_map(|id| catalog::find(id))
            .collect()
    }

    pub fn clear_newly_unlocked(&mut self) {
        self.state.clear_newly_unlocked();
    }

    /// Evaluates all still-locked rules, merges the newly true ones into the
    /// unlocked set, persists it, and returns the new unlocks in catalog
    /// order. Checking again with unchanged input returns nothing.
    pub fn check(&mut self, ctx: &AchievementContext<'_>) -> Vec<&'static Achievement> {
        let newly = catalog::check_achievements(ctx, self.state.unlocked_ids());
        if newly.is_empty() {
            return newly;
        }
        for achievement in &newly {
            self.state.record(achievement.id);
            info!("Achievement unlocked: {} ({})", achievement.id, achievement.title);
        }
        if let Err(e) = self.save() {
            warn!("Failed to persist unlocked achievements: {e}");
        }
        newly
    }

    fn save(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.state.unlocked)?;
        self.storage.set(ACHIEVEMENTS_STORAGE_KEY, &json)
    }
}

fn load_unlocked(storage: &dyn Storage) -> Vec<String> {
    let raw = match storage.get(ACHIEVEMENTS_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("Failed to read unlocked achievements: {e}");
            return Vec::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(ids) => ids,
        Err(e) => {
            warn!("Discarding corrupt unlocked achievement list: {e}");
            Vec::new()
        }
    }
}
