//! Run repository contract.
//!
//! The production backend (a remote store keyed by user) lives outside this
//! crate; the engine only consumes this interface. `MemoryRunRepository`
//! backs tests and local use.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Run;

/// A run as the repository stores it: the run plus server-side metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRun {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at: OffsetDateTime,
    pub run: Run,
}

/// Per-user CRUD over stored runs.
pub trait RunRepository: Send + Sync {
    /// Stores a run for the user and returns it with its assigned identity.
    fn add(&self, user_id: &str, run: Run) -> Result<StoredRun, AppError>;

    /// All stored runs of the user, in upload order.
    fn list(&self, user_id: &str) -> Result<Vec<StoredRun>, AppError>;

    /// Deletes a stored run. Deleting an unknown id is not an error.
    fn delete(&self, user_id: &str, run_id: Uuid) -> Result<(), AppError>;
}

#[derive(Debug, Default)]
pub struct MemoryRunRepository {
    runs: Mutex<HashMap<String, Vec<StoredRun>>>,
}

impl MemoryRunRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RunRepository for MemoryRunRepository {
    fn add(&self, user_id: &str, run: Run) -> Result<StoredRun, AppError> {
        let stored = StoredRun {
            id: Uuid::new_v4(),
            uploaded_at: OffsetDateTime::now_utc(),
            run,
        };
        let mut runs = self.runs.lock().unwrap();
        runs.entry(user_id.to_string())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    fn list(&self, user_id: &str) -> Result<Vec<StoredRun>, AppError> {
        let runs = self.runs.lock().unwrap();
        Ok(runs.get(user_id).cloned().unwrap_or_default())
    }

    fn delete(&self, user_id: &str, run_id: Uuid) -> Result<(), AppError> {
        let mut runs = self.runs.lock().unwrap();
        if let Some(list) = runs.get_mut(user_id) {
            list.retain(|stored| stored.id != run_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn sample_run(file_name: &str) -> Run {
        Run {
            file_name: file_name.to_string(),
            start_time: datetime!(2024-06-01 07:00 UTC),
            points: Vec::new(),
            total_distance: 5_000.0,
            total_duration: 1_500.0,
            avg_pace: 482.8,
            elevation_gain: 40.0,
            splits: Vec::new(),
        }
    }

    #[test]
    fn test_add_list_delete() {
        let repo = MemoryRunRepository::new();

        let stored = repo.add("alice", sample_run("a.gpx")).unwrap();
        repo.add("alice", sample_run("b.gpx")).unwrap();
        repo.add("bob", sample_run("c.gpx")).unwrap();

        let runs = repo.list("alice").unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].run.file_name, "a.gpx");
        assert_eq!(runs[1].run.file_name, "b.gpx");

        repo.delete("alice", stored.id).unwrap();
        let runs = repo.list("alice").unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].run.file_name, "b.gpx");

        // Other users are untouched.
        assert_eq!(repo.list("bob").unwrap().len(), 1);
    }

    #[test]
    fn test_list_unknown_user_is_empty() {
        let repo = MemoryRunRepository::new();
        assert!(repo.list("nobody").unwrap().is_empty());
    }

    #[test]
    fn test_delete_unknown_id_is_ok() {
        let repo = MemoryRunRepository::new();
        repo.add("alice", sample_run("a.gpx")).unwrap();
        assert!(repo.delete("alice", Uuid::new_v4()).is_ok());
        assert_eq!(repo.list("alice").unwrap().len(), 1);
    }
}
