//! Append-only persisted match history.
//!
//! The whole collection lives in one JSON file and is read-merge-written on
//! every append: the existing records are loaded, the new record is pushed,
//! and the full array is written back synchronously. Reads never fail — a
//! missing or corrupt file degrades to an empty history with a warning,
//! matching the rest of the recoverable-by-design error model.
//!
//! Access is single-process and serial; there is no locking. A multi-writer
//! deployment would need a lock or compare-and-swap around the
//! read-merge-write, which is out of scope here.

use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use crate::error::StoreError;
use crate::types::{MatchDraft, MatchRecord};

/// Persisted, insertion-ordered collection of finished matches.
pub struct MatchStore {
    path: PathBuf,
}

impl MatchStore {
    /// Open a store backed by the given file. The file is created lazily on
    /// the first append.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Assign the draft an id and timestamp, add it to the collection, and
    /// persist the whole collection. Previously stored records are always
    /// carried forward.
    pub fn append(&self, draft: MatchDraft) -> Result<MatchRecord, StoreError> {
        let record = MatchRecord {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            score: draft.score,
            outcome: draft.outcome,
            questions: draft.questions,
        };

        let mut records = self.all();
        records.push(record.clone());
        self.write(&records)?;
        Ok(record)
    }

    /// The full collection, in insertion order. A missing file is an empty
    /// history; an unreadable or unparseable one degrades to empty rather
    /// than surfacing an error.
    pub fn all(&self) -> Vec<MatchRecord> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!("failed to read match store {}: {e}", self.path.display());
                return Vec::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    "match store {} is corrupt, treating history as empty: {e}",
                    self.path.display()
                );
                Vec::new()
            }
        }
    }

    /// Linear scan by id.
    pub fn find_by_id(&self, id: Uuid) -> Option<MatchRecord> {
        self.all().into_iter().find(|m| m.id == id)
    }

    /// Empty the collection.
    pub fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io {
                path: self.path.display().to_string(),
                source: e,
            }),
        }
    }

    fn write(&self, records: &[MatchRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(records)?;
        let io_err = |source| StoreError::Io {
            path: self.path.display().to_string(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(&self.path, json).map_err(io_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MatchOutcome, Operator, Problem};

    fn draft(score: u32) -> MatchDraft {
        let mut question = Problem::ungraded(Operator::Add, 2, 3, 5);
        question.grade(5, 900);
        MatchDraft {
            score,
            outcome: MatchOutcome::Timed {
                attempted: 1,
                timer_duration_secs: 60,
            },
            questions: vec![question],
        }
    }

    #[test]
    fn append_then_find_by_id_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = MatchStore::open(dir.path().join("matches.json"));

        let record = store.append(draft(1)).unwrap();
        let found = store.find_by_id(record.id).expect("record by id");
        assert_eq!(found, record);
    }

    #[test]
    fn append_merges_with_existing_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = MatchStore::open(dir.path().join("matches.json"));

        let first = store.append(draft(1)).unwrap();
        let second = store.append(draft(2)).unwrap();

        let all = store.all();
        assert_eq!(all.len(), 2);
        // Insertion order is preserved.
        assert_eq!(all[0].id, first.id);
        assert_eq!(all[1].id, second.id);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn missing_file_is_an_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = MatchStore::open(dir.path().join("matches.json"));
        assert!(store.all().is_empty());
        assert!(store.find_by_id(Uuid::new_v4()).is_none());
    }

    #[test]
    fn corrupt_file_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matches.json");
        std::fs::write(&path, "][ definitely not json").unwrap();

        let store = MatchStore::open(&path);
        assert!(store.all().is_empty());

        // Appending over a corrupt file starts a fresh collection.
        store.append(draft(3)).unwrap();
        assert_eq!(store.all().len(), 1);
    }

    #[test]
    fn clear_empties_the_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = MatchStore::open(dir.path().join("matches.json"));

        store.append(draft(1)).unwrap();
        store.clear().unwrap();
        assert!(store.all().is_empty());

        // Clearing an already-empty store is fine.
        store.clear().unwrap();
    }
}
