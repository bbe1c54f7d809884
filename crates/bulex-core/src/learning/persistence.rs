//! Pluggable persistence for learning state.
//!
//! Three independent collections are persisted: the rules, the correction
//! history, and the corrections-only audit log. Each is read in full at
//! startup and rewritten in full on every mutation; there is no partial-update
//! protocol.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::record::{AuditEntry, CorrectionRecord};
use super::rule::PatternRule;
use crate::error::PersistenceError;

/// Result type for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Full snapshot of persisted learning state.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// All extraction rules.
    pub rules: Vec<PatternRule>,
    /// Append-only correction history.
    pub history: Vec<CorrectionRecord>,
    /// Corrections-only audit log for external consumption.
    pub audit_log: Vec<AuditEntry>,
}

/// Storage backend for learning state.
pub trait LearningStore {
    /// Load the full snapshot. Missing state yields empty collections.
    fn load(&self) -> Result<Snapshot>;

    /// Persist the full snapshot, overwriting previous state.
    fn save(&self, snapshot: &Snapshot) -> Result<()>;
}

/// File-backed store: one JSON file per collection in a directory.
pub struct JsonFileStore {
    dir: PathBuf,
}

const RULES_FILE: &str = "patterns.json";
const HISTORY_FILE: &str = "corrections.json";
const AUDIT_FILE: &str = "audit_log.json";

impl JsonFileStore {
    /// Create a store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read_collection<T: DeserializeOwned>(&self, file_name: &str) -> Result<Vec<T>> {
        let path = self.dir.join(file_name);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).map_err(|source| PersistenceError::Load {
            collection: file_name.to_string(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|e| PersistenceError::Corrupt {
            collection: file_name.to_string(),
            reason: e.to_string(),
        })
    }

    fn write_collection<T: Serialize>(&self, file_name: &str, items: &[T]) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|source| PersistenceError::Save {
            collection: file_name.to_string(),
            source,
        })?;

        let content = serde_json::to_string_pretty(items).map_err(|e| PersistenceError::Corrupt {
            collection: file_name.to_string(),
            reason: e.to_string(),
        })?;

        let path = self.dir.join(file_name);
        fs::write(&path, content).map_err(|source| PersistenceError::Save {
            collection: file_name.to_string(),
            source,
        })
    }

    /// Directory this store writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl LearningStore for JsonFileStore {
    fn load(&self) -> Result<Snapshot> {
        let snapshot = Snapshot {
            rules: self.read_collection(RULES_FILE)?,
            history: self.read_collection(HISTORY_FILE)?,
            audit_log: self.read_collection(AUDIT_FILE)?,
        };
        debug!(
            "loaded learning state: {} rules, {} corrections",
            snapshot.rules.len(),
            snapshot.history.len()
        );
        Ok(snapshot)
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        self.write_collection(RULES_FILE, &snapshot.rules)?;
        self.write_collection(HISTORY_FILE, &snapshot.history)?;
        self.write_collection(AUDIT_FILE, &snapshot.audit_log)?;
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    snapshot: Mutex<Snapshot>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with a snapshot.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
        }
    }
}

impl LearningStore for MemoryStore {
    fn load(&self) -> Result<Snapshot> {
        Ok(self.snapshot.lock().expect("store lock poisoned").clone())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        *self.snapshot.lock().expect("store lock poisoned") = snapshot.clone();
        Ok(())
    }
}
