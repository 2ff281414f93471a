//! Durable storage for the learning store.
//!
//! The store persists as a single versioned JSON blob holding patterns,
//! the capped example history, and counters. The backend is an explicit
//! injected trait so tests run against an in-memory fake and production
//! can swap storage without touching pipeline logic. Persistence is
//! best-effort everywhere: the request path logs failures and continues.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{MenderError, Result};
use crate::learning::{LearningExample, LearningMetrics, LearningPattern};

/// Current schema version for the learning snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Default filename for the learning snapshot.
pub const SNAPSHOT_FILENAME: &str = "learning.json";

/// The durable blob: everything the store needs to resume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningSnapshot {
    /// Schema version for forward compatibility.
    pub version: u32,
    pub patterns: Vec<LearningPattern>,
    pub examples: Vec<LearningExample>,
    pub metrics: LearningMetrics,
    pub timestamp: DateTime<Utc>,
}

impl LearningSnapshot {
    pub fn new(
        patterns: Vec<LearningPattern>,
        examples: Vec<LearningExample>,
        metrics: LearningMetrics,
    ) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            patterns,
            examples,
            metrics,
            timestamp: Utc::now(),
        }
    }
}

/// Storage backend for [`LearningSnapshot`]s.
pub trait LearningBackend: Send + Sync {
    /// Load the last saved snapshot, if any.
    fn load(&self) -> Result<Option<LearningSnapshot>>;

    /// Persist a snapshot, replacing any previous one.
    fn save(&self, snapshot: &LearningSnapshot) -> Result<()>;
}

// ============================================================================
// JSON file backend
// ============================================================================

/// File-backed storage: one JSON blob, written atomically.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    data_dir: PathBuf,
}

impl JsonFileBackend {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    /// Returns the path to the snapshot file.
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(SNAPSHOT_FILENAME)
    }
}

impl LearningBackend for JsonFileBackend {
    fn load(&self) -> Result<Option<LearningSnapshot>> {
        let path = self.snapshot_path();
        if !path.exists() {
            return Ok(None);
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Failed to read learning snapshot: {}", e);
                return Ok(None);
            }
        };

        let snapshot: LearningSnapshot = match serde_json::from_str(&content) {
            Ok(s) => s,
            Err(e) => {
                warn!("Learning snapshot is corrupted, starting fresh: {}", e);
                return Ok(None);
            }
        };

        if snapshot.version > SNAPSHOT_VERSION {
            warn!(
                "Learning snapshot version {} is newer than supported {}, starting fresh",
                snapshot.version, SNAPSHOT_VERSION
            );
            return Ok(None);
        }

        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &LearningSnapshot) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)
            .map_err(|e| MenderError::storage(format!("create data dir: {}", e)))?;

        let path = self.snapshot_path();
        let temp_path = self.data_dir.join(format!("{}.tmp", SNAPSHOT_FILENAME));

        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| MenderError::storage(format!("serialize snapshot: {}", e)))?;
        std::fs::write(&temp_path, json)
            .map_err(|e| MenderError::storage(format!("write snapshot: {}", e)))?;
        std::fs::rename(&temp_path, &path)
            .map_err(|e| MenderError::storage(format!("replace snapshot: {}", e)))?;

        Ok(())
    }
}

// ============================================================================
// In-memory backend
// ============================================================================

/// Test fake holding the snapshot in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slot: Mutex<Option<LearningSnapshot>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a snapshot has been stored.
    pub fn has_snapshot(&self) -> bool {
        self.slot.lock().map(|s| s.is_some()).unwrap_or(false)
    }
}

impl LearningBackend for MemoryBackend {
    fn load(&self) -> Result<Option<LearningSnapshot>> {
        Ok(self
            .slot
            .lock()
            .map_err(|_| MenderError::storage("memory backend poisoned"))?
            .clone())
    }

    fn save(&self, snapshot: &LearningSnapshot) -> Result<()> {
        *self
            .slot
            .lock()
            .map_err(|_| MenderError::storage("memory backend poisoned"))? =
            Some(snapshot.clone());
        Ok(())
    }
}

/// Backend that fails every operation. Used to verify that persistence
/// failures are swallowed on the request path.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FailingBackend;

#[cfg(test)]
impl LearningBackend for FailingBackend {
    fn load(&self) -> Result<Option<LearningSnapshot>> {
        Err(MenderError::storage("load always fails"))
    }

    fn save(&self, _snapshot: &LearningSnapshot) -> Result<()> {
        Err(MenderError::storage("save always fails"))
    }
}
