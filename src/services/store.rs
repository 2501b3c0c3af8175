//! Interval configuration record store

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    error::{StoreError, TimerError},
    state::sequencer::validate,
};

/// A saved interval configuration, keyed by its creation time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalConfig {
    pub work_ms: i64,
    pub rest_ms: i64,
    pub repetitions: i64,
    pub timestamp: DateTime<Utc>,
}

impl IntervalConfig {
    /// Create a record stamped with the current time
    pub fn new(work_ms: i64, rest_ms: i64, repetitions: i64) -> Self {
        Self {
            work_ms,
            rest_ms,
            repetitions,
            timestamp: Utc::now(),
        }
    }

    /// Reject negative durations and fewer than one repetition
    pub fn validate(&self) -> Result<(), TimerError> {
        validate(self.work_ms, self.rest_ms, self.repetitions).map(|_| ())
    }
}

impl Default for IntervalConfig {
    /// Used when nothing has been saved yet
    fn default() -> Self {
        Self {
            work_ms: 0,
            rest_ms: 0,
            repetitions: 1,
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

/// Record store backed by a JSON file, or memory only when no path is given
#[derive(Debug)]
pub struct IntervalStore {
    path: Option<PathBuf>,
    records: Mutex<Vec<IntervalConfig>>,
}

impl IntervalStore {
    /// Open the store at `path`; a missing file is an empty store
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Vec::new()
        };

        info!("Loaded {} interval records from {}", records.len(), path.display());
        Ok(Self {
            path: Some(path),
            records: Mutex::new(records),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Most recently created record, or the default configuration
    pub fn latest(&self) -> Result<IntervalConfig, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records
            .iter()
            .max_by_key(|record| record.timestamp)
            .cloned()
            .unwrap_or_default())
    }

    /// Replace the record with the same timestamp, or insert it.
    ///
    /// The in-memory records only change once the file has been written, so a
    /// failed write leaves memory and disk in agreement.
    pub fn upsert(&self, record: IntervalConfig) -> Result<(), StoreError> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        let mut updated = records.clone();
        match updated.iter_mut().find(|existing| existing.timestamp == record.timestamp) {
            Some(existing) => *existing = record,
            None => updated.push(record),
        }

        if let Some(path) = &self.path {
            persist(path, &updated)?;
            debug!("Persisted {} interval records to {}", updated.len(), path.display());
        }
        *records = updated;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Write to a sibling temp file, then rename it over `path`
fn persist(path: &Path, records: &[IntervalConfig]) -> Result<(), StoreError> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_string_pretty(records)?)?;
    if let Err(e) = fs::rename(&tmp, path) {
        if let Err(cleanup) = fs::remove_file(&tmp) {
            warn!("Failed to remove {}: {}", tmp.display(), cleanup);
        }
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn empty_store_yields_default_configuration() {
        let store = IntervalStore::in_memory();
        let latest = store.latest().unwrap();
        assert_eq!((latest.work_ms, latest.rest_ms, latest.repetitions), (0, 0, 1));
        assert!(store.is_empty());
    }

    #[test]
    fn latest_is_the_most_recent_record() {
        let store = IntervalStore::in_memory();
        let older = IntervalConfig::new(30_000, 10_000, 8);
        let mut newer = IntervalConfig::new(45_000, 15_000, 4);
        newer.timestamp = older.timestamp + Duration::seconds(5);

        store.upsert(newer.clone()).unwrap();
        store.upsert(older).unwrap();
        assert_eq!(store.latest().unwrap(), newer);
    }

    #[test]
    fn upsert_replaces_record_with_same_timestamp() {
        let store = IntervalStore::in_memory();
        let mut record = IntervalConfig::new(1000, 500, 2);
        store.upsert(record.clone()).unwrap();

        record.repetitions = 6;
        store.upsert(record.clone()).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.latest().unwrap().repetitions, 6);
    }

    #[test]
    fn records_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intervals.json");

        let record = IntervalConfig::new(20_000, 10_000, 3);
        IntervalStore::open(&path).unwrap().upsert(record.clone()).unwrap();

        let reopened = IntervalStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.latest().unwrap(), record);
    }

    #[test]
    fn failed_write_leaves_records_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("intervals.json");
        let store = IntervalStore::open(&path).unwrap();

        let result = store.upsert(IntervalConfig::new(20_000, 10_000, 3));
        assert!(matches!(result, Err(StoreError::Io(_))));
        assert!(store.is_empty());
        assert_eq!(store.latest().unwrap(), IntervalConfig::default());
        assert!(!path.exists());
    }

    #[test]
    fn successful_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intervals.json");
        let store = IntervalStore::open(&path).unwrap();

        store.upsert(IntervalConfig::new(1000, 500, 2)).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intervals.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(IntervalStore::open(&path), Err(StoreError::Json(_))));
    }

    #[test]
    fn validate_checks_ranges() {
        assert!(IntervalConfig::new(0, 0, 1).validate().is_ok());
        assert!(IntervalConfig::new(1000, 500, 0).validate().is_err());
        assert!(IntervalConfig::new(-5, 500, 1).validate().is_err());
    }
}
