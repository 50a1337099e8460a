//! In-process destination store with optional JSON persistence.

use dashmap::DashMap;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::store::{DestinationRecord, DestinationStore, StoreError};

/// A thread-safe map of identifier → destination record.
///
/// Writes are serialized by `write_lock`: insert, snapshot and file
/// replacement happen as one step, so the file always holds a complete map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<DashMap<String, DestinationRecord>>,
    persistence_path: Option<PathBuf>,
    write_lock: Arc<Mutex<()>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new(persistence_path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            persistence_path,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Load from file if it exists; later writes go to the same file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let store = Self::new(Some(path.to_path_buf()));
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            let map: HashMap<String, DestinationRecord> = serde_json::from_reader(reader)?;
            for (id, record) in map {
                store.inner.insert(id, record);
            }
            tracing::info!(count = store.inner.len(), path = ?path, "Loaded destination records");
        }
        Ok(store)
    }

    /// Save to file.
    pub fn save_to_file(&self) -> Result<(), StoreError> {
        let _guard = self.lock_writes();
        self.write_snapshot()
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Write the current map to a sibling temp file, then rename it over the
    /// target. Caller holds `write_lock`.
    fn write_snapshot(&self) -> Result<(), StoreError> {
        let Some(path) = &self.persistence_path else {
            return Ok(());
        };
        let map: HashMap<_, _> = self
            .inner
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let mut writer = BufWriter::new(File::create(&tmp)?);
        serde_json::to_writer(&mut writer, &map)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        drop(writer);
        fs::rename(&tmp, path)?;

        tracing::debug!(count = map.len(), path = ?path, "Saved destination records");
        Ok(())
    }
}

impl DestinationStore for MemoryStore {
    fn get(&self, id: &str) -> Option<DestinationRecord> {
        self.inner.get(id).map(|r| r.value().clone())
    }

    fn put(&self, id: &str, record: DestinationRecord) -> Result<(), StoreError> {
        let _guard = self.lock_writes();
        let previous = self.inner.insert(id.to_string(), record);
        if let Err(e) = self.write_snapshot() {
            match previous {
                Some(previous) => {
                    self.inner.insert(id.to_string(), previous);
                }
                None => {
                    self.inner.remove(id);
                }
            }
            return Err(e);
        }
        Ok(())
    }

    fn contains(&self, id: &str) -> bool {
        self.inner.contains_key(id)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}
