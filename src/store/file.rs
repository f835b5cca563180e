use super::BackingStore;
use super::memory::{MemoryStore, StoredEntry};
use crate::core::{Result, StoreError, Value, ValueKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tempfile::NamedTempFile;

#[derive(Debug, Serialize, Deserialize)]
struct StoreSnapshot {
    version: u32,
    entries: HashMap<String, StoredEntry>,
    metadata: SnapshotMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotMetadata {
    created_at: u64,
    entry_count: usize,
}

/// Durable backing store: in-memory entries plus a MessagePack snapshot
/// file. `persist` writes a temp file in the target directory and renames it
/// over the snapshot path, so a crash mid-write leaves the previous snapshot
/// intact.
#[derive(Debug)]
pub struct FileStore {
    memory: MemoryStore,
    path: PathBuf,
}

impl FileStore {
    /// Opens a store at `path`, loading an existing snapshot if one is
    /// there.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut memory = MemoryStore::new();

        if path.exists() {
            let data = fs::read(&path)?;
            let snapshot: StoreSnapshot = rmp_serde::from_slice(&data)
                .map_err(|e| StoreError::SerializeError(format!("Corrupt snapshot: {}", e)))?;
            memory.replace_entries(snapshot.entries);
        }

        Ok(Self { memory, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.memory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.memory.contains(key)
    }
}

impl BackingStore for FileStore {
    fn set(&mut self, kind: ValueKind, key: &str, value: Value) {
        self.memory.set(kind, key, value);
    }

    fn get(&self, kind: ValueKind, key: &str) -> Option<Value> {
        self.memory.get(kind, key)
    }

    fn persist(&mut self) -> Result<()> {
        let entries = self.memory.entries().clone();
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        let snapshot = StoreSnapshot {
            version: 1,
            metadata: SnapshotMetadata {
                created_at,
                entry_count: entries.len(),
            },
            entries,
        };

        let serialized = rmp_serde::to_vec(&snapshot)
            .map_err(|e| StoreError::SerializeError(format!("Failed to serialize snapshot: {}", e)))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut temp = NamedTempFile::new_in(&dir)?;
        temp.write_all(&serialized)?;
        temp.flush()?;
        temp.persist(&self.path)
            .map_err(|e| StoreError::IoError(format!("Failed to replace snapshot: {}", e)))?;

        log::debug!("Persisted {} entries to {}", snapshot.metadata.entry_count, self.path.display());
        Ok(())
    }
}
