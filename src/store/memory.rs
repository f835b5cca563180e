use super::BackingStore;
use crate::core::{Result, Value, ValueKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StoredEntry {
    pub kind: ValueKind,
    pub value: Value,
}

/// Purely in-memory backing store. `persist` is a no-op.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, StoredEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub(crate) fn entries(&self) -> &HashMap<String, StoredEntry> {
        &self.entries
    }

    pub(crate) fn replace_entries(&mut self, entries: HashMap<String, StoredEntry>) {
        self.entries = entries;
    }
}

impl BackingStore for MemoryStore {
    fn set(&mut self, kind: ValueKind, key: &str, value: Value) {
        self.entries
            .insert(key.to_string(), StoredEntry { kind, value });
    }

    fn get(&self, kind: ValueKind, key: &str) -> Option<Value> {
        self.entries
            .get(key)
            .filter(|entry| entry.kind == kind)
            .map(|entry| entry.value.clone())
    }

    fn persist(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_roundtrip() {
        let mut store = MemoryStore::new();
        store.set(ValueKind::Integer, "a", Value::Integer(7));
        assert_eq!(store.get(ValueKind::Integer, "a"), Some(Value::Integer(7)));
    }

    #[test]
    fn test_kind_mismatch_is_a_miss() {
        let mut store = MemoryStore::new();
        store.set(ValueKind::Integer, "a", Value::Integer(7));
        assert_eq!(store.get(ValueKind::Text, "a"), None);
        assert_eq!(store.get(ValueKind::Integer, "missing"), None);
    }

    #[test]
    fn test_set_replaces() {
        let mut store = MemoryStore::new();
        store.set(ValueKind::Integer, "a", Value::Integer(1));
        store.set(ValueKind::Integer, "a", Value::Integer(2));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(ValueKind::Integer, "a"), Some(Value::Integer(2)));
    }
}
