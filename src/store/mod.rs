pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::core::{Result, Value, ValueKind};

/// The key-value backing store consumed by the registry's default save/load
/// path. Values are tagged with their kind; a lookup under the wrong kind is
/// a miss, not an error.
pub trait BackingStore {
    fn set(&mut self, kind: ValueKind, key: &str, value: Value);

    fn get(&self, kind: ValueKind, key: &str) -> Option<Value>;

    /// Flushes buffered state to durable storage. A no-op for purely
    /// in-memory stores.
    fn persist(&mut self) -> Result<()>;
}
