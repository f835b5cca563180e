// ============================================================================
// Fieldstore Library
// ============================================================================

pub mod controller;
pub mod core;
pub mod host;
pub mod registry;
pub mod schema;
pub mod store;

// Re-export main types for convenience
pub use controller::Controller;
pub use crate::core::{Result, StoreError, Value, ValueKind};
pub use host::{InstanceHost, InstanceId, World};
pub use registry::{
    FieldBinding, FieldGroup, Harvester, KEY_CONJUNCTION, KeyPolicy, LoadStrategy, PersistedField,
    Registry, SaveStrategy,
};
pub use schema::{FieldDecl, PersistMarker, TypeInfo, TypeTable, Visibility, VisibilityScope};
pub use store::{BackingStore, FileStore, MemoryStore};
