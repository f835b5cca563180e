pub mod field;
pub mod group;
pub mod harvester;
pub mod storage;

pub use field::{FieldBinding, PersistedField};
pub use group::FieldGroup;
pub use harvester::{Harvester, KEY_CONJUNCTION, KeyPolicy};
pub use storage::{LoadStrategy, Registry, SaveStrategy};
