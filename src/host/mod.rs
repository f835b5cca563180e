pub mod world;

pub use world::World;

use crate::core::{Result, Value};
use std::fmt;

/// Opaque handle to a live instance inside a host.
///
/// The registry compares owners by handle, never by value; the handle is a
/// non-owning back-reference and says nothing about instance lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The capabilities the core borrows from the surrounding application:
/// instance enumeration, hierarchy paths, context identity, and field
/// value access.
///
/// The core never owns instance lifetime; a destroyed instance must surface
/// as `is_alive() == false`, not as a panic.
pub trait InstanceHost {
    /// All live instances assignable to `type_name`, i.e. instances of the
    /// type itself and of every subtype.
    fn instances_of(&self, type_name: &str) -> Vec<InstanceId>;

    fn is_alive(&self, id: InstanceId) -> bool;

    /// The concrete runtime type of the instance.
    fn concrete_type(&self, id: InstanceId) -> Option<&str>;

    fn display_name(&self, id: InstanceId) -> Option<&str>;

    /// Ancestor-joined hierarchy path, root first.
    fn path_of(&self, id: InstanceId) -> Option<String>;

    /// Process/application/scene identity used as the save-key prefix.
    fn context_prefix(&self) -> String;

    /// Current value of a field on a live instance.
    fn get_field(&self, id: InstanceId, field: &str) -> Option<Value>;

    /// Writes a value back through to the instance. Fails on a dead
    /// instance, an unknown field, or an incompatible value.
    fn set_field(&mut self, id: InstanceId, field: &str, value: Value) -> Result<()>;
}
