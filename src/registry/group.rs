use super::PersistedField;
use crate::host::{InstanceHost, InstanceId};

/// The set of persisted fields belonging to one live instance.
///
/// Owner identity is the handle, never value equality. Groups are extended
/// in place as later harvest passes discover fields on other levels of the
/// owner's type chain.
#[derive(Debug, Clone)]
pub struct FieldGroup {
    owner: InstanceId,
    fields: Vec<PersistedField>,
}

impl FieldGroup {
    pub fn new(owner: InstanceId) -> Self {
        Self {
            owner,
            fields: Vec::new(),
        }
    }

    pub fn owner(&self) -> InstanceId {
        self.owner
    }

    pub fn fields(&self) -> &[PersistedField] {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut [PersistedField] {
        &mut self.fields
    }

    pub fn field(&self, name: &str) -> Option<&PersistedField> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Adds a field unless one with the same name is already tracked; the
    /// existing entry wins and is left untouched.
    pub fn add_field(&mut self, field: PersistedField) -> &PersistedField {
        match self.fields.iter().position(|f| f.name() == field.name()) {
            Some(idx) => &self.fields[idx],
            None => {
                self.fields.push(field);
                &self.fields[self.fields.len() - 1]
            }
        }
    }

    /// The group's default key prefix: context identity plus the owner's
    /// hierarchy path. Empty when the owner is gone.
    pub fn full_name(&self, conjunction: &str, host: &dyn InstanceHost) -> String {
        let Some(path) = host.path_of(self.owner) else {
            return String::new();
        };
        format!("{}{}{}", host.context_prefix(), conjunction, path)
    }

    /// Default save key for one field: prefix, a type full name, and the
    /// field name. Which type name goes in is the caller's choice (concrete
    /// versus declaring); see [`crate::registry::KeyPolicy`].
    pub fn generate_save_key(
        &self,
        conjunction: &str,
        host: &dyn InstanceHost,
        type_name: &str,
        field_name: &str,
    ) -> String {
        format!(
            "{}{}{}.{}",
            self.full_name(conjunction, host),
            conjunction,
            type_name,
            field_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Value, ValueKind};
    use crate::host::World;
    use crate::schema::{FieldDecl, TypeInfo, TypeTable};
    use std::sync::Arc;

    fn demo_world() -> World {
        let mut table = TypeTable::new();
        table.register(
            TypeInfo::new("Actor")
                .field(FieldDecl::new("hp", "int", Value::Integer(10)).persisted()),
        );
        World::new(Arc::new(table), "acme:game:level1")
    }

    #[test]
    fn test_add_field_dedupes_by_name() {
        let mut world = demo_world();
        let actor = world.spawn("Actor", "hero").unwrap();
        let mut group = FieldGroup::new(actor);

        group.add_field(PersistedField::bound("hp", "k1", "int", "Actor", ValueKind::Integer));
        group.add_field(PersistedField::bound("hp", "k2", "int", "Actor", ValueKind::Integer));

        assert_eq!(group.fields().len(), 1);
        assert_eq!(group.field("hp").unwrap().save_key(), "k1");
    }

    #[test]
    fn test_save_key_shape() {
        let mut world = demo_world();
        let actor = world.spawn("Actor", "hero").unwrap();
        let group = FieldGroup::new(actor);

        let key = group.generate_save_key("->", &world, "Actor", "hp");
        assert_eq!(key, "acme:game:level1->hero->Actor.hp");
    }

    #[test]
    fn test_full_name_of_dead_owner_is_empty() {
        let mut world = demo_world();
        let actor = world.spawn("Actor", "hero").unwrap();
        let group = FieldGroup::new(actor);
        world.despawn(actor);
        assert_eq!(group.full_name("->", &world), "");
    }
}
