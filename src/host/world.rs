use super::{InstanceHost, InstanceId};
use crate::core::{Result, StoreError, Value};
use crate::schema::TypeTable;
use std::collections::HashMap;
use std::sync::Arc;

struct WorldObject {
    name: String,
    type_name: String,
    parent: Option<InstanceId>,
    fields: HashMap<String, Value>,
    alive: bool,
}

/// Default in-memory instance host.
///
/// Objects form a parent/child hierarchy and carry one value slot per field
/// declared anywhere in their type chain, initialized from the declared
/// defaults. Handles stay stable after despawn so stale registry entries can
/// observe the death instead of dangling.
pub struct World {
    schema: Arc<TypeTable>,
    context: String,
    objects: Vec<WorldObject>,
}

impl World {
    pub fn new(schema: Arc<TypeTable>, context: impl Into<String>) -> Self {
        Self {
            schema,
            context: context.into(),
            objects: Vec::new(),
        }
    }

    pub fn schema(&self) -> &TypeTable {
        &self.schema
    }

    pub fn spawn(&mut self, type_name: &str, name: &str) -> Result<InstanceId> {
        self.spawn_inner(type_name, name, None)
    }

    pub fn spawn_child(
        &mut self,
        type_name: &str,
        name: &str,
        parent: InstanceId,
    ) -> Result<InstanceId> {
        if !self.is_alive(parent) {
            return Err(StoreError::InstanceGone(parent.0));
        }
        self.spawn_inner(type_name, name, Some(parent))
    }

    fn spawn_inner(
        &mut self,
        type_name: &str,
        name: &str,
        parent: Option<InstanceId>,
    ) -> Result<InstanceId> {
        if !self.schema.contains(type_name) {
            return Err(StoreError::TypeNotFound(type_name.to_string()));
        }

        let mut fields = HashMap::new();
        let mut current = Some(type_name.to_string());
        while let Some(ty) = current {
            let Some(info) = self.schema.get(&ty) else { break };
            for decl in &info.fields {
                // Walking from the concrete type up, so a shadowing
                // declaration wins over the one it hides.
                fields
                    .entry(decl.name.clone())
                    .or_insert_with(|| decl.default.clone());
            }
            current = info.base.clone();
        }

        let id = InstanceId(self.objects.len() as u64);
        self.objects.push(WorldObject {
            name: name.to_string(),
            type_name: type_name.to_string(),
            parent,
            fields,
            alive: true,
        });
        Ok(id)
    }

    /// Marks the instance dead. Its handle stays valid for identity checks.
    pub fn despawn(&mut self, id: InstanceId) {
        if let Some(obj) = self.objects.get_mut(id.0 as usize) {
            obj.alive = false;
        }
    }

    fn object(&self, id: InstanceId) -> Option<&WorldObject> {
        self.objects.get(id.0 as usize).filter(|o| o.alive)
    }
}

impl InstanceHost for World {
    fn instances_of(&self, type_name: &str) -> Vec<InstanceId> {
        self.objects
            .iter()
            .enumerate()
            .filter(|(_, o)| o.alive && self.schema.is_assignable_to(&o.type_name, type_name))
            .map(|(i, _)| InstanceId(i as u64))
            .collect()
    }

    fn is_alive(&self, id: InstanceId) -> bool {
        self.object(id).is_some()
    }

    fn concrete_type(&self, id: InstanceId) -> Option<&str> {
        self.object(id).map(|o| o.type_name.as_str())
    }

    fn display_name(&self, id: InstanceId) -> Option<&str> {
        self.object(id).map(|o| o.name.as_str())
    }

    fn path_of(&self, id: InstanceId) -> Option<String> {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            let obj = self.object(cur)?;
            segments.push(obj.name.clone());
            current = obj.parent;
        }
        segments.reverse();
        Some(segments.join("/"))
    }

    fn context_prefix(&self) -> String {
        self.context.clone()
    }

    fn get_field(&self, id: InstanceId, field: &str) -> Option<Value> {
        self.object(id).and_then(|o| o.fields.get(field).cloned())
    }

    fn set_field(&mut self, id: InstanceId, field: &str, value: Value) -> Result<()> {
        let Some(obj) = self.objects.get_mut(id.0 as usize).filter(|o| o.alive) else {
            return Err(StoreError::InstanceGone(id.0));
        };

        let declared = self
            .schema
            .find_field_in_chain(&obj.type_name, field, crate::schema::VisibilityScope::default());
        let Some((_, decl)) = declared else {
            return Err(StoreError::FieldNotFound(
                field.to_string(),
                obj.type_name.clone(),
            ));
        };

        if let Some(kind) = decl.kind() {
            if !kind.is_compatible(&value) {
                return Err(StoreError::TypeMismatch(format!(
                    "Field '{}' expects {}, got {}",
                    field,
                    kind,
                    value.type_name()
                )));
            }
        }

        obj.fields.insert(field.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDecl, TypeInfo};

    fn demo_schema() -> Arc<TypeTable> {
        let mut table = TypeTable::new();
        table.register(TypeInfo::new("Component"));
        table.register(
            TypeInfo::new("Actor")
                .base("Component")
                .field(FieldDecl::new("hp", "int", Value::Integer(10)).persisted()),
        );
        table.register(
            TypeInfo::new("Mage")
                .base("Actor")
                .field(FieldDecl::new("mana", "int", Value::Integer(5)).persisted()),
        );
        Arc::new(table)
    }

    #[test]
    fn test_spawn_initializes_chain_defaults() {
        let mut world = World::new(demo_schema(), "demo");
        let mage = world.spawn("Mage", "mage").unwrap();
        assert_eq!(world.get_field(mage, "hp"), Some(Value::Integer(10)));
        assert_eq!(world.get_field(mage, "mana"), Some(Value::Integer(5)));
    }

    #[test]
    fn test_instances_of_walks_chain() {
        let mut world = World::new(demo_schema(), "demo");
        let actor = world.spawn("Actor", "a").unwrap();
        let mage = world.spawn("Mage", "m").unwrap();

        assert_eq!(world.instances_of("Actor"), vec![actor, mage]);
        assert_eq!(world.instances_of("Mage"), vec![mage]);
        assert_eq!(world.instances_of("Component").len(), 2);
    }

    #[test]
    fn test_path_joins_ancestors() {
        let mut world = World::new(demo_schema(), "demo");
        let root = world.spawn("Actor", "root").unwrap();
        let child = world.spawn_child("Mage", "child", root).unwrap();
        assert_eq!(world.path_of(child).unwrap(), "root/child");
        assert_eq!(world.path_of(root).unwrap(), "root");
    }

    #[test]
    fn test_despawn_keeps_handle_stable() {
        let mut world = World::new(demo_schema(), "demo");
        let actor = world.spawn("Actor", "a").unwrap();
        world.despawn(actor);

        assert!(!world.is_alive(actor));
        assert!(world.instances_of("Actor").is_empty());
        assert!(world.get_field(actor, "hp").is_none());
        assert!(matches!(
            world.set_field(actor, "hp", Value::Integer(1)),
            Err(StoreError::InstanceGone(_))
        ));
    }

    #[test]
    fn test_set_field_rejects_incompatible_value() {
        let mut world = World::new(demo_schema(), "demo");
        let actor = world.spawn("Actor", "a").unwrap();
        assert!(matches!(
            world.set_field(actor, "hp", Value::Text("oops".into())),
            Err(StoreError::TypeMismatch(_))
        ));
        assert!(matches!(
            world.set_field(actor, "gold", Value::Integer(1)),
            Err(StoreError::FieldNotFound(_, _))
        ));
    }
}
