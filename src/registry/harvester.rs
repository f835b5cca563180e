use super::{FieldGroup, PersistedField, Registry};
use crate::host::InstanceHost;
use crate::schema::{FieldDecl, TypeTable, VisibilityScope};
use log::warn;

/// Conjunction between save-key segments.
pub const KEY_CONJUNCTION: &str = "->";

/// Which type name goes into a generated default key.
///
/// `ConcreteType` uses the owner's runtime type, so two subclasses sharing
/// an inherited field get distinct keys. `DeclaringType` keys by the level
/// that declared the field instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPolicy {
    #[default]
    ConcreteType,
    DeclaringType,
}

/// Discovers the marked fields of one type and merges them, per live
/// instance, into a registry.
///
/// A type chain is covered by calling [`Harvester::harvest`] once per type,
/// in any order; instance enumeration returns an instance for every type in
/// its chain, and the merge-by-owner step reassembles one coherent group per
/// instance out of those partial visits.
#[derive(Debug, Clone, Default)]
pub struct Harvester {
    scope: VisibilityScope,
    key_policy: KeyPolicy,
}

impl Harvester {
    pub fn new(scope: VisibilityScope) -> Self {
        Self {
            scope,
            key_policy: KeyPolicy::default(),
        }
    }

    pub fn with_key_policy(mut self, policy: KeyPolicy) -> Self {
        self.key_policy = policy;
        self
    }

    pub fn scope(&self) -> VisibilityScope {
        self.scope
    }

    pub fn key_policy(&self) -> KeyPolicy {
        self.key_policy
    }

    /// Harvests one type into `registry`.
    ///
    /// Instances already tracked get the newly discovered fields merged into
    /// their existing group in place. Instances seen for the first time get
    /// a fresh group, returned for the caller to add; nothing already in the
    /// registry is ever yielded again.
    pub fn harvest(
        &self,
        type_name: &str,
        schema: &TypeTable,
        host: &dyn InstanceHost,
        registry: &mut Registry,
    ) -> Vec<FieldGroup> {
        let decls = schema.declared_fields(type_name, self.scope);
        if decls.is_empty() {
            return Vec::new();
        }

        let mut created = Vec::new();
        for id in host.instances_of(type_name) {
            if let Some(group) = registry.group_of_mut(id) {
                self.fill_group(group, type_name, &decls, host);
            } else {
                let mut group = FieldGroup::new(id);
                self.fill_group(&mut group, type_name, &decls, host);
                created.push(group);
            }
        }

        created
    }

    fn fill_group(
        &self,
        group: &mut FieldGroup,
        harvested_type: &str,
        decls: &[&FieldDecl],
        host: &dyn InstanceHost,
    ) {
        for decl in decls {
            let Some(kind) = decl.kind() else {
                warn!(
                    "Skip harvest : field '{}.{}' has unresolvable type '{}'",
                    harvested_type, decl.name, decl.type_name
                );
                continue;
            };

            let explicit = decl.marker.as_ref().and_then(|m| m.explicit_key());
            let save_key = match explicit {
                Some(key) => key.to_string(),
                None => {
                    let key_type = match self.key_policy {
                        KeyPolicy::ConcreteType => {
                            host.concrete_type(group.owner()).unwrap_or(harvested_type)
                        }
                        KeyPolicy::DeclaringType => harvested_type,
                    };
                    group.generate_save_key(KEY_CONJUNCTION, host, key_type, &decl.name)
                }
            };

            group.add_field(PersistedField::bound(
                decl.name.as_str(),
                save_key,
                decl.type_name.as_str(),
                harvested_type,
                kind,
            ));
        }
    }
}
