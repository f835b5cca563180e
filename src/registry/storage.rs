use super::{FieldGroup, PersistedField};
use crate::core::Result;
use crate::host::{InstanceHost, InstanceId};
use crate::schema::{TypeTable, VisibilityScope};
use crate::store::BackingStore;
use log::warn;

/// Custom save backend. When registered it receives the full group list and
/// fully replaces the default key-value path.
pub trait SaveStrategy {
    fn save(&mut self, groups: &[FieldGroup], host: &dyn InstanceHost) -> Result<()>;
}

/// Custom load backend, symmetric to [`SaveStrategy`].
pub trait LoadStrategy {
    fn load(&mut self, groups: &[FieldGroup], host: &mut dyn InstanceHost) -> Result<()>;
}

/// The in-memory aggregate of all field groups, with bulk save/load against
/// a backing store and optional strategy overrides.
///
/// Group order is free to change (rebuild sorts by owner display name);
/// field access in the store is keyed by save key, never by position.
pub struct Registry {
    groups: Vec<FieldGroup>,
    scope: VisibilityScope,
    saver: Option<Box<dyn SaveStrategy>>,
    loader: Option<Box<dyn LoadStrategy>>,
}

impl Registry {
    pub fn new(scope: VisibilityScope) -> Self {
        Self {
            groups: Vec::new(),
            scope,
            saver: None,
            loader: None,
        }
    }

    pub fn scope(&self) -> VisibilityScope {
        self.scope
    }

    pub fn groups(&self) -> &[FieldGroup] {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> &mut [FieldGroup] {
        &mut self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn add_group(&mut self, group: FieldGroup) {
        self.groups.push(group);
    }

    /// Discards every group. The only way stale entries leave the registry.
    pub fn clear(&mut self) {
        self.groups.clear();
    }

    /// Looks up the group owned by `owner`, by handle identity.
    pub fn group_of(&self, owner: InstanceId) -> Option<&FieldGroup> {
        self.groups.iter().find(|g| g.owner() == owner)
    }

    pub fn group_of_mut(&mut self, owner: InstanceId) -> Option<&mut FieldGroup> {
        self.groups.iter_mut().find(|g| g.owner() == owner)
    }

    /// Stable sort by owner display name, for deterministic enumeration.
    pub fn sort_by_owner_name(&mut self, host: &dyn InstanceHost) {
        self.groups.sort_by(|a, b| {
            let an = host.display_name(a.owner()).unwrap_or_default();
            let bn = host.display_name(b.owner()).unwrap_or_default();
            an.cmp(bn)
        });
    }

    pub fn for_each(&self, mut action: impl FnMut(&FieldGroup, &PersistedField)) {
        for group in &self.groups {
            for field in group.fields() {
                action(group, field);
            }
        }
    }

    pub fn set_save_strategy(&mut self, strategy: Box<dyn SaveStrategy>) {
        self.saver = Some(strategy);
    }

    pub fn set_load_strategy(&mut self, strategy: Box<dyn LoadStrategy>) {
        self.loader = Some(strategy);
    }

    /// Writes every valid field's current value to the backing store and
    /// asks the store to persist. A registered save strategy replaces the
    /// whole default path, store untouched.
    ///
    /// Per-field problems are skipped and logged; they never abort the
    /// batch.
    pub fn save(
        &mut self,
        schema: &TypeTable,
        host: &dyn InstanceHost,
        store: &mut dyn BackingStore,
    ) -> Result<()> {
        if let Some(saver) = self.saver.as_mut() {
            return saver.save(&self.groups, host);
        }

        let scope = self.scope;
        for group in &mut self.groups {
            let owner = group.owner();
            for field in group.fields_mut() {
                if !check_validity(owner, field, schema, host, scope, "save") {
                    continue;
                }
                let Some(kind) = field.kind() else { continue };
                let Some(value) = host.get_field(owner, field.name()) else {
                    warn!("Skip save : no value for '{}' on {}", field.name(), owner);
                    continue;
                };
                store.set(kind, field.save_key(), value);
            }
        }

        store.persist()
    }

    /// Reads every valid field's stored value back into its instance. A
    /// store miss leaves the field's in-memory value untouched; a write
    /// failure through the host is skipped and logged.
    pub fn load(
        &mut self,
        schema: &TypeTable,
        host: &mut dyn InstanceHost,
        store: &dyn BackingStore,
    ) -> Result<()> {
        if let Some(loader) = self.loader.as_mut() {
            return loader.load(&self.groups, host);
        }

        let scope = self.scope;
        for group in &mut self.groups {
            let owner = group.owner();
            for field in group.fields_mut() {
                if !check_validity(owner, field, schema, &*host, scope, "load") {
                    continue;
                }
                let Some(kind) = field.kind() else { continue };
                let Some(value) = store.get(kind, field.save_key()) else {
                    continue;
                };
                if let Err(err) = host.set_field(owner, field.name(), value) {
                    warn!("Skip load : cannot write '{}' on {}: {}", field.name(), owner, err);
                }
            }
        }

        Ok(())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(VisibilityScope::default())
    }
}

/// Validity gate run before every per-field store access.
///
/// Fails on an empty name, an empty save key, or a dead owner. An unbound
/// field is re-bound here by walking the owner's concrete type chain; an
/// exhausted chain fails the check instead of dropping the field silently.
fn check_validity(
    owner: InstanceId,
    field: &mut PersistedField,
    schema: &TypeTable,
    host: &dyn InstanceHost,
    scope: VisibilityScope,
    op: &str,
) -> bool {
    if field.name().is_empty() || field.save_key().is_empty() || !host.is_alive(owner) {
        warn!("Skip {} : {}", op, field.save_key());
        return false;
    }

    if !field.is_bound() {
        let Some(concrete) = host.concrete_type(owner) else {
            warn!("Skip {} :: {}", op, field.name());
            return false;
        };
        let Some((declaring, decl)) = schema.find_field_in_chain(concrete, field.name(), scope)
        else {
            warn!("Skip {} :: {}", op, field.name());
            return false;
        };
        let Some(kind) = decl.kind() else {
            warn!(
                "Skip {} :: unresolvable type '{}' for '{}'",
                op, decl.type_name, field.name()
            );
            return false;
        };
        field.bind(declaring.to_string(), kind);
    }

    true
}
