use crate::core::Result;
use crate::host::InstanceHost;
use crate::registry::{Harvester, KeyPolicy, LoadStrategy, Registry, SaveStrategy};
use crate::schema::{TypeTable, VisibilityScope};
use crate::store::BackingStore;
use log::info;
use std::sync::Arc;

/// Lifecycle driver owning the schema, host, store, and registry.
///
/// The expected sequence is one `rebuild` at setup, one `load` after it, and
/// one `save` at teardown; all three are safe to call again. Everything runs
/// synchronously on the caller's thread.
pub struct Controller<H: InstanceHost, S: BackingStore> {
    schema: Arc<TypeTable>,
    host: H,
    store: S,
    registry: Registry,
    harvester: Harvester,
    root_type: String,
}

impl<H: InstanceHost, S: BackingStore> Controller<H, S> {
    /// `root_type` bounds the candidate type set: every registered type
    /// strictly inheriting it is harvested on rebuild.
    pub fn new(schema: Arc<TypeTable>, host: H, store: S, root_type: impl Into<String>) -> Self {
        let scope = VisibilityScope::default();
        Self {
            schema,
            host,
            store,
            registry: Registry::new(scope),
            harvester: Harvester::new(scope),
            root_type: root_type.into(),
        }
    }

    pub fn with_scope(mut self, scope: VisibilityScope) -> Self {
        let policy = self.harvester.key_policy();
        self.registry = Registry::new(scope);
        self.harvester = Harvester::new(scope).with_key_policy(policy);
        self
    }

    pub fn with_key_policy(mut self, policy: KeyPolicy) -> Self {
        self.harvester = Harvester::new(self.registry.scope()).with_key_policy(policy);
        self
    }

    /// Full registry rebuild: drop every group, harvest every candidate
    /// type into the same registry so cross-level merges land in one pass,
    /// then sort groups by owner display name. Idempotent; the only way
    /// stale groups are removed.
    pub fn rebuild(&mut self) {
        self.registry.clear();

        let candidates: Vec<String> = self
            .schema
            .types_inheriting(&self.root_type)
            .into_iter()
            .map(|t| t.name.clone())
            .collect();

        for type_name in &candidates {
            let created =
                self.harvester
                    .harvest(type_name, &self.schema, &self.host, &mut self.registry);
            for group in created {
                self.registry.add_group(group);
            }
        }

        self.registry.sort_by_owner_name(&self.host);
        info!(
            "Rebuilt registry: {} groups from {} candidate types",
            self.registry.len(),
            candidates.len()
        );
    }

    pub fn save(&mut self) -> Result<()> {
        self.registry.save(&self.schema, &self.host, &mut self.store)
    }

    pub fn load(&mut self) -> Result<()> {
        self.registry.load(&self.schema, &mut self.host, &self.store)
    }

    pub fn set_save_strategy(&mut self, strategy: Box<dyn SaveStrategy>) {
        self.registry.set_save_strategy(strategy);
    }

    pub fn set_load_strategy(&mut self, strategy: Box<dyn LoadStrategy>) {
        self.registry.set_load_strategy(strategy);
    }

    pub fn schema(&self) -> &TypeTable {
        &self.schema
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
