use super::{FieldDecl, TypeInfo, VisibilityScope};

/// The static type registration table.
///
/// Stands in for runtime reflection: every type the application wants
/// harvested is registered here once, at startup, with its base type and the
/// fields declared directly on it.
#[derive(Debug, Default)]
pub struct TypeTable {
    types: Vec<TypeInfo>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type, replacing any previous registration with the same
    /// name.
    pub fn register(&mut self, info: TypeInfo) {
        if let Some(existing) = self.types.iter_mut().find(|t| t.name == info.name) {
            *existing = info;
        } else {
            self.types.push(info);
        }
    }

    pub fn get(&self, name: &str) -> Option<&TypeInfo> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Walks the ancestor chain of `name`, starting at `name` itself.
    fn chain(&self, name: &str) -> ChainIter<'_> {
        ChainIter {
            table: self,
            next: Some(name.to_string()),
        }
    }

    /// Strict subtype test: a type is not a subtype of itself.
    pub fn is_subtype_of(&self, name: &str, base: &str) -> bool {
        let mut current = self.get(name).and_then(|t| t.base.clone());
        while let Some(bt) = current {
            if bt == base {
                return true;
            }
            current = self.get(&bt).and_then(|t| t.base.clone());
        }
        false
    }

    pub fn is_assignable_to(&self, name: &str, base: &str) -> bool {
        name == base || self.is_subtype_of(name, base)
    }

    /// Candidate types for a registry rebuild: every registered type strictly
    /// inheriting `base`, in registration order.
    pub fn types_inheriting(&self, base: &str) -> Vec<&TypeInfo> {
        self.types
            .iter()
            .filter(|t| self.is_subtype_of(&t.name, base))
            .collect()
    }

    /// The field discoverer: marked fields declared directly on `name`,
    /// filtered by `scope`. An unregistered type yields nothing.
    pub fn declared_fields(&self, name: &str, scope: VisibilityScope) -> Vec<&FieldDecl> {
        let Some(info) = self.get(name) else {
            return Vec::new();
        };

        info.fields
            .iter()
            .filter(|f| f.is_marked() && scope.admits(f.visibility))
            .collect()
    }

    /// Searches `name` and its ancestor chain for a field called
    /// `field_name` under `scope`, marked or not. Returns the declaring
    /// type's name alongside the declaration. This is the lookup lazy
    /// re-binding runs after a reload.
    pub fn find_field_in_chain(
        &self,
        name: &str,
        field_name: &str,
        scope: VisibilityScope,
    ) -> Option<(&str, &FieldDecl)> {
        if field_name.is_empty() {
            return None;
        }

        for info in self.chain(name) {
            if let Some(decl) = info
                .fields
                .iter()
                .find(|f| f.name == field_name && scope.admits(f.visibility))
            {
                return Some((info.name.as_str(), decl));
            }
        }

        None
    }
}

struct ChainIter<'a> {
    table: &'a TypeTable,
    next: Option<String>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = &'a TypeInfo;

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.next.take()?;
        let info = self.table.get(&name)?;
        self.next = info.base.clone();
        Some(info)
    }
}
