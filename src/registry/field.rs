use crate::core::ValueKind;
use serde::{Deserialize, Serialize};

/// Binding state of a persisted field's accessor.
///
/// Only the lightweight identity of a field (name, save key, type name)
/// survives persistence; the binding does not. After a reload a field comes
/// back `Unbound` and the validity check re-resolves it against the owner's
/// type chain before any value access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldBinding {
    Bound {
        /// The type in the owner's chain that declares the field.
        declaring_type: String,
        kind: ValueKind,
    },
    #[default]
    Unbound,
}

/// One field marked for persistence: its name, the save key addressing it in
/// the backing store, its declared value type name, and the lazily
/// re-bindable accessor state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedField {
    name: String,
    save_key: String,
    type_name: String,
    #[serde(skip, default)]
    binding: FieldBinding,
}

impl PersistedField {
    /// An unbound field, as it looks when only the persisted identity
    /// survived a reload.
    pub fn unbound(
        name: impl Into<String>,
        save_key: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            save_key: save_key.into(),
            type_name: type_name.into(),
            binding: FieldBinding::Unbound,
        }
    }

    /// A field bound at discovery time.
    pub fn bound(
        name: impl Into<String>,
        save_key: impl Into<String>,
        type_name: impl Into<String>,
        declaring_type: impl Into<String>,
        kind: ValueKind,
    ) -> Self {
        Self {
            name: name.into(),
            save_key: save_key.into(),
            type_name: type_name.into(),
            binding: FieldBinding::Bound {
                declaring_type: declaring_type.into(),
                kind,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn save_key(&self) -> &str {
        &self.save_key
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn binding(&self) -> &FieldBinding {
        &self.binding
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.binding, FieldBinding::Bound { .. })
    }

    /// The field's value kind: the bound kind when resolved, otherwise
    /// re-derived from the stored type name.
    pub fn kind(&self) -> Option<ValueKind> {
        match &self.binding {
            FieldBinding::Bound { kind, .. } => Some(*kind),
            FieldBinding::Unbound => ValueKind::parse(&self.type_name),
        }
    }

    pub fn bind(&mut self, declaring_type: impl Into<String>, kind: ValueKind) {
        self.binding = FieldBinding::Bound {
            declaring_type: declaring_type.into(),
            kind,
        };
    }

    /// Drops the accessor, as a process restart would. The persisted
    /// identity stays intact.
    pub fn unbind(&mut self) {
        self.binding = FieldBinding::Unbound;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_does_not_survive_serialization() {
        let field = PersistedField::bound("hp", "key", "int", "Actor", ValueKind::Integer);
        let json = serde_json::to_string(&field).unwrap();
        let revived: PersistedField = serde_json::from_str(&json).unwrap();

        assert!(!revived.is_bound());
        assert_eq!(revived.name(), "hp");
        assert_eq!(revived.save_key(), "key");
        // Kind still resolves lazily from the surviving type name
        assert_eq!(revived.kind(), Some(ValueKind::Integer));
    }

    #[test]
    fn test_unbound_kind_of_unknown_type_name() {
        let field = PersistedField::unbound("vec", "key", "Vector3");
        assert_eq!(field.kind(), None);
    }
}
