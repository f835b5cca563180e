use crate::core::{Value, ValueKind};

/// Member visibility of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// Which visibilities a discovery or re-binding pass may see. The default
/// scope admits both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityScope {
    pub public: bool,
    pub non_public: bool,
}

impl VisibilityScope {
    pub const fn public_only() -> Self {
        Self { public: true, non_public: false }
    }

    pub fn admits(&self, visibility: Visibility) -> bool {
        match visibility {
            Visibility::Public => self.public,
            Visibility::Private => self.non_public,
        }
    }
}

impl Default for VisibilityScope {
    fn default() -> Self {
        Self { public: true, non_public: true }
    }
}

/// The declarative persistence marker. An empty/absent key means "generate a
/// default save key".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistMarker {
    pub key: Option<String>,
}

impl PersistMarker {
    pub fn explicit_key(&self) -> Option<&str> {
        self.key.as_deref().filter(|k| !k.is_empty())
    }
}

/// One field declaration on one level of a type chain.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    pub type_name: String,
    pub default: Value,
    pub visibility: Visibility,
    pub marker: Option<PersistMarker>,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, default: Value) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            default,
            visibility: Visibility::Public,
            marker: None,
        }
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    /// Marks the field for persistence with a generated default key.
    pub fn persisted(mut self) -> Self {
        self.marker = Some(PersistMarker::default());
        self
    }

    /// Marks the field for persistence under an explicit save key.
    pub fn persisted_as(mut self, key: impl Into<String>) -> Self {
        self.marker = Some(PersistMarker { key: Some(key.into()) });
        self
    }

    pub fn is_marked(&self) -> bool {
        self.marker.is_some()
    }

    pub fn kind(&self) -> Option<ValueKind> {
        ValueKind::parse(&self.type_name)
    }
}

/// One registered runtime type: its name, optional base type, and the fields
/// declared directly on it. Inherited fields live on the ancestor's entry,
/// never here; that is what lets discovery attribute each field to the level
/// that declared it.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    pub name: String,
    pub base: Option<String>,
    pub fields: Vec<FieldDecl>,
}

impl TypeInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: None,
            fields: Vec::new(),
        }
    }

    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn field(mut self, decl: FieldDecl) -> Self {
        self.fields.push(decl);
        self
    }
}
