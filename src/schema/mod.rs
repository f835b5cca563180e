pub mod table;
pub mod types;

pub use table::TypeTable;
pub use types::{FieldDecl, PersistMarker, TypeInfo, Visibility, VisibilityScope};
