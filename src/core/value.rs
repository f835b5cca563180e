use serde::{Deserialize, Serialize};
use std::fmt;

/// A field value as it travels between a live instance and the backing store.
///
/// Scalars cover the common cases; `Json` carries opaque structured values
/// the store treats as a single unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    Json(serde_json::Value),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Integer(_) => "INTEGER",
            Self::Float(_) => "FLOAT",
            Self::Text(_) => "TEXT",
            Self::Boolean(_) => "BOOLEAN",
            Self::Json(_) => "JSON",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => {
                if a.is_nan() && b.is_nan() {
                    return true;
                }
                a == b
            }
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Json(a), Self::Json(b)) => a == b,
            // Integer widens to Float when the two meet
            (Self::Integer(i), Self::Float(f)) | (Self::Float(f), Self::Integer(i)) => {
                *i as f64 == *f
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(fl) => write!(f, "{}", fl),
            Self::Text(s) => write!(f, "{}", s),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Json(j) => write!(f, "{}", j),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<serde_json::Value> for Value {
    fn from(j: serde_json::Value) -> Self {
        Self::Json(j)
    }
}

/// The value type a field declares, resolved lazily from its stored type
/// name. A persisted field keeps only the textual name across reloads and
/// re-resolves it through [`ValueKind::parse`] on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Integer,
    Float,
    Text,
    Boolean,
    Json,
}

impl ValueKind {
    /// Resolves a declared type name to a kind. Unknown names resolve to
    /// `None`, never to an error.
    pub fn parse(type_name: &str) -> Option<Self> {
        match type_name.to_ascii_lowercase().as_str() {
            "int" | "i32" | "i64" | "integer" => Some(Self::Integer),
            "float" | "f32" | "f64" | "double" => Some(Self::Float),
            "string" | "str" | "text" => Some(Self::Text),
            "bool" | "boolean" => Some(Self::Boolean),
            "json" | "object" | "struct" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn is_compatible(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (Self::Integer, Value::Integer(_)) => true,
            (Self::Float, Value::Float(_)) => true,
            (Self::Float, Value::Integer(_)) => true, // Integer -> Float is allowed
            (Self::Text, Value::Text(_)) => true,
            (Self::Boolean, Value::Boolean(_)) => true,
            (Self::Json, Value::Json(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => write!(f, "INTEGER"),
            Self::Float => write!(f, "FLOAT"),
            Self::Text => write!(f, "TEXT"),
            Self::Boolean => write!(f, "BOOLEAN"),
            Self::Json => write!(f, "JSON"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_equality() {
        assert_eq!(Value::Integer(42), Value::Integer(42));
        assert_eq!(Value::Integer(3), Value::Float(3.0));
        assert_eq!(Value::Json(json!({"a": 1})), Value::Json(json!({"a": 1})));
        assert_ne!(Value::Integer(1), Value::Text("1".into()));
    }

    #[test]
    fn test_kind_parse_aliases() {
        assert_eq!(ValueKind::parse("int"), Some(ValueKind::Integer));
        assert_eq!(ValueKind::parse("I64"), Some(ValueKind::Integer));
        assert_eq!(ValueKind::parse("double"), Some(ValueKind::Float));
        assert_eq!(ValueKind::parse("string"), Some(ValueKind::Text));
        assert_eq!(ValueKind::parse("boolean"), Some(ValueKind::Boolean));
        assert_eq!(ValueKind::parse("struct"), Some(ValueKind::Json));
        assert_eq!(ValueKind::parse("Vector3"), None);
    }

    #[test]
    fn test_kind_compatibility() {
        assert!(ValueKind::Integer.is_compatible(&Value::Integer(1)));
        assert!(ValueKind::Integer.is_compatible(&Value::Null));
        assert!(ValueKind::Float.is_compatible(&Value::Integer(1)));
        assert!(!ValueKind::Integer.is_compatible(&Value::Float(1.0)));
        assert!(!ValueKind::Text.is_compatible(&Value::Boolean(true)));
    }
}
