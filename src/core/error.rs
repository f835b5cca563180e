use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Type '{0}' is not registered")]
    TypeNotFound(String),

    #[error("Field '{0}' not found on type '{1}'")]
    FieldNotFound(String, String),

    #[error("Instance #{0} is no longer alive")]
    InstanceGone(u64),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Serialization error: {0}")]
    SerializeError(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}
