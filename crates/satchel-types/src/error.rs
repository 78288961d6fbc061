use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid entity id: {0}")]
    InvalidId(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for type results.
pub type TypeResult<T> = Result<T, TypeError>;
