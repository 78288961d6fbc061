use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type SyncResult<T> = Result<T, SyncError>;
