//! Error types for the collection crate.

use satchel_types::EntityId;

use crate::service::ServiceError;

/// Errors that can occur during collection operations.
#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    /// No item with the given id exists in the store.
    #[error("item not found: {0}")]
    ItemNotFound(EntityId),

    /// No folder with the given id exists in the store.
    #[error("folder not found: {0}")]
    FolderNotFound(EntityId),

    /// No node of any kind with the given id exists in the store.
    #[error("entity not found: {0}")]
    NotFound(EntityId),

    /// The persistence service refused or failed the request.
    #[error("service error: {0}")]
    Service(#[from] ServiceError),
}

/// Convenience alias for collection results.
pub type CollectionResult<T> = Result<T, CollectionError>;
