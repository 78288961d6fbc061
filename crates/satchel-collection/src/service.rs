//! The persistence seam: a request service confirming collection CRUD.
//!
//! The store never talks to a backend itself. Callers hand drafts to a
//! [`RequestService`], and only the confirmed records that come back are
//! applied locally. The in-memory implementation echoes records straight
//! back and is what tests and embedders without a backend use.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use thiserror::Error;

use satchel_types::{EntityId, Folder, Item};

/// Errors surfaced by a request service.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The backend refused the request (validation, permissions).
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The request never completed (network, timeout).
    #[error("transport error: {0}")]
    Transport(String),
}

/// Convenience alias for service results.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Remote persistence operations for one request's collection.
///
/// Every call resolves to the server-confirmed record. Implementations
/// must not assume the caller applies anything before confirmation.
#[async_trait]
pub trait RequestService: Send + Sync {
    async fn create_item(&self, item: Item) -> ServiceResult<Item>;
    async fn update_item(&self, item: Item) -> ServiceResult<Item>;
    async fn delete_item(&self, request_id: EntityId, id: EntityId) -> ServiceResult<()>;
    async fn create_folder(&self, folder: Folder) -> ServiceResult<Folder>;
    async fn delete_folder(&self, request_id: EntityId, id: EntityId) -> ServiceResult<()>;
}

/// In-memory request service that confirms every call by echoing the
/// record back.
///
/// Intended for tests and embedding. Flip [`set_failing`](Self::set_failing)
/// to make every call fail, which is how the no-mutation-on-failure
/// contract of the collection is exercised.
#[derive(Debug, Default)]
pub struct InMemoryRequestService {
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl InMemoryRequestService {
    /// Create a service that confirms everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with [`ServiceError::Transport`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of calls received so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> ServiceResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(ServiceError::Transport("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RequestService for InMemoryRequestService {
    async fn create_item(&self, item: Item) -> ServiceResult<Item> {
        self.check()?;
        Ok(item)
    }

    async fn update_item(&self, item: Item) -> ServiceResult<Item> {
        self.check()?;
        Ok(item)
    }

    async fn delete_item(&self, _request_id: EntityId, _id: EntityId) -> ServiceResult<()> {
        self.check()
    }

    async fn create_folder(&self, folder: Folder) -> ServiceResult<Folder> {
        self.check()?;
        Ok(folder)
    }

    async fn delete_folder(&self, _request_id: EntityId, _id: EntityId) -> ServiceResult<()> {
        self.check()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use satchel_types::EntityRefs;
    use serde_json::json;

    fn make_item() -> Item {
        Item::new(
            "ping",
            json!("ping"),
            EntityRefs::new(EntityId::new(), EntityId::new()),
        )
    }

    #[tokio::test]
    async fn echoes_records_back() {
        let service = InMemoryRequestService::new();
        let item = make_item();
        let confirmed = service.create_item(item.clone()).await.unwrap();
        assert_eq!(confirmed, item);
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn failing_switch_fails_every_call() {
        let service = InMemoryRequestService::new();
        service.set_failing(true);

        let result = service.create_item(make_item()).await;
        assert!(matches!(result, Err(ServiceError::Transport(_))));

        service.set_failing(false);
        assert!(service.create_item(make_item()).await.is_ok());
        assert_eq!(service.calls(), 2);
    }
}
