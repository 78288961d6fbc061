//! The collection orchestrator: confirm-then-apply CRUD.
//!
//! [`Collection`] owns the store and a [`RequestService`]. Every CRUD
//! call awaits the service first and folds the confirmed record into the
//! store only on success; on failure the store is untouched and the
//! error surfaces to the caller, whose decision it is to retry. The
//! `apply_*` methods are public so confirmations arriving out of band
//! (another tab, a server push) can be folded in directly.

use std::sync::Arc;

use serde_json::Value;

use satchel_types::{EntityId, EntityRefs, Folder, Item};

use crate::error::{CollectionError, CollectionResult};
use crate::service::RequestService;
use crate::store::CollectionStore;

/// The editing context every drafted record is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: EntityId,
    pub collection_id: EntityId,
}

/// One request's collection, wired to its persistence service.
pub struct Collection {
    context: RequestContext,
    store: CollectionStore,
    service: Arc<dyn RequestService>,
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("context", &self.context)
            .field("store", &self.store)
            .finish()
    }
}

impl Collection {
    /// Create an empty collection bound to an editing context.
    pub fn new(context: RequestContext, service: Arc<dyn RequestService>) -> Self {
        Self {
            context,
            store: CollectionStore::new(),
            service,
        }
    }

    /// The underlying store (read-only).
    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    /// Replace the local state with a freshly loaded collection.
    pub fn init(&mut self, folders: Vec<Folder>, items: Vec<Item>, root_order: Vec<EntityId>) {
        self.store.init(folders, items, root_order);
    }

    // ---------------------------------------------------------------
    // Drafting
    // ---------------------------------------------------------------

    /// Build an unsaved item bound to this collection's context, with a
    /// freshly minted id.
    pub fn draft_item(&self, name: impl Into<String>, value: Value, parent: Option<EntityId>) -> Item {
        Item::new(name, value, self.refs(parent))
    }

    /// Build an unsaved folder bound to this collection's context, with a
    /// freshly minted id.
    pub fn draft_folder(&self, name: impl Into<String>, parent: Option<EntityId>) -> Folder {
        Folder::new(name, self.refs(parent))
    }

    fn refs(&self, parent: Option<EntityId>) -> EntityRefs {
        let refs = EntityRefs::new(self.context.request_id, self.context.collection_id);
        match parent {
            Some(folder_id) => refs.in_folder(folder_id),
            None => refs,
        }
    }

    // ---------------------------------------------------------------
    // Confirm-then-apply CRUD
    // ---------------------------------------------------------------

    /// Persist a drafted item, then apply the confirmed record.
    pub async fn save_item(&mut self, item: Item) -> CollectionResult<Item> {
        let confirmed = self.service.create_item(item).await?;
        self.apply_item_created(confirmed.clone());
        Ok(confirmed)
    }

    /// Persist edits to an existing item, then apply the confirmed record.
    pub async fn update_item(&mut self, item: Item) -> CollectionResult<Item> {
        if self.store.item(&item.id).is_none() {
            return Err(CollectionError::ItemNotFound(item.id));
        }
        let confirmed = self.service.update_item(item).await?;
        self.apply_item_updated(confirmed.clone())?;
        Ok(confirmed)
    }

    /// Delete an item remotely, then drop it locally.
    pub async fn delete_item(&mut self, id: EntityId) -> CollectionResult<()> {
        let item = self
            .store
            .item(&id)
            .ok_or(CollectionError::ItemNotFound(id))?;
        let request_id = item.refs.request_id;
        self.service.delete_item(request_id, id).await?;
        self.apply_removed(id)
    }

    /// Persist a drafted folder, then apply the confirmed record.
    pub async fn save_folder(&mut self, folder: Folder) -> CollectionResult<Folder> {
        let confirmed = self.service.create_folder(folder).await?;
        self.apply_folder_created(confirmed.clone());
        Ok(confirmed)
    }

    /// Delete a folder remotely, then drop it and its descendants locally.
    pub async fn delete_folder(&mut self, id: EntityId) -> CollectionResult<()> {
        let folder = self
            .store
            .folder(&id)
            .ok_or(CollectionError::FolderNotFound(id))?;
        let request_id = folder.refs.request_id;
        self.service.delete_folder(request_id, id).await?;
        self.apply_removed(id)
    }

    // ---------------------------------------------------------------
    // Applying confirmed records
    // ---------------------------------------------------------------

    /// Fold in a confirmed item creation.
    pub fn apply_item_created(&mut self, item: Item) {
        self.store.insert_item(item);
    }

    /// Fold in a confirmed item update.
    pub fn apply_item_updated(&mut self, item: Item) -> CollectionResult<()> {
        self.store.update_item(item)
    }

    /// Fold in a confirmed folder creation.
    pub fn apply_folder_created(&mut self, folder: Folder) {
        self.store.insert_folder(folder);
    }

    /// Fold in a confirmed deletion of any node.
    pub fn apply_removed(&mut self, id: EntityId) -> CollectionResult<()> {
        self.store.remove(&id).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{InMemoryRequestService, ServiceError};
    use serde_json::json;

    fn make_collection() -> (Collection, Arc<InMemoryRequestService>) {
        let service = Arc::new(InMemoryRequestService::new());
        let context = RequestContext {
            request_id: EntityId::new(),
            collection_id: EntityId::new(),
        };
        (Collection::new(context, service.clone()), service)
    }

    #[test]
    fn drafts_bind_the_editing_context() {
        let (collection, _) = make_collection();
        let parent = EntityId::new();
        let item = collection.draft_item("ping", json!("ping"), Some(parent));

        assert_eq!(item.refs.request_id, collection.context.request_id);
        assert_eq!(item.refs.collection_id, collection.context.collection_id);
        assert_eq!(item.refs.folder_id, Some(parent));
        assert!(collection.store().is_empty());
    }

    #[tokio::test]
    async fn save_item_applies_confirmed_record() {
        let (mut collection, service) = make_collection();
        let draft = collection.draft_item("ping", json!("ping"), None);

        let confirmed = collection.save_item(draft.clone()).await.unwrap();
        assert_eq!(confirmed.id, draft.id);
        assert_eq!(service.calls(), 1);
        assert!(collection.store().item(&draft.id).is_some());
        assert_eq!(collection.store().item_path(&draft.id).unwrap(), "ping");
    }

    #[tokio::test]
    async fn failed_save_leaves_store_untouched() {
        let (mut collection, service) = make_collection();
        let draft = collection.draft_item("ping", json!("ping"), None);
        let revision = collection.store().revision();

        service.set_failing(true);
        let result = collection.save_item(draft.clone()).await;

        assert!(matches!(
            result,
            Err(CollectionError::Service(ServiceError::Transport(_)))
        ));
        assert!(collection.store().is_empty());
        assert_eq!(collection.store().revision(), revision);
    }

    #[tokio::test]
    async fn update_item_roundtrip() {
        let (mut collection, _) = make_collection();
        let draft = collection.draft_item("ping", json!("ping"), None);
        collection.save_item(draft.clone()).await.unwrap();

        let mut edited = draft.clone();
        edited.value = json!("pong");
        collection.update_item(edited).await.unwrap();

        assert_eq!(collection.store().item(&draft.id).unwrap().value, json!("pong"));
    }

    #[tokio::test]
    async fn update_unknown_item_skips_the_service() {
        let (mut collection, service) = make_collection();
        let stray = collection.draft_item("stray", json!(null), None);

        let result = collection.update_item(stray).await;
        assert!(matches!(result, Err(CollectionError::ItemNotFound(_))));
        assert_eq!(service.calls(), 0);
    }

    #[tokio::test]
    async fn failed_update_keeps_previous_value() {
        let (mut collection, service) = make_collection();
        let draft = collection.draft_item("ping", json!("ping"), None);
        collection.save_item(draft.clone()).await.unwrap();

        service.set_failing(true);
        let mut edited = draft.clone();
        edited.value = json!("pong");
        assert!(collection.update_item(edited).await.is_err());

        assert_eq!(collection.store().item(&draft.id).unwrap().value, json!("ping"));
    }

    #[tokio::test]
    async fn delete_item_drops_local_record() {
        let (mut collection, _) = make_collection();
        let draft = collection.draft_item("ping", json!("ping"), None);
        collection.save_item(draft.clone()).await.unwrap();

        collection.delete_item(draft.id).await.unwrap();
        assert!(collection.store().is_empty());
    }

    #[tokio::test]
    async fn failed_delete_keeps_local_record() {
        let (mut collection, service) = make_collection();
        let draft = collection.draft_item("ping", json!("ping"), None);
        collection.save_item(draft.clone()).await.unwrap();

        service.set_failing(true);
        assert!(collection.delete_item(draft.id).await.is_err());
        assert!(collection.store().item(&draft.id).is_some());
    }

    #[tokio::test]
    async fn folder_lifecycle() {
        let (mut collection, _) = make_collection();
        let folder = collection.draft_folder("apis", None);
        collection.save_folder(folder.clone()).await.unwrap();

        let item = collection.draft_item("ping", json!("ping"), Some(folder.id));
        collection.save_item(item.clone()).await.unwrap();
        assert_eq!(
            collection.store().item_path(&item.id).unwrap(),
            "apis/ping"
        );

        collection.delete_folder(folder.id).await.unwrap();
        assert!(collection.store().is_empty());
    }

    #[tokio::test]
    async fn delete_unknown_folder_errors() {
        let (mut collection, service) = make_collection();
        let result = collection.delete_folder(EntityId::new()).await;
        assert!(matches!(result, Err(CollectionError::FolderNotFound(_))));
        assert_eq!(service.calls(), 0);
    }
}
