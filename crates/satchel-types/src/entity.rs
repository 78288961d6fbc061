//! Collection entity records.
//!
//! These are the typed records managed by the collection store and diffed
//! by the change engine: connections (transport endpoints), emitters
//! (named event payloads), items (saved messages), and folders. Object
//! payloads that the editor treats as free-form (bodies, header maps,
//! metadata) stay as `serde_json` values rather than dedicated structs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TypeResult;
use crate::id::EntityId;
use crate::snapshot::{snapshot_of, Snapshot};

/// Binding of a record to its owning request and collection.
///
/// `folder_id` is `None` for records that live at the request root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRefs {
    pub request_id: EntityId,
    pub collection_id: EntityId,
    pub folder_id: Option<EntityId>,
}

impl EntityRefs {
    pub fn new(request_id: EntityId, collection_id: EntityId) -> Self {
        Self {
            request_id,
            collection_id,
            folder_id: None,
        }
    }

    pub fn in_folder(mut self, folder_id: EntityId) -> Self {
        self.folder_id = Some(folder_id);
        self
    }
}

/// Ordering metadata carried by a folder: the display order of its child
/// folders and items.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderMeta {
    pub folder_orders: Vec<EntityId>,
    pub item_orders: Vec<EntityId>,
}

/// A transport connection belonging to a request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: EntityId,
    pub name: String,
    pub headers: BTreeMap<String, Value>,
    pub query_params: BTreeMap<String, Value>,
    pub config: BTreeMap<String, Value>,
}

impl Connection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            headers: BTreeMap::new(),
            query_params: BTreeMap::new(),
            config: BTreeMap::new(),
        }
    }

    /// Lower this record into a field snapshot for diffing.
    pub fn snapshot(&self) -> TypeResult<Snapshot> {
        snapshot_of(self)
    }
}

/// A named event payload saved under a request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Emitter {
    pub id: EntityId,
    pub name: String,
    /// Free-form body, e.g. `{"mode": "raw", "raw": "..."}`.
    pub body: Value,
    pub headers: BTreeMap<String, Value>,
    pub meta: BTreeMap<String, Value>,
    pub refs: EntityRefs,
}

impl Emitter {
    pub fn new(name: impl Into<String>, body: Value, refs: EntityRefs) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            body,
            headers: BTreeMap::new(),
            meta: BTreeMap::new(),
            refs,
        }
    }

    /// Lower this record into a field snapshot for diffing.
    pub fn snapshot(&self) -> TypeResult<Snapshot> {
        snapshot_of(self)
    }
}

/// A saved message belonging to a request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: EntityId,
    pub name: String,
    pub value: Value,
    pub meta: BTreeMap<String, Value>,
    pub refs: EntityRefs,
}

impl Item {
    pub fn new(name: impl Into<String>, value: Value, refs: EntityRefs) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            value,
            meta: BTreeMap::new(),
            refs,
        }
    }
}

/// A folder in the collection tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: EntityId,
    pub name: String,
    pub meta: FolderMeta,
    pub refs: EntityRefs,
}

impl Folder {
    pub fn new(name: impl Into<String>, refs: EntityRefs) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            meta: FolderMeta::default(),
            refs,
        }
    }

    /// Lower this record into a field snapshot for diffing.
    pub fn snapshot(&self) -> TypeResult<Snapshot> {
        snapshot_of(self)
    }
}
