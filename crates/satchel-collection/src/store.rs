//! The in-memory collection store: folders and items under one owner.
//!
//! A single `BTreeMap<EntityId, CollectionNode>` holds every node; display
//! order is derived from the root order list and each folder's order
//! metadata. Because there is exactly one structure, the flat view and
//! the tree view cannot drift apart. A monotonic revision counter lets an
//! embedding UI cheaply detect that anything changed.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use satchel_types::{EntityId, Folder, Item};

use crate::error::{CollectionError, CollectionResult};

/// One node of the collection tree.
#[derive(Clone, Debug, PartialEq)]
pub enum CollectionNode {
    Folder(Folder),
    Item(Item),
}

impl CollectionNode {
    /// The node's entity id.
    pub fn id(&self) -> EntityId {
        match self {
            CollectionNode::Folder(f) => f.id,
            CollectionNode::Item(i) => i.id,
        }
    }

    /// The node's display name.
    pub fn name(&self) -> &str {
        match self {
            CollectionNode::Folder(f) => &f.name,
            CollectionNode::Item(i) => &i.name,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, CollectionNode::Folder(_))
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            CollectionNode::Folder(f) => Some(f),
            CollectionNode::Item(_) => None,
        }
    }

    pub fn as_item(&self) -> Option<&Item> {
        match self {
            CollectionNode::Item(i) => Some(i),
            CollectionNode::Folder(_) => None,
        }
    }
}

/// Id-indexed store of one request's collection tree.
#[derive(Debug, Default)]
pub struct CollectionStore {
    nodes: BTreeMap<EntityId, CollectionNode>,
    /// Display order of the nodes at the request root.
    root_order: Vec<EntityId>,
    /// Bumped on every mutation; read by the embedding UI to re-render.
    revision: u64,
}

impl CollectionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the store contents with a freshly loaded collection.
    pub fn init(&mut self, folders: Vec<Folder>, items: Vec<Item>, root_order: Vec<EntityId>) {
        debug!(
            folders = folders.len(),
            items = items.len(),
            "initializing collection"
        );
        self.nodes.clear();
        for folder in folders {
            self.nodes.insert(folder.id, CollectionNode::Folder(folder));
        }
        for item in items {
            self.nodes.insert(item.id, CollectionNode::Item(item));
        }
        self.root_order = root_order;
        self.bump();
    }

    /// Number of nodes (folders and items).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the store holds no folders and no items.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of folders.
    pub fn folder_count(&self) -> usize {
        self.nodes.values().filter(|n| n.is_folder()).count()
    }

    /// Number of items.
    pub fn item_count(&self) -> usize {
        self.nodes.values().filter(|n| !n.is_folder()).count()
    }

    /// The current revision. Monotonic; bumped on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Look up an item by id.
    pub fn item(&self, id: &EntityId) -> Option<&Item> {
        self.nodes.get(id).and_then(CollectionNode::as_item)
    }

    /// Look up a folder by id.
    pub fn folder(&self, id: &EntityId) -> Option<&Folder> {
        self.nodes.get(id).and_then(CollectionNode::as_folder)
    }

    // ---------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------

    /// Insert a folder, attaching it to its parent's ordering (or the
    /// root order for parentless folders).
    ///
    /// Re-inserting an id that is already present replaces the record
    /// without touching any order list, so a re-applied confirmation is
    /// idempotent.
    pub fn insert_folder(&mut self, folder: Folder) {
        debug!(id = %folder.id, name = %folder.name, "inserting folder");
        if self.nodes.contains_key(&folder.id) {
            self.nodes.insert(folder.id, CollectionNode::Folder(folder));
            self.bump();
            return;
        }
        let id = folder.id;
        let parent = folder.refs.folder_id;
        self.nodes.insert(id, CollectionNode::Folder(folder));
        self.attach(id, parent, true);
        self.bump();
    }

    /// Insert an item, attaching it to its parent's ordering (or the
    /// root order for parentless items). Idempotent like
    /// [`insert_folder`](Self::insert_folder).
    pub fn insert_item(&mut self, item: Item) {
        debug!(id = %item.id, name = %item.name, "inserting item");
        if self.nodes.contains_key(&item.id) {
            self.nodes.insert(item.id, CollectionNode::Item(item));
            self.bump();
            return;
        }
        let id = item.id;
        let parent = item.refs.folder_id;
        self.nodes.insert(id, CollectionNode::Item(item));
        self.attach(id, parent, false);
        self.bump();
    }

    /// Replace an existing item's record.
    pub fn update_item(&mut self, item: Item) -> CollectionResult<()> {
        match self.nodes.get_mut(&item.id) {
            Some(node @ CollectionNode::Item(_)) => {
                debug!(id = %item.id, "updating item");
                *node = CollectionNode::Item(item);
                self.bump();
                Ok(())
            }
            _ => Err(CollectionError::ItemNotFound(item.id)),
        }
    }

    /// Remove a node. Removing a folder also removes its descendants.
    ///
    /// Every removed id is detached from the root order and from all
    /// surviving folders' order lists. Returns the removed node.
    pub fn remove(&mut self, id: &EntityId) -> CollectionResult<CollectionNode> {
        let node = self
            .nodes
            .remove(id)
            .ok_or(CollectionError::NotFound(*id))?;

        let mut removed = vec![*id];
        if let CollectionNode::Folder(folder) = &node {
            let mut pending: Vec<EntityId> = folder
                .meta
                .folder_orders
                .iter()
                .chain(folder.meta.item_orders.iter())
                .copied()
                .collect();
            while let Some(child_id) = pending.pop() {
                let Some(child) = self.nodes.remove(&child_id) else {
                    continue;
                };
                removed.push(child_id);
                if let CollectionNode::Folder(f) = &child {
                    pending.extend(f.meta.folder_orders.iter().copied());
                    pending.extend(f.meta.item_orders.iter().copied());
                }
            }
        }

        debug!(id = %id, descendants = removed.len() - 1, "removing node");
        self.root_order.retain(|oid| !removed.contains(oid));
        for surviving in self.nodes.values_mut() {
            if let CollectionNode::Folder(f) = surviving {
                f.meta.folder_orders.retain(|oid| !removed.contains(oid));
                f.meta.item_orders.retain(|oid| !removed.contains(oid));
            }
        }
        self.bump();
        Ok(node)
    }

    // ---------------------------------------------------------------
    // Derived views
    // ---------------------------------------------------------------

    /// The nodes at the request root, in display order. Ids in the order
    /// list with no backing node are skipped.
    pub fn root_children(&self) -> Vec<&CollectionNode> {
        self.root_order
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .collect()
    }

    /// A folder's children in display order: folders first, then items.
    pub fn children(&self, folder_id: &EntityId) -> CollectionResult<Vec<&CollectionNode>> {
        let folder = self
            .folder(folder_id)
            .ok_or(CollectionError::FolderNotFound(*folder_id))?;
        Ok(folder
            .meta
            .folder_orders
            .iter()
            .chain(folder.meta.item_orders.iter())
            .filter_map(|id| self.nodes.get(id))
            .collect())
    }

    /// Slash-joined path of an item from the request root, e.g.
    /// `"auth/tokens/refresh"`.
    pub fn item_path(&self, id: &EntityId) -> CollectionResult<String> {
        let item = self
            .item(id)
            .ok_or(CollectionError::ItemNotFound(*id))?;

        let mut segments = vec![item.name.clone()];
        let mut seen = vec![*id];
        let mut parent = item.refs.folder_id;
        while let Some(folder_id) = parent {
            if seen.contains(&folder_id) {
                // Corrupt parent chain; stop rather than loop forever.
                warn!(id = %folder_id, "cycle in folder parent chain");
                break;
            }
            seen.push(folder_id);
            let Some(folder) = self.folder(&folder_id) else {
                break;
            };
            segments.push(folder.name.clone());
            parent = folder.refs.folder_id;
        }
        segments.reverse();
        Ok(segments.join("/"))
    }

    // ---------------------------------------------------------------

    /// Append `id` to its parent folder's order list, or to the root
    /// order when parentless or the parent is unknown.
    fn attach(&mut self, id: EntityId, parent: Option<EntityId>, is_folder: bool) {
        if let Some(parent_id) = parent {
            match self.nodes.get_mut(&parent_id) {
                Some(CollectionNode::Folder(f)) => {
                    if is_folder {
                        f.meta.folder_orders.push(id);
                    } else {
                        f.meta.item_orders.push(id);
                    }
                    return;
                }
                _ => {
                    warn!(id = %id, parent = %parent_id, "parent folder missing, attaching at root");
                }
            }
        }
        self.root_order.push(id);
    }

    fn bump(&mut self) {
        self.revision += 1;
    }
}
