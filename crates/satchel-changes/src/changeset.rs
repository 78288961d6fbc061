//! Entity change sets: the incremental sync descriptor.
//!
//! A [`ChangeSet`] accumulates which entities of one kind were inserted,
//! updated, or deleted since the last successful sync, and for updates
//! which fields are dirty. Edits coalesce: re-marking a field is a no-op,
//! reverting it withdraws the dirt, deleting a never-synced entity erases
//! it from the descriptor entirely.
//!
//! Every mutating operation consumes the descriptor and returns the
//! updated value, so callers always hold exactly one authoritative copy
//! and no intermediate state is observable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use satchel_types::{EntityId, FieldLayout, Snapshot, ID_FIELD};

use crate::set::{FieldSet, IdSet};

/// Which kind of change is being recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushAction {
    Insert,
    Update,
    Delete,
}

/// Dirty fields of one entity pending sync.
///
/// Flat fields live in `root`; object-valued fields are tracked key by
/// key in a bucket named after the field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRecord {
    pub root: FieldSet,
    pub nested: BTreeMap<String, FieldSet>,
}

impl UpdateRecord {
    /// Returns `true` if no bucket holds any dirty field.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty() && self.nested.values().all(FieldSet::is_empty)
    }
}

/// Pending changes for one entity kind since the last sync.
///
/// An id lives in at most one of the three branches: recording a delete
/// for an inserted-but-unsynced id drops it from `inserted` without
/// touching `deleted`, and recording a delete for an id with a pending
/// update withdraws the update.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub inserted: IdSet,
    pub deleted: IdSet,
    pub updated: BTreeMap<EntityId, UpdateRecord>,
}

impl ChangeSet {
    /// Create an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there is nothing to sync.
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.deleted.is_empty() && self.updated.is_empty()
    }

    /// Returns `true` if any branch mentions `id`.
    pub fn contains(&self, id: &EntityId) -> bool {
        self.inserted.contains(id) || self.deleted.contains(id) || self.updated.contains_key(id)
    }

    /// Record a newly created entity.
    pub fn insert(mut self, id: EntityId) -> Self {
        self.inserted.insert(id);
        self
    }

    /// Record field edits for an entity, diffing `current` against `last`.
    ///
    /// An entity pending insert is skipped: its insert payload already
    /// carries the whole record. Otherwise each field of `current` (the
    /// id aside) is routed by `layout` into the root bucket or its named
    /// nested bucket, entering on change and leaving on revert. An entry
    /// whose buckets all end up empty is withdrawn.
    pub fn update(
        mut self,
        id: EntityId,
        layout: FieldLayout,
        last: &Snapshot,
        current: &Snapshot,
    ) -> Self {
        if self.inserted.contains(&id) {
            return self;
        }

        let mut record = self.updated.remove(&id).unwrap_or_default();
        for (field, value) in current {
            if field.as_str() == ID_FIELD {
                continue;
            }
            if layout.is_root_field(field) {
                if last.get(field) != Some(value) {
                    record.root.insert(field.clone());
                } else if record.root.contains(field.as_str()) {
                    record.root.remove(field.as_str());
                }
            } else if let Some(entries) = value.as_object() {
                let last_value = last.get(field);
                let mut bucket = record.nested.remove(field).unwrap_or_default();
                for (key, nested_value) in entries {
                    if last_value.and_then(|v| v.get(key)) != Some(nested_value) {
                        bucket.insert(key.clone());
                    } else if bucket.contains(key.as_str()) {
                        bucket.remove(key.as_str());
                    }
                }
                if !bucket.is_empty() {
                    record.nested.insert(field.clone(), bucket);
                }
            }
            // A nested-bucket field whose current value is not an object
            // has no keys to walk; any previously recorded bucket stands.
        }

        if !record.is_empty() {
            self.updated.insert(id, record);
        }
        self
    }

    /// Record a deletion.
    ///
    /// An id still pending insert was never synced, so it is simply
    /// withdrawn; the server has nothing to delete. Otherwise any pending
    /// update is withdrawn and the id joins `deleted`.
    pub fn delete(mut self, id: EntityId) -> Self {
        if self.inserted.contains(&id) {
            self.inserted.remove(&id);
            return self;
        }
        self.updated.remove(&id);
        self.deleted.insert(id);
        self
    }

    /// Dispatch on a [`PushAction`].
    ///
    /// Updates need both snapshots; with either absent there is nothing
    /// to diff and the descriptor is returned unchanged.
    pub fn apply(
        self,
        id: EntityId,
        action: PushAction,
        layout: FieldLayout,
        last: Option<&Snapshot>,
        current: Option<&Snapshot>,
    ) -> Self {
        match action {
            PushAction::Insert => self.insert(id),
            PushAction::Update => match (last, current) {
                (Some(last), Some(current)) => self.update(id, layout, last, current),
                _ => self,
            },
            PushAction::Delete => self.delete(id),
        }
    }

    /// Strip empty branches: empty nested buckets, then update entries
    /// with no dirt left.
    ///
    /// The mutating operations never leave such branches behind; this
    /// normalizes descriptors assembled elsewhere (e.g. deserialized from
    /// a stored session).
    pub fn clean(mut self) -> Self {
        self.updated.retain(|_, record| {
            record.nested.retain(|_, bucket| !bucket.is_empty());
            !record.is_empty()
        });
        self
    }

    /// The JSON document an external sync layer transmits.
    ///
    /// Shape: `{"insert": [ids], "update": [{"id": …, "root": [fields],
    /// "<bucket>": [keys]}], "delete": [ids]}`, with empty branches
    /// omitted so an empty descriptor serializes as `{}`.
    pub fn to_payload(&self) -> Value {
        let mut payload = Map::new();
        if !self.inserted.is_empty() {
            payload.insert("insert".to_string(), id_array(&self.inserted));
        }
        if !self.updated.is_empty() {
            let updates: Vec<Value> = self
                .updated
                .iter()
                .map(|(id, record)| {
                    let mut entry = Map::new();
                    entry.insert("id".to_string(), Value::String(id.to_string()));
                    if !record.root.is_empty() {
                        entry.insert("root".to_string(), field_array(&record.root));
                    }
                    for (bucket, keys) in &record.nested {
                        if !keys.is_empty() {
                            entry.insert(bucket.clone(), field_array(keys));
                        }
                    }
                    Value::Object(entry)
                })
                .collect();
            payload.insert("update".to_string(), Value::Array(updates));
        }
        if !self.deleted.is_empty() {
            payload.insert("delete".to_string(), id_array(&self.deleted));
        }
        Value::Object(payload)
    }
}

fn id_array(ids: &IdSet) -> Value {
    Value::Array(ids.iter().map(|id| Value::String(id.to_string())).collect())
}

fn field_array(fields: &FieldSet) -> Value {
    Value::Array(fields.iter().cloned().map(Value::String).collect())
}
