//! Everything one request has to push, gathered in one place.
//!
//! A [`RequestChanges`] starts empty, soaks up edits from the editor
//! session (the request's flat surfaces field by field, entities through
//! their change sets), and hands the sync layer a single JSON document
//! when asked.
//! Once that layer reports a successful flush, the caller resets the
//! record and a new accumulation window begins. Transmission itself is
//! not this crate's business.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use satchel_changes::{diff_fields, ChangeSet, FieldSet, PushAction};
use satchel_types::{EntityId, FieldLayout, Snapshot};

use crate::error::SyncResult;

/// Pending changes of one request since its last successful sync.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestChanges {
    /// Dirty fields of the request url.
    pub url: FieldSet,
    /// Dirty top-level fields of the request document itself.
    pub root: FieldSet,
    /// Dirty fields of the transport configuration.
    pub config: FieldSet,
    /// Dirty fields of the request metadata (name, description).
    pub meta: FieldSet,
    /// Dirty fields of the request's binding block (collection, folder).
    pub refs: FieldSet,
    pub connections: ChangeSet,
    pub emitters: ChangeSet,
    pub directories: ChangeSet,
}

impl RequestChanges {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there is nothing to sync.
    pub fn is_empty(&self) -> bool {
        self.url.is_empty()
            && self.root.is_empty()
            && self.config.is_empty()
            && self.meta.is_empty()
            && self.refs.is_empty()
            && self.connections.is_empty()
            && self.emitters.is_empty()
            && self.directories.is_empty()
    }

    // ---------------------------------------------------------------
    // Accumulation
    // ---------------------------------------------------------------

    /// Fold a url edit into the dirty set.
    pub fn track_url(mut self, last: Option<&Snapshot>, current: Option<&Snapshot>) -> Self {
        self.url = diff_fields(last, current, self.url);
        self
    }

    /// Fold an edit of the request's own top-level fields into the dirty
    /// set.
    pub fn track_root(mut self, last: Option<&Snapshot>, current: Option<&Snapshot>) -> Self {
        self.root = diff_fields(last, current, self.root);
        self
    }

    /// Fold a transport-configuration edit into the dirty set.
    pub fn track_config(mut self, last: Option<&Snapshot>, current: Option<&Snapshot>) -> Self {
        self.config = diff_fields(last, current, self.config);
        self
    }

    /// Fold a request-metadata edit into the dirty set.
    pub fn track_meta(mut self, last: Option<&Snapshot>, current: Option<&Snapshot>) -> Self {
        self.meta = diff_fields(last, current, self.meta);
        self
    }

    /// Fold a binding change (request moved to another folder or
    /// collection) into the dirty set.
    pub fn track_refs(mut self, last: Option<&Snapshot>, current: Option<&Snapshot>) -> Self {
        self.refs = diff_fields(last, current, self.refs);
        self
    }

    /// Record a connection change.
    pub fn track_connection(
        mut self,
        id: EntityId,
        action: PushAction,
        last: Option<&Snapshot>,
        current: Option<&Snapshot>,
    ) -> Self {
        self.connections =
            self.connections
                .apply(id, action, FieldLayout::Connection, last, current);
        self
    }

    /// Record an emitter change.
    pub fn track_emitter(
        mut self,
        id: EntityId,
        action: PushAction,
        last: Option<&Snapshot>,
        current: Option<&Snapshot>,
    ) -> Self {
        self.emitters = self
            .emitters
            .apply(id, action, FieldLayout::Emitter, last, current);
        self
    }

    /// Record a folder change.
    pub fn track_directory(
        mut self,
        id: EntityId,
        action: PushAction,
        last: Option<&Snapshot>,
        current: Option<&Snapshot>,
    ) -> Self {
        self.directories =
            self.directories
                .apply(id, action, FieldLayout::Directory, last, current);
        self
    }

    // ---------------------------------------------------------------
    // Flush lifecycle
    // ---------------------------------------------------------------

    /// The JSON document the sync layer transmits. Empty branches are
    /// omitted, so a record with nothing pending serializes as `{}`.
    pub fn to_payload(&self) -> Value {
        let mut payload = Map::new();
        for (key, set) in [
            ("url", &self.url),
            ("root", &self.root),
            ("config", &self.config),
            ("meta", &self.meta),
            ("refs", &self.refs),
        ] {
            if !set.is_empty() {
                let fields = set.iter().cloned().map(Value::String).collect();
                payload.insert(key.to_string(), Value::Array(fields));
            }
        }
        for (key, changes) in [
            ("connections", &self.connections),
            ("emitters", &self.emitters),
            ("directories", &self.directories),
        ] {
            if !changes.is_empty() {
                payload.insert(key.to_string(), changes.to_payload());
            }
        }
        Value::Object(payload)
    }

    /// [`to_payload`](Self::to_payload), rendered as a JSON string.
    pub fn to_json(&self) -> SyncResult<String> {
        Ok(serde_json::to_string(&self.to_payload())?)
    }

    /// Discard everything after a successful flush.
    pub fn reset(self) -> Self {
        Self::new()
    }
}
