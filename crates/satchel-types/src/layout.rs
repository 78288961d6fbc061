//! Field layouts: how each entity kind partitions its snapshot fields.
//!
//! The diff engine records dirtiness per field. Flat fields land in an
//! entity's root bucket; object-valued fields are tracked key by key in a
//! bucket named after the field. Which fields are flat is a property of
//! the entity kind, captured here.

use serde::{Deserialize, Serialize};

/// The identity field of every record. Never participates in diffing.
pub const ID_FIELD: &str = "id";

/// Root-vs-nested partition of snapshot fields for one entity kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldLayout {
    /// Connections are flat: every field diffs into the root bucket,
    /// including object-valued ones (headers, query params) compared as
    /// whole values.
    Connection,
    /// Emitters keep `name` and `body` in the root bucket; any other
    /// field is an object tracked key by key.
    Emitter,
    /// Folders keep `name` in the root bucket; any other field is an
    /// object tracked key by key.
    Directory,
}

impl FieldLayout {
    /// Returns `true` if `field` diffs into the root bucket for this kind.
    pub fn is_root_field(&self, field: &str) -> bool {
        match self {
            FieldLayout::Connection => true,
            FieldLayout::Emitter => matches!(field, "name" | "body"),
            FieldLayout::Directory => field == "name",
        }
    }
}
