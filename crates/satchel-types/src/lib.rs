//! Foundation types for satchel.
//!
//! This crate provides the identifiers, entity records, and snapshot
//! representation used throughout the satchel workspace. Every other satchel
//! crate depends on `satchel-types`.
//!
//! # Key Types
//!
//! - [`EntityId`] — Time-ordered entity identifier (UUID v7)
//! - [`Snapshot`] — Point-in-time field map of one entity (`BTreeMap<String, Value>`)
//! - [`Connection`] / [`Emitter`] / [`Folder`] / [`Item`] — Collection records
//! - [`EntityRefs`] — Request/collection binding carried by every record
//! - [`FieldLayout`] — Root-vs-nested field partition used by the diff engine

pub mod entity;
pub mod error;
pub mod id;
pub mod layout;
pub mod snapshot;

pub use entity::{Connection, Emitter, EntityRefs, Folder, FolderMeta, Item};
pub use error::{TypeError, TypeResult};
pub use id::EntityId;
pub use layout::{FieldLayout, ID_FIELD};
pub use snapshot::{snapshot_of, Snapshot};
