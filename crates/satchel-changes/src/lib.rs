//! Change-set engine for satchel.
//!
//! Tracks which fields of a request's entities drifted from their
//! last-synced snapshots and folds the drift into a minimal incremental
//! payload for the sync layer. Everything here is pure and synchronous:
//! callers pass snapshots in and get updated descriptors back.
//!
//! # Key Types
//!
//! - [`ChangeSet`] / [`UpdateRecord`] / [`PushAction`] — Per-entity-kind insert/update/delete descriptor
//! - [`diff_fields`] — Flat dirty-field diff between two snapshots
//! - [`OrderedSet`] ([`FieldSet`], [`IdSet`]) — Insertion-ordered deduplicated sets

pub mod changeset;
pub mod diff;
pub mod set;

pub use changeset::{ChangeSet, PushAction, UpdateRecord};
pub use diff::diff_fields;
pub use set::{FieldSet, IdSet, OrderedSet};
