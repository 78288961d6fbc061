//! Per-request change aggregation for satchel.
//!
//! Bundles the flat dirty sets (url, config, metadata) and the three
//! entity change sets of one request into a single record with a
//! flush lifecycle: accumulate, inspect, serialize, reset. Transmitting
//! the serialized payload is the embedding application's job.
//!
//! # Key Types
//!
//! - [`RequestChanges`] — Everything one request has pending since its last sync
//! - [`SyncError`] — Serialization failures

pub mod changes;
pub mod error;

pub use changes::RequestChanges;
pub use error::{SyncError, SyncResult};
