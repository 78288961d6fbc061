//! Collection store for satchel.
//!
//! Keeps one request's folders and items in a single id-indexed store
//! with display order derived from folder metadata, and wires CRUD to a
//! persistence service with confirm-then-apply semantics: local state
//! changes only after the backend confirms.
//!
//! # Key Types
//!
//! - [`CollectionStore`] / [`CollectionNode`] — Id-indexed tree with derived ordering
//! - [`Collection`] / [`RequestContext`] — Orchestrator binding store, context, and service
//! - [`RequestService`] / [`InMemoryRequestService`] — The persistence seam
//! - [`CollectionError`] — Unknown ids, service failures

pub mod collection;
pub mod error;
pub mod service;
pub mod store;

pub use collection::{Collection, RequestContext};
pub use error::{CollectionError, CollectionResult};
pub use service::{InMemoryRequestService, RequestService, ServiceError, ServiceResult};
pub use store::{CollectionNode, CollectionStore};
