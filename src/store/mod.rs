//! Record stores
//!
//! Keyed persistence for the two entity types. The stores are the sole
//! persistence authority for their entity and never interpret the records;
//! all referential invariants live in the namespace service. The contract is
//! deliberately small so the backend can be swapped without touching the
//! service.

pub mod persistence;

pub use persistence::{JsonFileRecordStore, JsonLinkStore};

use crate::entity::{FileRecord, Link};
use crate::error::StorageError;
use crate::types::{FileId, LinkId};

/// Store for logical namespace nodes.
pub trait LinkStore: Send + Sync {
    fn save(&self, link: &Link) -> Result<(), StorageError>;
    fn find_by_id(&self, id: &LinkId) -> Result<Option<Link>, StorageError>;

    /// All links whose `parent_id` equals the argument, in store iteration
    /// order. Callers re-sort if they need an ordering.
    fn find_children(&self, parent_id: &LinkId) -> Result<Vec<Link>, StorageError>;

    fn find_all(&self) -> Result<Vec<Link>, StorageError>;

    /// Idempotent: deleting an absent id is not an error.
    fn delete(&self, id: &LinkId) -> Result<(), StorageError>;
}

/// Store for physical file records.
pub trait FileRecordStore: Send + Sync {
    fn save(&self, record: &FileRecord) -> Result<(), StorageError>;
    fn find_by_id(&self, id: &FileId) -> Result<Option<FileRecord>, StorageError>;
    fn find_all(&self) -> Result<Vec<FileRecord>, StorageError>;

    /// Idempotent: deleting an absent id is not an error.
    fn delete(&self, id: &FileId) -> Result<(), StorageError>;
}
