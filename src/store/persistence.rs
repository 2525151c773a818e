//! Persistence layer for the record stores
//!
//! Full-collection JSON persistence: the whole collection is loaded into an
//! in-memory map at open and rewritten to disk after every mutating call.
//! There are no partial or append writes, which keeps the on-disk file a
//! plain JSON array a user can inspect. Adequate for a single-user,
//! low-volume namespace; a larger deployment would swap this behind the same
//! trait for an indexed store.

use crate::entity::{FileRecord, Link};
use crate::error::StorageError;
use crate::store::{FileRecordStore, LinkStore};
use crate::types::{FileId, LinkId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Shared load/rewrite plumbing for both JSON stores.
struct JsonCollection<K, V> {
    file_path: PathBuf,
    records: RwLock<HashMap<K, V>>,
}

impl<K, V> JsonCollection<K, V>
where
    K: std::hash::Hash + Eq + Copy,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Open the collection, loading every record into memory. A missing file
    /// starts an empty collection and materializes it on disk immediately so
    /// a half-created data directory is visible early.
    fn open(file_path: PathBuf, key_of: impl Fn(&V) -> K) -> Result<Self, StorageError> {
        let mut records = HashMap::new();
        if file_path.exists() {
            let bytes = fs::read(&file_path)?;
            let list: Vec<V> = serde_json::from_slice(&bytes)?;
            for record in list {
                records.insert(key_of(&record), record);
            }
        } else if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let collection = JsonCollection {
            file_path,
            records: RwLock::new(records),
        };
        if !collection.file_path.exists() {
            collection.rewrite(&collection.records.read())?;
        }
        Ok(collection)
    }

    /// Rewrite the entire collection to stable storage.
    fn rewrite(&self, records: &HashMap<K, V>) -> Result<(), StorageError> {
        let list: Vec<&V> = records.values().collect();
        let bytes = serde_json::to_vec_pretty(&list)?;
        fs::write(&self.file_path, bytes)?;
        Ok(())
    }

    fn save(&self, key: K, value: V) -> Result<(), StorageError> {
        let mut records = self.records.write();
        records.insert(key, value);
        self.rewrite(&records)
    }

    fn get(&self, key: &K) -> Option<V> {
        self.records.read().get(key).cloned()
    }

    fn all(&self) -> Vec<V> {
        self.records.read().values().cloned().collect()
    }

    fn delete(&self, key: &K) -> Result<(), StorageError> {
        let mut records = self.records.write();
        if records.remove(key).is_some() {
            self.rewrite(&records)?;
        }
        Ok(())
    }
}

/// JSON-file-backed implementation of `LinkStore`.
pub struct JsonLinkStore {
    inner: JsonCollection<LinkId, Link>,
}

impl JsonLinkStore {
    pub fn open<P: AsRef<Path>>(file_path: P) -> Result<Self, StorageError> {
        Ok(Self {
            inner: JsonCollection::open(file_path.as_ref().to_path_buf(), |l: &Link| l.id)?,
        })
    }
}

impl LinkStore for JsonLinkStore {
    fn save(&self, link: &Link) -> Result<(), StorageError> {
        self.inner.save(link.id, link.clone())
    }

    fn find_by_id(&self, id: &LinkId) -> Result<Option<Link>, StorageError> {
        Ok(self.inner.get(id))
    }

    fn find_children(&self, parent_id: &LinkId) -> Result<Vec<Link>, StorageError> {
        Ok(self
            .inner
            .records
            .read()
            .values()
            .filter(|l| l.parent_id.as_ref() == Some(parent_id))
            .cloned()
            .collect())
    }

    fn find_all(&self) -> Result<Vec<Link>, StorageError> {
        Ok(self.inner.all())
    }

    fn delete(&self, id: &LinkId) -> Result<(), StorageError> {
        self.inner.delete(id)
    }
}

/// JSON-file-backed implementation of `FileRecordStore`.
pub struct JsonFileRecordStore {
    inner: JsonCollection<FileId, FileRecord>,
}

impl JsonFileRecordStore {
    pub fn open<P: AsRef<Path>>(file_path: P) -> Result<Self, StorageError> {
        Ok(Self {
            inner: JsonCollection::open(file_path.as_ref().to_path_buf(), |r: &FileRecord| r.id)?,
        })
    }
}

impl FileRecordStore for JsonFileRecordStore {
    fn save(&self, record: &FileRecord) -> Result<(), StorageError> {
        self.inner.save(record.id, record.clone())
    }

    fn find_by_id(&self, id: &FileId) -> Result<Option<FileRecord>, StorageError> {
        Ok(self.inner.get(id))
    }

    fn find_all(&self) -> Result<Vec<FileRecord>, StorageError> {
        Ok(self.inner.all())
    }

    fn delete(&self, id: &FileId) -> Result<(), StorageError> {
        self.inner.delete(id)
    }
}
