//! Record store
//!
//! Holds the `exectimes` and `materializations` collections in a single
//! append-only record file. On open the whole file is scanned and the
//! collections are rebuilt in memory; every insert is fsynced to the file
//! before it becomes visible to readers.
//!
//! Lookups are equality filters on a top-level field. Results come back in
//! store order, which is insertion order.

mod collection;
mod errors;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use serde_json::Value;

use crate::storage::{load_records, StorageWriter, StoredRecord};

use collection::CollectionData;

pub use collection::{Collection, RecordHandle};
pub use errors::{StoreError, StoreResult};

struct StoreInner {
    writer: StorageWriter,
    exectimes: CollectionData,
    materializations: CollectionData,
}

impl StoreInner {
    fn collection(&self, collection: Collection) -> &CollectionData {
        match collection {
            Collection::Exectimes => &self.exectimes,
            Collection::Materializations => &self.materializations,
        }
    }

    fn collection_mut(&mut self, collection: Collection) -> &mut CollectionData {
        match collection {
            Collection::Exectimes => &mut self.exectimes,
            Collection::Materializations => &mut self.materializations,
        }
    }
}

/// File-backed document store with two collections.
///
/// Access is serialized by a single lock; every operation blocks only for
/// the duration of its own read or write.
pub struct RecordStore {
    inner: Mutex<StoreInner>,
}

impl RecordStore {
    /// Opens the store at `path`, creating the file if needed.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened, or if any stored record is
    /// corrupt, truncated, or belongs to an unknown collection.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let writer = StorageWriter::open(path)?;

        let mut exectimes = CollectionData::default();
        let mut materializations = CollectionData::default();

        for record in load_records(path)? {
            let collection = Collection::from_name(&record.collection)
                .ok_or_else(|| StoreError::UnknownCollection(record.collection.clone()))?;
            let body: Value = serde_json::from_slice(&record.body)?;
            let data = match collection {
                Collection::Exectimes => &mut exectimes,
                Collection::Materializations => &mut materializations,
            };
            data.push(RecordHandle(record.handle), body);
        }

        tracing::info!(
            event = "store_opened",
            path = %path.display(),
            exectimes = exectimes.len(),
            materializations = materializations.len(),
        );

        Ok(Self {
            inner: Mutex::new(StoreInner {
                writer,
                exectimes,
                materializations,
            }),
        })
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, StoreInner>> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Appends `record` to `collection` and returns its handle.
    ///
    /// The record is durable when this returns. Identical records are stored
    /// again, never deduplicated.
    pub fn insert<T: Serialize>(
        &self,
        collection: Collection,
        record: &T,
    ) -> StoreResult<RecordHandle> {
        let value = serde_json::to_value(record)?;
        let body = serde_json::to_vec(&value)?;

        let mut inner = self.lock()?;
        let handle = inner.collection(collection).next_handle();

        inner
            .writer
            .append(&StoredRecord::new(collection.name(), handle.0, body))?;
        inner.collection_mut(collection).push(handle, value);

        tracing::debug!(event = "record_inserted", collection = %collection, handle = handle.0);

        Ok(handle)
    }

    /// Every record whose top-level `field` equals `value`, in store order.
    pub fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<Value>> {
        let inner = self.lock()?;
        let found = inner
            .collection(collection)
            .matching(field, value)
            .cloned()
            .collect();
        Ok(found)
    }

    /// The first record in store order whose `field` equals `value`.
    pub fn first_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> StoreResult<Option<Value>> {
        let inner = self.lock()?;
        let found = inner
            .collection(collection)
            .matching(field, value)
            .next()
            .cloned();
        Ok(found)
    }

    /// Every record in the collection.
    pub fn all(&self, collection: Collection) -> StoreResult<Vec<Value>> {
        let inner = self.lock()?;
        let values = inner.collection(collection).values().cloned().collect();
        Ok(values)
    }

    /// Number of records in the collection.
    pub fn len(&self, collection: Collection) -> StoreResult<usize> {
        Ok(self.lock()?.collection(collection).len())
    }

    /// Whether the collection holds no records.
    pub fn is_empty(&self, collection: Collection) -> StoreResult<bool> {
        Ok(self.len(collection)? == 0)
    }
}
