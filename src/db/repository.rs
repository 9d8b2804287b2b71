//! Typed repository over a document store collection

use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::{Document, SharedStore, StorageError, StorageOperation, StoredDocument};

/// A record type persisted as one document in a named collection.
///
/// The record's `id` field is filled from the store-assigned id on the way
/// out and stripped from every body on the way in.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    /// Collection name in the document store
    const COLLECTION: &'static str;
}

/// Generic CRUD access to the collection of `T`
pub struct Repository<T> {
    store: SharedStore,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: Record> Repository<T> {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    /// Store `payload` under a newly minted id and return the stored record
    pub async fn create<P: Serialize>(&self, payload: &P) -> Result<T, StorageError> {
        let op = StorageOperation::Create;
        let data = to_document(payload, op)?;

        let stored = self
            .store
            .insert(T::COLLECTION, data)
            .await
            .map_err(|e| StorageError::wrap(op, e))?;

        debug!(collection = T::COLLECTION, id = %stored.id, "Document created");
        into_record(stored, op)
    }

    /// Every record in the collection, in store-defined order
    pub async fn get_all(&self) -> Result<Vec<T>, StorageError> {
        let op = StorageOperation::Read;
        let docs = self
            .store
            .scan(T::COLLECTION)
            .await
            .map_err(|e| StorageError::wrap(op, e))?;

        docs.into_iter().map(|doc| into_record(doc, op)).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<T>, StorageError> {
        let op = StorageOperation::Read;
        self.store
            .get(T::COLLECTION, id)
            .await
            .map_err(|e| StorageError::wrap(op, e))?
            .map(|doc| into_record(doc, op))
            .transpose()
    }

    /// Merge the fields present in `patch` into an existing record
    pub async fn update<P: Serialize>(&self, id: &str, patch: &P) -> Result<Option<T>, StorageError> {
        let op = StorageOperation::Update;
        let data = to_document(patch, op)?;

        let merged = self
            .store
            .merge(T::COLLECTION, id, data)
            .await
            .map_err(|e| StorageError::wrap(op, e))?;

        if merged.is_some() {
            debug!(collection = T::COLLECTION, id = %id, "Document updated");
        }
        merged.map(|doc| into_record(doc, op)).transpose()
    }

    /// Hard delete; `false` when no such record exists
    pub async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let removed = self
            .store
            .remove(T::COLLECTION, id)
            .await
            .map_err(|e| StorageError::wrap(StorageOperation::Delete, e))?;

        if removed {
            debug!(collection = T::COLLECTION, id = %id, "Document deleted");
        }
        Ok(removed)
    }
}

fn to_document<P: Serialize>(payload: &P, op: StorageOperation) -> Result<Document, StorageError> {
    match serde_json::to_value(payload) {
        Ok(serde_json::Value::Object(mut map)) => {
            map.remove("id");
            Ok(map)
        }
        Ok(other) => Err(StorageError::new(
            op,
            format!("document body must be an object, got {}", other),
        )),
        Err(e) => Err(StorageError::new(op, format!("Failed to serialize document: {}", e))),
    }
}

fn into_record<T: Record>(doc: StoredDocument, op: StorageOperation) -> Result<T, StorageError> {
    let StoredDocument { id, mut data } = doc;
    data.insert("id".to_string(), serde_json::Value::String(id.clone()));

    serde_json::from_value(serde_json::Value::Object(data)).map_err(|e| {
        StorageError::new(
            op,
            format!("Failed to decode {} document {}: {}", T::COLLECTION, id, e),
        )
    })
}
