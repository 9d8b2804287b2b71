//! In-process document store
//!
//! Collections live in a map guarded by a single `RwLock`. The lock is only
//! held for the body of one operation and never across an `.await`.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use super::{native_key, new_key, overlay, Document, DocumentStore, StoredDocument};

type Collections = HashMap<String, HashMap<String, Document>>;

/// Document store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<Collections>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Collections>> {
        self.collections
            .read()
            .map_err(|_| anyhow!("memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Collections>> {
        self.collections
            .write()
            .map_err(|_| anyhow!("memory store lock poisoned"))
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, collection: &str, data: Document) -> Result<StoredDocument> {
        let id = new_key();
        self.write()?
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), data.clone());

        Ok(StoredDocument { id, data })
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>> {
        if native_key(id).is_none() {
            return Ok(None);
        }

        let collections = self.read()?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| StoredDocument {
                id: id.to_string(),
                data: data.clone(),
            }))
    }

    async fn merge(
        &self,
        collection: &str,
        id: &str,
        patch: Document,
    ) -> Result<Option<StoredDocument>> {
        if native_key(id).is_none() {
            return Ok(None);
        }

        let mut collections = self.write()?;
        let Some(existing) = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
        else {
            return Ok(None);
        };

        overlay(existing, patch);

        Ok(Some(StoredDocument {
            id: id.to_string(),
            data: existing.clone(),
        }))
    }

    async fn remove(&self, collection: &str, id: &str) -> Result<bool> {
        if native_key(id).is_none() {
            return Ok(false);
        }

        let mut collections = self.write()?;
        Ok(collections
            .get_mut(collection)
            .map(|docs| docs.remove(id).is_some())
            .unwrap_or(false))
    }

    async fn scan(&self, collection: &str) -> Result<Vec<StoredDocument>> {
        let collections = self.read()?;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| StoredDocument {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn ping(&self) -> Result<()> {
        self.read().map(|_| ())
    }
}
