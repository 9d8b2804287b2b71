//! Document persistence layer
//!
//! This module defines the narrow document-store interface the rest of the
//! application talks to, along with two implementations:
//! - [`MemoryDocumentStore`]: process-local store, used by default and in tests
//! - [`SqliteDocumentStore`]: JSON documents persisted in SQLite through sqlx
//!
//! On top of the store sits the typed [`Repository`], which is what services use.

pub mod memory_store;
pub mod repository;
pub mod sqlite_store;

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::config::{StoreBackend, StoreConfig};

pub use memory_store::MemoryDocumentStore;
pub use repository::{Record, Repository};
pub use sqlite_store::SqliteDocumentStore;

/// Raw document body as held by the store (never contains the `id` key)
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Shared handle to whichever store backend is configured
pub type SharedStore = Arc<dyn DocumentStore>;

/// A document together with the id the store assigned to it
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub data: Document,
}

/// Document store client, addressed by collection name and document id.
///
/// Ids are always minted by the store. An id that is not a valid native key
/// behaves exactly like an id with no document behind it.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name, used in logs
    fn backend(&self) -> &'static str;

    /// Store a new document under a freshly generated id
    async fn insert(&self, collection: &str, data: Document) -> Result<StoredDocument>;

    /// Fetch a document by id
    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>>;

    /// Overlay `patch` onto an existing document. Never creates a document.
    async fn merge(
        &self,
        collection: &str,
        id: &str,
        patch: Document,
    ) -> Result<Option<StoredDocument>>;

    /// Remove a document, reporting whether one was actually removed
    async fn remove(&self, collection: &str, id: &str) -> Result<bool>;

    /// Every document in the collection, in no particular order
    async fn scan(&self, collection: &str) -> Result<Vec<StoredDocument>>;

    /// Cheap connectivity check
    async fn ping(&self) -> Result<()>;
}

/// Parse an opaque id into the stores' native key type
pub(crate) fn native_key(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}

/// Generate a new native key
pub(crate) fn new_key() -> String {
    Uuid::new_v4().to_string()
}

/// Key-wise overwrite of `target` with the entries of `patch`
pub(crate) fn overlay(target: &mut Document, patch: Document) {
    for (key, value) in patch {
        target.insert(key, value);
    }
}

/// Storage operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOperation {
    Create,
    Read,
    Update,
    Delete,
}

impl fmt::Display for StorageOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageOperation::Create => "create",
            StorageOperation::Read => "read",
            StorageOperation::Update => "update",
            StorageOperation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Failure talking to the document store, tagged with the failed operation
#[derive(Debug, Clone, Error)]
#[error("DB {operation} failed: {message}")]
pub struct StorageError {
    pub operation: StorageOperation,
    pub message: String,
}

impl StorageError {
    pub fn new(operation: StorageOperation, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }

    /// Wrap any store error, keeping the full cause chain in the message
    pub fn wrap(operation: StorageOperation, err: anyhow::Error) -> Self {
        Self::new(operation, format!("{:#}", err))
    }
}

/// Initialize the configured document store
pub async fn init_store(config: &StoreConfig) -> Result<SharedStore> {
    let store: SharedStore = match config.backend {
        StoreBackend::Memory => Arc::new(MemoryDocumentStore::new()),
        StoreBackend::Sqlite => Arc::new(SqliteDocumentStore::connect(config).await?),
    };

    info!(backend = store.backend(), "Document store initialized");
    Ok(store)
}

/// Check store connectivity
pub async fn check_health(store: &dyn DocumentStore) -> Result<()> {
    store.ping().await
}
