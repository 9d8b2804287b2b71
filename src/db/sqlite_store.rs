//! SQLite-backed document store
//!
//! Each document is one row of the `documents` table, keyed by
//! `(collection, id)` with the body serialized as JSON text.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use super::{native_key, new_key, overlay, Document, DocumentStore, StoredDocument};
use crate::config::StoreConfig;

#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: String,
    data: String,
}

/// Document store persisted in SQLite
#[derive(Debug, Clone)]
pub struct SqliteDocumentStore {
    pool: SqlitePool,
}

impl SqliteDocumentStore {
    /// Connect to the configured database and run migrations
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await
            .with_context(|| format!("Failed to connect to document database: {}", config.url))?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, running migrations on it
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run document store migrations")?;

        Ok(Self { pool })
    }

    async fn fetch(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, data
            FROM documents
            WHERE collection = ? AND id = ?
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch document")?;

        row.map(row_to_document).transpose()
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn insert(&self, collection: &str, data: Document) -> Result<StoredDocument> {
        let id = new_key();
        let now = Utc::now().to_rfc3339();
        let body = serde_json::to_string(&data).context("Failed to serialize document")?;

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(collection)
        .bind(&id)
        .bind(&body)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .context("Failed to insert document")?;

        Ok(StoredDocument { id, data })
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>> {
        if native_key(id).is_none() {
            return Ok(None);
        }
        self.fetch(collection, id).await
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

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, data FROM documents WHERE collection = ? AND id = ?",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to fetch document for update")?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut stored = row_to_document(row)?;
        overlay(&mut stored.data, patch);
        let body = serde_json::to_string(&stored.data).context("Failed to serialize document")?;

        sqlx::query(
            r#"
            UPDATE documents
            SET data = ?, updated_at = ?
            WHERE collection = ? AND id = ?
            "#,
        )
        .bind(&body)
        .bind(Utc::now().to_rfc3339())
        .bind(collection)
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to update document")?;

        tx.commit().await.context("Failed to commit document update")?;

        Ok(Some(stored))
    }

    async fn remove(&self, collection: &str, id: &str) -> Result<bool> {
        if native_key(id).is_none() {
            return Ok(false);
        }

        let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete document")?;

        Ok(result.rows_affected() > 0)
    }

    async fn scan(&self, collection: &str) -> Result<Vec<StoredDocument>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, data FROM documents WHERE collection = ?",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await
        .context("Failed to scan collection")?;

        rows.into_iter().map(row_to_document).collect()
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Document database is not reachable")?;
        Ok(())
    }
}

fn row_to_document(row: DocumentRow) -> Result<StoredDocument> {
    let data: Document = serde_json::from_str(&row.data)
        .with_context(|| format!("Corrupt document body for id {}", row.id))?;
    Ok(StoredDocument { id: row.id, data })
}
