//! Chunk store access.
//!
//! The embedding pipeline persists every chunk into a sqlite database
//! inside the store directory. The statistics tools only ever need the
//! full record set, so the seam is a single bulk read returning the
//! store's parallel arrays.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::Mutex;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Database file holding the persisted chunks inside the store directory.
pub const STORE_DB_FILE: &str = "chunks.sqlite3";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("connection error: {0}")]
    Connection(String),
    #[error("query error: {0}")]
    Query(String),
    #[error("malformed metadata for chunk '{id}': {message}")]
    Metadata { id: String, message: String },
}

/// Parallel arrays as returned by the store's bulk read: one entry per
/// persisted chunk, aligned by index.
#[derive(Debug, Clone, Default)]
pub struct StoreRecords {
    pub ids: Vec<String>,
    pub documents: Vec<String>,
    pub metadatas: Vec<serde_json::Value>,
}

/// Read access to a persisted chunk store.
pub trait ChunkStore: Send + Sync {
    /// Every record currently held by the store, in store order.
    fn get_all(&self) -> BoxFuture<'_, Result<StoreRecords, StoreError>>;
}

/// [`ChunkStore`] over the sqlite persistence of a store directory.
pub struct SqliteChunkStore {
    pool: SqlitePool,
}

impl std::fmt::Debug for SqliteChunkStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteChunkStore").finish_non_exhaustive()
    }
}

impl SqliteChunkStore {
    /// Open the chunk database inside `store_dir` read-only.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the database file is
    /// missing or cannot be opened.
    pub async fn open(store_dir: &Path) -> Result<Self, StoreError> {
        let db_path = store_dir.join(STORE_DB_FILE);
        tracing::info!(path = %db_path.display(), "opening chunk store");

        let url = format!("sqlite:{}", db_path.display());
        let opts = SqliteConnectOptions::from_str(&url)
            .map_err(|e| StoreError::Connection(e.to_string()))?
            .read_only(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self { pool })
    }
}

impl ChunkStore for SqliteChunkStore {
    fn get_all(&self) -> BoxFuture<'_, Result<StoreRecords, StoreError>> {
        Box::pin(async move {
            let rows: Vec<(String, String, String)> =
                sqlx::query_as("SELECT id, document, metadata FROM chunks ORDER BY rowid")
                    .fetch_all(&self.pool)
                    .await
                    .map_err(|e| StoreError::Query(e.to_string()))?;

            let mut records = StoreRecords::default();
            for (id, document, metadata) in rows {
                let metadata =
                    serde_json::from_str(&metadata).map_err(|e| StoreError::Metadata {
                        id: id.clone(),
                        message: e.to_string(),
                    })?;
                records.ids.push(id);
                records.documents.push(document);
                records.metadatas.push(metadata);
            }
            Ok(records)
        })
    }
}

/// In-memory [`ChunkStore`] for tests.
#[derive(Debug, Default)]
pub struct InMemoryChunkStore {
    records: Mutex<StoreRecords>,
}

impl InMemoryChunkStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record.
    ///
    /// # Panics
    ///
    /// Panics if the inner lock is poisoned.
    pub fn push(&self, id: &str, document: &str, metadata: serde_json::Value) {
        let mut records = self.records.lock().expect("store lock poisoned");
        records.ids.push(id.to_owned());
        records.documents.push(document.to_owned());
        records.metadatas.push(metadata);
    }
}

impl ChunkStore for InMemoryChunkStore {
    fn get_all(&self) -> BoxFuture<'_, Result<StoreRecords, StoreError>> {
        Box::pin(async move {
            let records = self.records.lock().expect("store lock poisoned");
            Ok(records.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    async fn seed_store(dir: &Path, rows: &[(&str, &str, &str)]) {
        let opts = SqliteConnectOptions::new()
            .filename(dir.join(STORE_DB_FILE))
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .unwrap();
        sqlx::query("CREATE TABLE chunks (id TEXT PRIMARY KEY, document TEXT NOT NULL, metadata TEXT NOT NULL)")
            .execute(&pool)
            .await
            .unwrap();
        for (id, document, metadata) in rows {
            sqlx::query("INSERT INTO chunks (id, document, metadata) VALUES (?, ?, ?)")
                .bind(id)
                .bind(document)
                .bind(metadata)
                .execute(&pool)
                .await
                .unwrap();
        }
        pool.close().await;
    }

    #[tokio::test]
    async fn get_all_returns_aligned_arrays() {
        let dir = tempfile::tempdir().unwrap();
        seed_store(
            dir.path(),
            &[
                ("c1", "first chunk", r#"{"nb_tokens": 10}"#),
                ("c2", "second chunk", r#"{"nb_tokens": 20}"#),
            ],
        )
        .await;

        let store = SqliteChunkStore::open(dir.path()).await.unwrap();
        let records = store.get_all().await.unwrap();
        assert_eq!(records.ids, vec!["c1", "c2"]);
        assert_eq!(records.documents[1], "second chunk");
        assert_eq!(records.metadatas[0]["nb_tokens"], json!(10));
    }

    #[tokio::test]
    async fn open_missing_database_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = SqliteChunkStore::open(dir.path()).await.unwrap_err();
        assert!(matches!(err, StoreError::Connection(_)));
    }

    #[tokio::test]
    async fn malformed_metadata_row_fails_the_read() {
        let dir = tempfile::tempdir().unwrap();
        seed_store(dir.path(), &[("bad", "body", "not-json")]).await;

        let store = SqliteChunkStore::open(dir.path()).await.unwrap();
        let err = store.get_all().await.unwrap_err();
        assert!(matches!(err, StoreError::Metadata { ref id, .. } if id == "bad"));
    }

    #[tokio::test]
    async fn in_memory_store_round_trips() {
        let store = InMemoryChunkStore::new();
        store.push("a", "alpha", json!({"nb_tokens": 1}));
        store.push("b", "beta", json!({"nb_tokens": 2}));

        let records = store.get_all().await.unwrap();
        assert_eq!(records.ids, vec!["a", "b"]);
        assert_eq!(records.documents, vec!["alpha", "beta"]);
    }
}
