//! Postgres-backed document store.
//!
//! Each record is one JSONB document in the `professors` table. The serial
//! row key (`pk`) exists only to preserve insertion order and is never
//! selected into results, so clients cannot observe it.
//!
//! ## Id allocation
//!
//! The `professor_id_alloc` table holds a single row with the high-water
//! mark of assigned ids. `allocate_id` claims the next id in one `UPDATE ...
//! RETURNING` statement; the row lock serializes concurrent creates, and
//! taking `GREATEST(last_id, collection max)` keeps the mark correct even
//! when records were inserted out of band (seeding included). A unique
//! index on the document id remains as a backstop: a colliding insert maps
//! to `StoreError::DuplicateId` instead of corrupting the collection.
//!
//! ## Error mapping
//!
//! SQLSTATE `23505` (unique violation) becomes `DuplicateId`; everything
//! else surfaces as `Backend` with the failing operation named. Callers log
//! the detail and hand a generic message to clients.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tracing::instrument;

use profdash_core::{ProfessorRecord, RecordId, RecordPatch};

use crate::documents::{DocumentStore, StoreError};

/// How long to wait for a connection before giving up.
///
/// Applies to the initial connect as well, which is what makes storage
/// outages fail fast at process start.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Connect to Postgres, failing within [`CONNECT_TIMEOUT`].
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(CONNECT_TIMEOUT)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool (tests, shared pools).
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the collection table, the allocator row, and the unique
    /// backstop index. Idempotent.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS professors (
                pk  BIGSERIAL PRIMARY KEY,
                doc JSONB NOT NULL
            )
            "#,
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS professors_record_id_key
                ON professors (((doc->>'id')::bigint))
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS professor_id_alloc (
                singleton BOOLEAN PRIMARY KEY DEFAULT TRUE CHECK (singleton),
                last_id   BIGINT NOT NULL
            )
            "#,
            r#"
            INSERT INTO professor_id_alloc (singleton, last_id)
                VALUES (TRUE, 0)
                ON CONFLICT (singleton) DO NOTHING
            "#,
        ];

        for sql in statements {
            sqlx::query(sql)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DocumentStore for PgDocumentStore {
    #[instrument(skip(self), err)]
    async fn list(&self) -> Result<Vec<ProfessorRecord>, StoreError> {
        let rows = sqlx::query("SELECT doc FROM professors ORDER BY pk ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list", e))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let doc: serde_json::Value = row
                .try_get("doc")
                .map_err(|e| StoreError::Backend(format!("failed to read doc column: {e}")))?;
            let record = serde_json::from_value(doc)
                .map_err(|e| StoreError::Corrupt(e.to_string()))?;
            records.push(record);
        }
        Ok(records)
    }

    #[instrument(skip(self), err)]
    async fn allocate_id(&self) -> Result<RecordId, StoreError> {
        // Single statement: the row lock on the allocator row serializes
        // concurrent creates; GREATEST folds in ids inserted out of band.
        // Documents without a readable id are skipped by MAX, so a collection
        // of only malformed records allocates 1.
        let row = sqlx::query(
            r#"
            UPDATE professor_id_alloc
            SET last_id = GREATEST(
                    last_id,
                    (SELECT COALESCE(MAX((doc->>'id')::bigint), 0) FROM professors)
                ) + 1
            RETURNING last_id
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("allocate_id", e))?;

        let id: i64 = row
            .try_get("last_id")
            .map_err(|e| StoreError::Backend(format!("failed to read last_id: {e}")))?;
        Ok(RecordId::new(id))
    }

    #[instrument(skip(self, record), fields(id = %record.id), err)]
    async fn insert(&self, record: ProfessorRecord) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO professors (doc) VALUES ($1)")
            .bind(record.to_document())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::DuplicateId
                } else {
                    map_sqlx_error("insert", e)
                }
            })?;
        Ok(())
    }

    #[instrument(skip(self, patch), fields(id = %id), err)]
    async fn update(
        &self,
        id: RecordId,
        patch: &RecordPatch,
    ) -> Result<Option<ProfessorRecord>, StoreError> {
        // `||` is a shallow top-level merge, the same semantics as the
        // in-memory patch application.
        let row = sqlx::query(
            r#"
            UPDATE professors
            SET doc = doc || $2
            WHERE (doc->>'id')::bigint = $1
            RETURNING doc
            "#,
        )
        .bind(id.as_i64())
        .bind(serde_json::Value::Object(patch.fields().clone()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;

        match row {
            Some(row) => {
                let doc: serde_json::Value = row
                    .try_get("doc")
                    .map_err(|e| StoreError::Backend(format!("failed to read doc column: {e}")))?;
                let record = serde_json::from_value(doc)
                    .map_err(|e| StoreError::Corrupt(e.to_string()))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn delete(&self, id: RecordId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM professors WHERE (doc->>'id')::bigint = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), err)]
    async fn count(&self) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM professors")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("count", e))?;
        let count: i64 = row
            .try_get("count")
            .map_err(|e| StoreError::Backend(format!("failed to read count: {e}")))?;
        Ok(count as u64)
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            StoreError::Backend(format!("database error in {operation}: {}", db_err.message()))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Backend(format!("timed out acquiring a connection in {operation}"))
        }
        _ => StoreError::Backend(format!("sqlx error in {operation}: {err}")),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}
