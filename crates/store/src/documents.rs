//! The document-store seam.

use async_trait::async_trait;
use thiserror::Error;

use profdash_core::{ProfessorRecord, RecordId, RecordPatch};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with the allocated id already exists. Raised by the unique
    /// backstop index when an out-of-band writer races an insert; the
    /// create path retries allocation on this.
    #[error("a record with this id already exists")]
    DuplicateId,

    /// A stored document could not be decoded into a record.
    #[error("stored document is malformed: {0}")]
    Corrupt(String),

    /// Any other backend failure (connection, query, pool).
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Storage operations over the professor collection.
///
/// Implementations own two responsibilities beyond plain CRUD:
///
/// - **Atomic id allocation**: `allocate_id` claims the next id from a
///   monotonic high-water mark seeded from the collection maximum, so ids
///   are strictly increasing and never reused across deletes, even under
///   concurrent creates.
/// - **Internal identity stays internal**: whatever row key or handle the
///   backend uses must never appear in returned records.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every record, in storage-native (insertion) order.
    async fn list(&self) -> Result<Vec<ProfessorRecord>, StoreError>;

    /// Claim the next record id.
    async fn allocate_id(&self) -> Result<RecordId, StoreError>;

    /// Persist a record. Fails with [`StoreError::DuplicateId`] if a record
    /// with the same id already exists.
    async fn insert(&self, record: ProfessorRecord) -> Result<(), StoreError>;

    /// Merge a patch into the record with the given id.
    ///
    /// Returns the merged record, or `None` if no record matches.
    async fn update(
        &self,
        id: RecordId,
        patch: &RecordPatch,
    ) -> Result<Option<ProfessorRecord>, StoreError>;

    /// Remove the record with the given id. Returns whether a record was
    /// actually removed.
    async fn delete(&self, id: RecordId) -> Result<bool, StoreError>;

    /// Number of records in the collection.
    async fn count(&self) -> Result<u64, StoreError>;
}
