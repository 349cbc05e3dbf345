//! In-memory document store.
//!
//! Intended for tests/dev. Mirrors the Postgres backend's semantics:
//! insertion-order listing, high-water-mark id allocation, duplicate-id
//! rejection, shallow patch merge.

use std::sync::RwLock;

use profdash_core::{ProfessorRecord, RecordId, RecordPatch, next_record_id};

use crate::documents::{DocumentStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    records: Vec<ProfessorRecord>,
    last_id: i64,
}

#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    inner: RwLock<Inner>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn collection_max(records: &[ProfessorRecord]) -> i64 {
        records.iter().map(|r| r.id.as_i64()).max().unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn list(&self) -> Result<Vec<ProfessorRecord>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(inner.records.clone())
    }

    async fn allocate_id(&self) -> Result<RecordId, StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        let high_water = inner.last_id.max(Self::collection_max(&inner.records));
        let next = next_record_id((high_water > 0).then(|| RecordId::new(high_water)));
        inner.last_id = next.as_i64();
        Ok(next)
    }

    async fn insert(&self, record: ProfessorRecord) -> Result<(), StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        if inner.records.iter().any(|r| r.id == record.id) {
            return Err(StoreError::DuplicateId);
        }
        // Records inserted with explicit ids (seeding) advance the mark too.
        inner.last_id = inner.last_id.max(record.id.as_i64());
        inner.records.push(record);
        Ok(())
    }

    async fn update(
        &self,
        id: RecordId,
        patch: &RecordPatch,
    ) -> Result<Option<ProfessorRecord>, StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        match inner.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                let merged = patch.apply_to(record);
                *record = merged.clone();
                Ok(Some(merged))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: RecordId) -> Result<bool, StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        let before = inner.records.len();
        inner.records.retain(|r| r.id != id);
        Ok(inner.records.len() < before)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(inner.records.len() as u64)
    }
}
