//! First-boot seeding of the professor collection.

use serde_json::Map;
use tracing::info;

use profdash_core::{ProfessorRecord, RecordId};

use crate::documents::{DocumentStore, StoreError};

/// The two example records an empty collection is seeded with.
pub fn seed_records() -> Vec<ProfessorRecord> {
    vec![
        ProfessorRecord {
            id: RecordId::new(1),
            name: "Dr. Smith".to_string(),
            title: "Professor".to_string(),
            department: "Computer Science".to_string(),
            extra: Map::new(),
        },
        ProfessorRecord {
            id: RecordId::new(2),
            name: "Dr. Johnson".to_string(),
            title: "Associate Professor".to_string(),
            department: "Mathematics".to_string(),
            extra: Map::new(),
        },
    ]
}

/// Insert the seed records if the collection is empty.
///
/// Returns whether seeding happened. Safe to call on every boot.
pub async fn seed_if_empty(store: &dyn DocumentStore) -> Result<bool, StoreError> {
    if store.count().await? > 0 {
        return Ok(false);
    }
    for record in seed_records() {
        store.insert(record).await?;
    }
    info!("seeded empty professor collection with example records");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_memory::InMemoryDocumentStore;

    #[tokio::test]
    async fn empty_collection_is_seeded_once() {
        let store = InMemoryDocumentStore::new();

        assert!(seed_if_empty(&store).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 2);

        // Second boot: nothing to do.
        assert!(!seed_if_empty(&store).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 2);

        let records = store.list().await.unwrap();
        assert_eq!(records[0].id, RecordId::new(1));
        assert_eq!(records[0].name, "Dr. Smith");
        assert_eq!(records[1].id, RecordId::new(2));
        assert_eq!(records[1].department, "Mathematics");
    }

    #[tokio::test]
    async fn seeded_ids_feed_the_allocator() {
        let store = InMemoryDocumentStore::new();
        seed_if_empty(&store).await.unwrap();

        assert_eq!(store.allocate_id().await.unwrap(), RecordId::new(3));
    }
}
