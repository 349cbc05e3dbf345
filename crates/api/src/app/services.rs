//! The operations behind the HTTP handlers.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use profdash_auth::{AdminCredentials, AuthError, Hs256TokenService, TokenVerifier};
use profdash_core::{ProfessorRecord, RecordDraft, RecordId, RecordPatch};
use profdash_store::{DocumentStore, StoreError};

/// How many times a create retries allocation when its id collides with an
/// out-of-band insert.
const CREATE_ATTEMPTS: usize = 3;

pub struct AppServices {
    store: Arc<dyn DocumentStore>,
    tokens: Arc<Hs256TokenService>,
    credentials: AdminCredentials,
}

impl AppServices {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        tokens: Arc<Hs256TokenService>,
        credentials: AdminCredentials,
    ) -> Self {
        Self {
            store,
            tokens,
            credentials,
        }
    }

    /// The token verifier the auth middleware consumes.
    pub fn verifier(&self) -> Arc<dyn TokenVerifier> {
        self.tokens.clone()
    }

    /// Check credentials and mint a bearer token.
    pub fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        if !self.credentials.verify(username, password) {
            return Err(AuthError::InvalidCredentials);
        }
        self.tokens.issue(username, Utc::now())
    }

    pub async fn professors_list(&self) -> Result<Vec<ProfessorRecord>, StoreError> {
        self.store.list().await
    }

    /// Allocate an id and persist a new record.
    ///
    /// Allocation is atomic in the store, so the retry loop only fires when
    /// a writer outside this service grabs the id between allocation and
    /// insert.
    pub async fn professors_create(
        &self,
        draft: RecordDraft,
    ) -> Result<ProfessorRecord, StoreError> {
        for attempt in 1..=CREATE_ATTEMPTS {
            let id = self.store.allocate_id().await?;
            let record = draft.clone().into_record(id);
            match self.store.insert(record.clone()).await {
                Ok(()) => return Ok(record),
                Err(StoreError::DuplicateId) => {
                    warn!(%id, attempt, "allocated id already taken, retrying allocation");
                }
                Err(e) => return Err(e),
            }
        }
        Err(StoreError::DuplicateId)
    }

    pub async fn professors_update(
        &self,
        id: RecordId,
        patch: &RecordPatch,
    ) -> Result<Option<ProfessorRecord>, StoreError> {
        self.store.update(id, patch).await
    }

    pub async fn professors_delete(&self, id: RecordId) -> Result<bool, StoreError> {
        self.store.delete(id).await
    }
}
