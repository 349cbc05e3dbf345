use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::Value;
use tracing::{info, warn};

use profdash_core::{DomainError, RecordDraft, RecordId, RecordPatch};

use crate::app::extract::DocumentPayload;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn public_router() -> Router {
    Router::new().route("/professors", get(list_professors))
}

pub fn protected_router() -> Router {
    Router::new()
        .route("/professors", post(create_professor))
        .route(
            "/professors/:id",
            put(update_professor).delete(delete_professor),
        )
}

pub async fn list_professors(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.professors_list().await {
        Ok(records) => {
            info!("fetched {} professor records", records.len());
            (StatusCode::OK, Json(records)).into_response()
        }
        Err(e) => errors::store_error_to_response("failed to fetch professor data", e),
    }
}

pub async fn create_professor(
    Extension(services): Extension<Arc<AppServices>>,
    payload: DocumentPayload,
) -> axum::response::Response {
    let draft = match RecordDraft::from_fields(payload.0) {
        Ok(draft) => draft,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if draft.stripped_client_id() {
        warn!("ignoring client-supplied id on create; ids are allocator-assigned");
    }

    match services.professors_create(draft).await {
        Ok(record) => {
            info!("added professor {} ({})", record.id, record.name);
            (StatusCode::CREATED, Json(record)).into_response()
        }
        Err(e) => errors::store_error_to_response("failed to add professor", e),
    }
}

pub async fn update_professor(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
    payload: Result<Json<Value>, JsonRejection>,
) -> axum::response::Response {
    let fields = match payload {
        Ok(Json(Value::Object(fields))) => fields,
        Ok(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_payload",
                "expected a JSON object",
            );
        }
        Err(rejection) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_payload",
                rejection.to_string(),
            );
        }
    };

    let patch = match RecordPatch::from_fields(fields) {
        Ok(patch) => patch,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.professors_update(RecordId::new(id), &patch).await {
        Ok(Some(record)) => {
            info!("updated professor {id}");
            (StatusCode::OK, Json(record)).into_response()
        }
        Ok(None) => errors::domain_error_to_response(DomainError::NotFound),
        Err(e) => errors::store_error_to_response("failed to update professor", e),
    }
}

pub async fn delete_professor(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    match services.professors_delete(RecordId::new(id)).await {
        Ok(true) => {
            info!("deleted professor {id}");
            (StatusCode::OK, Json(dto::DeleteResponse { success: true })).into_response()
        }
        Ok(false) => errors::domain_error_to_response(DomainError::NotFound),
        Err(e) => errors::store_error_to_response("failed to delete professor", e),
    }
}
