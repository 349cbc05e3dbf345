use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::{error, warn};

use profdash_core::DomainError;
use profdash_store::StoreError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => {
            warn!("rejected request payload: {msg}");
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => {
            json_error(StatusCode::NOT_FOUND, "not_found", "professor not found")
        }
    }
}

/// Collapse a storage failure into a fixed client message.
///
/// The full error stays in the log only.
pub fn store_error_to_response(message: &'static str, err: StoreError) -> axum::response::Response {
    error!("{message}: {err}");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message)
}
