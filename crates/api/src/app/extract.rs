//! Create-payload extraction.
//!
//! The create endpoint accepts its fields either as a JSON object or as a
//! form-encoded body; both arrive here as one free-form field map.

use axum::http::StatusCode;
use axum::{
    Form, Json, async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde_json::{Map, Value};

use super::errors::json_error;

/// A free-form document payload: JSON object or form fields.
///
/// Form values have no types on the wire, so they persist as strings.
#[derive(Debug)]
pub struct DocumentPayload(pub Map<String, Value>);

#[async_trait]
impl<S> FromRequest<S> for DocumentPayload
where
    S: Send + Sync,
{
    type Rejection = axum::response::Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if content_type.starts_with("application/json") {
            let Json(value) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|e| json_error(StatusCode::BAD_REQUEST, "invalid_payload", e.to_string()))?;
            match value {
                Value::Object(fields) => Ok(Self(fields)),
                _ => Err(json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_payload",
                    "expected a JSON object",
                )),
            }
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| json_error(StatusCode::BAD_REQUEST, "invalid_payload", e.to_string()))?;
            Ok(Self(
                pairs
                    .into_iter()
                    .map(|(key, value)| (key, Value::String(value)))
                    .collect(),
            ))
        } else {
            Err(json_error(
                StatusCode::BAD_REQUEST,
                "invalid_payload",
                "no data provided",
            ))
        }
    }
}
