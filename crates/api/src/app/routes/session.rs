use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{info, warn};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::middleware::AuthenticatedUser;

pub fn public_router() -> Router {
    Router::new().route("/login", post(login))
}

pub fn protected_router() -> Router {
    Router::new().route("/protected", get(protected))
}

pub async fn index() -> &'static str {
    "Welcome to the Professor Dashboard API!"
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::LoginRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_payload",
                rejection.to_string(),
            );
        }
    };

    match services.login(&body.username, &body.password) {
        Ok(access_token) => {
            info!("user {} logged in", body.username);
            (StatusCode::OK, Json(dto::TokenResponse { access_token })).into_response()
        }
        Err(e) => {
            warn!("login failed for {}: {e}", body.username);
            errors::json_error(
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "bad username or password",
            )
        }
    }
}

pub async fn protected(Extension(user): Extension<AuthenticatedUser>) -> impl IntoResponse {
    info!("protected endpoint accessed by {}", user.0);
    Json(dto::WhoAmIResponse { logged_in_as: user.0 })
}
