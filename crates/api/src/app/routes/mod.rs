use axum::{Router, routing::get};

pub mod professors;
pub mod session;

/// Routes reachable without a token: welcome, login, read-all.
pub fn public_router() -> Router {
    Router::new()
        .route("/", get(session::index))
        .merge(session::public_router())
        .merge(professors::public_router())
}

/// Routes behind the bearer check: whoami and every mutation.
pub fn protected_router() -> Router {
    Router::new()
        .merge(session::protected_router())
        .merge(professors::protected_router())
}
