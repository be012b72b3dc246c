//! Web-related modules for HTTP handlers and types

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

use crate::AppState;

pub mod errors;
pub mod handlers;
pub mod params;
pub mod types;
pub mod utils;

pub use handlers::*;
pub use types::*;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/kinds", get(get_kinds_handler))
        .route("/api/artifacts", get(list_artifacts_handler))
        .route("/api/artifacts/{name}", get(get_artifact_handler))
        .route("/api/artifacts/{name}/census", get(get_census_handler))
        .route("/api/diagnostics", get(get_diagnostics_handler))
        .route(
            "/api/requests/{name}/payload",
            get(request_payload_handler).post(request_payload_handler),
        )
        .route("/api/reload", post(reload_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}
