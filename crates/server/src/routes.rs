use axum::{
    routing::{get, patch},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::openapi::ApiDoc;

pub mod auth;
pub mod providers;
pub mod services;

pub use auth::{ServerAuthConfig, ServerState};

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the application router: public health/docs plus the owner-scoped catalog.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json));

    let provider_routes = Router::new()
        .route("/providers", get(providers::find_all).post(providers::create))
        .route(
            "/providers/:id",
            get(providers::find_one).patch(providers::update).delete(providers::remove),
        )
        .route("/providers/:id/toggle-active", patch(providers::toggle_active));

    let service_routes = Router::new()
        .route("/services", get(services::find_all).post(services::create))
        .route("/services/stats", get(services::stats))
        .route(
            "/services/:id",
            get(services::find_one).patch(services::update).delete(services::remove),
        )
        .route("/services/:id/toggle-active", patch(services::toggle_active));

    public
        .merge(provider_routes)
        .merge(service_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
