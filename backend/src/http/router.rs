//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (request ids, CORS, compression,
//! tracing), and creates the axum router ready for serving.

use axum::{body::Body, http::Request, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        .route("/horses", get(handlers::list_horses).post(handlers::create_horse))
        .route(
            "/horses/{id}",
            get(handlers::get_horse)
                .put(handlers::update_horse)
                .delete(handlers::delete_horse),
        )
        .route("/horses/{id}/familytree", get(handlers::get_family_tree));

    // Request ids are assigned before tracing so every span carries one.
    let request_tracing = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::x_request_id());

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(request_tracing)
        .with_state(state)
}
