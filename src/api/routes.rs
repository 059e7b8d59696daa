//! API route definitions.

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::handlers;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/login", post(handlers::login))
        .route("/api/user", post(handlers::create_user))
        .route("/api/user/me", get(handlers::get_me))
        .route(
            "/api/user/{id}",
            put(handlers::update_user).delete(handlers::delete_user),
        )
        .route("/api/users", get(handlers::list_users))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
