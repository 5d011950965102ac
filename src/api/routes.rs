use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, propagate_request_id, request_span, RateLimiter};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes and middleware layers
pub fn create_router(state: AppState, limiter: RateLimiter) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/recommend", post(handlers::recommend))
        .route("/follow-up", post(handlers::follow_up))
        .route(
            "/conversation/:conversation_id",
            get(handlers::get_conversation),
        )
        .route("/schools", get(handlers::get_schools))
        .layer(middleware::from_fn_with_state(limiter, enforce_rate_limit))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        // Outside the trace layer so the span can pick up the id.
        .layer(middleware::from_fn(propagate_request_id))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
