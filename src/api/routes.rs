use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::request_id::{propagate_request_id, request_span};
use super::AppState;

/// Creates the reference backend router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Recommendations
        .route(
            "/api/users/:user_id/recommendations",
            get(handlers::list_user_recommendations),
        )
        .route(
            "/api/users/:user_id/recommendations/:recommendation_id/reason",
            get(handlers::get_reason),
        )
        .route(
            "/api/users/:user_id/recommendations/:recommendation_id/metadata",
            get(handlers::get_metadata_insight),
        )
        .route(
            "/api/recommendations/:recommendation_id",
            get(handlers::get_recommendation),
        )
        // Feedback
        .route(
            "/api/users/:user_id/recommendations/:recommendation_id/feedback",
            post(handlers::submit_feedback),
        )
        .route(
            "/api/recommendations/:recommendation_id/feedback",
            get(handlers::get_recommendation_feedback),
        )
        .route("/api/users/:user_id/feedback", get(handlers::get_user_feedback))
        // Metadata weights
        .route(
            "/api/users/:user_id/metadata/weights",
            get(handlers::get_weights).put(handlers::update_weights),
        )
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(propagate_request_id))
                .layer(TraceLayer::new_for_http().make_span_with(request_span))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
