use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::middleware::{auth_middleware, metrics_middleware};
use super::{categories, handlers, requests, resources, suggestions};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Downloads go through the configured authenticator
    let gated_routes = Router::new()
        .route(
            "/resources/{id}/download",
            post(resources::record_download),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Resources
        .route("/resources/search", get(resources::search))
        .route("/resources/hot", get(resources::hot))
        // Categories
        .route("/categories", get(categories::list_categories))
        // Help requests
        .route("/requests", post(requests::submit_request))
        // Suggestions
        .route("/search/suggestions", get(suggestions::suggestions))
        .merge(gated_routes)
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
