//! API Routes
//!
//! Configures the Axum router with all endpoints.

use axum::{
    routing::{delete, get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, get_handler, health_handler, set_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /set` - Store a key-value pair
/// - `GET /get/:key` - Retrieve a value by key
/// - `DELETE /del/:key` - Delete a key
/// - `GET /stats` - Get store statistics
/// - `GET /health` - Health check endpoint
///
/// Requests pass through a permissive CORS layer and are traced with
/// `tower_http`'s `TraceLayer`.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler))
        .route("/get/:key", get(get_handler))
        .route("/del/:key", delete(delete_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
