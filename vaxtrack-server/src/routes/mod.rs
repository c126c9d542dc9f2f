pub mod v1;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;
use vaxtrack_core::api_routes;

use crate::{AppState, handlers};

/// Create the main API router with all versions
pub fn create_api_router() -> Router<AppState> {
    Router::new().merge(v1::create_v1_router())
    // Future versions can be merged here:
    // .merge(v2::create_v2_router())
}

/// Full application: health probe, versioned API and request tracing.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route(api_routes::HEALTH, get(handlers::health))
        .merge(create_api_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
