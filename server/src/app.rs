use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use crate::routes;
use crate::state::AppState;

pub(crate) fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/quakes", axum::routing::get(routes::api::get_quakes))
        .route(
            "/api/quakes/{id}",
            axum::routing::get(routes::api::get_quake_detail),
        )
        .route("/api/air", axum::routing::get(routes::api::get_air))
        .route(
            "/api/natural-events",
            axum::routing::get(routes::api::get_natural_events),
        )
        .route("/api/sites", axum::routing::get(routes::api::get_sites))
        .route(
            "/api/feeds/status",
            axum::routing::get(routes::api::get_feed_status),
        )
        .route("/api/events", axum::routing::get(routes::sse::feed_events))
        .route(
            "/api/carbon/estimate",
            axum::routing::post(routes::api::carbon_estimate),
        )
        .route("/api/assistant", axum::routing::post(routes::assistant::ask))
        .route("/api/health", axum::routing::get(routes::api::health))
        .route("/api/metrics", axum::routing::get(routes::api::metrics))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
