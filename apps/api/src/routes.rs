// [apps/api/src/routes.rs]
//! Router assembly for the `api` binary.

use crate::handlers::{admin, auth, clusters, events, gamification, stats, stream};
use crate::state::AppState;
use axum::http::Method;
use axum::routing::{get, patch, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Builds the full `/api/v1` router plus a body-size cap on the upload
/// route keyed to `UPLOAD_MAX_BYTES` and request tracing.
pub fn build_router(state: AppState) -> Router {
    let cors = build_cors(&state.config.cors_allowed_origins);

    let upload_route = axum::Router::new()
        .route("/events/upload", post(events::upload))
        .layer(RequestBodyLimitLayer::new(state.config.upload_max_bytes));

    let v1 = Router::new()
        .merge(upload_route)
        .route("/events", get(events::list))
        .route("/events/:id", get(events::detail))
        .route("/events/:id/status", patch(events::update_status))
        .route("/clusters", get(clusters::list))
        .route("/stats/summary", get(stats::summary))
        .route("/events/stream", get(stream::subscribe))
        .route("/leaderboard", get(gamification::leaderboard))
        .route("/badges", get(gamification::badges))
        .route("/auth/register", post(auth::register))
        .route("/auth/me", get(auth::me).patch(auth::update_me))
        .route("/token/pair", post(auth::token_pair))
        .route("/token/refresh", post(auth::token_refresh))
        .route("/admin/events/:id/reprocess", post(admin::reprocess))
        .route("/admin/stats/pipeline", get(admin::pipeline_stats));

    Router::new()
        .nest("/api/v1", v1)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(state)
}

fn build_cors(allowed_origins: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any);

    if allowed_origins.trim() == "*" {
        layer.allow_origin(Any)
    } else {
        let origins = allowed_origins
            .split(',')
            .filter_map(|origin| origin.trim().parse().ok())
            .collect::<Vec<_>>();
        layer.allow_origin(origins)
    }
}
