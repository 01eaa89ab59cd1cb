// [apps/api/tests/clustering_test.rs]
//! S2 -- clustering: three nearby events within a minute of each other join
//! a single cluster and escalate severity as membership grows.
//!
//! `apps/api` only enqueues a pipeline job on upload -- clustering itself
//! runs in the separate `worker` process. These tests insert event fixtures
//! directly through the repository layer and drive `ClusteringEngine`
//! exactly as the worker would, then assert through the real `/clusters`
//! HTTP surface.

mod common;

use attention_api::prelude::build_router;
use attention_core_geo::LatLon;
use attention_domain_clustering::{ClusteringConfig, ClusteringEngine};
use attention_domain_models::{ClusterOut, Event, MediaKind};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

async fn seed_and_assign(env: &common::TestEnv, engine: &ClusteringEngine, lat: f64, lon: f64) {
    let location = LatLon::new(lat, lon).unwrap();
    let mut event = Event::new_skeleton(location, "incident".to_string(), MediaKind::Image, None);
    env.state.events.insert(&event).await.unwrap();
    engine.assign(&mut event).await.unwrap();
    env.state.events.update(&event).await.unwrap();
}

#[tokio::test]
async fn three_nearby_events_join_one_cluster_at_high_severity() {
    let env = common::build().await;
    let engine = ClusteringEngine::new(Arc::new(env.state.clusters.clone()), ClusteringConfig::default());

    seed_and_assign(&env, &engine, 52.2297, 21.0122).await;
    seed_and_assign(&env, &engine, 52.2298, 21.0123).await;
    seed_and_assign(&env, &engine, 52.2300, 21.0127).await;

    let app = build_router(env.state);
    let response = app.oneshot(Request::builder().uri("/api/v1/clusters").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let clusters: Vec<ClusterOut> = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].event_count, 3);
    assert_eq!(clusters[0].computed_severity, 3, "High == 3");
}

#[tokio::test]
async fn five_members_escalate_to_critical() {
    let env = common::build().await;
    let engine = ClusteringEngine::new(Arc::new(env.state.clusters.clone()), ClusteringConfig::default());

    for (lat, lon) in [
        (52.2297, 21.0122),
        (52.2298, 21.0123),
        (52.2300, 21.0127),
        (52.2299, 21.0124),
        (52.2296, 21.0121),
    ] {
        seed_and_assign(&env, &engine, lat, lon).await;
    }

    let clusters = env.state.clusters.list(None).await.unwrap();
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].event_count, 5);
    assert_eq!(clusters[0].computed_severity, attention_domain_models::Severity::Critical);
}
