// [apps/api/tests/bounds_filter_test.rs]
//! S4 -- bounds filter: a viewport restricts both `/events` and `/clusters`
//! to members inside it.

mod common;

use attention_api::prelude::build_router;
use attention_core_geo::LatLon;
use attention_domain_clustering::{ClusteringConfig, ClusteringEngine};
use attention_domain_models::{ClusterOut, Event, EventOut, MediaKind};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use tower::ServiceExt;

#[derive(Deserialize)]
struct ListResponse {
    events: Vec<EventOut>,
}

const WARSAW: (f64, f64) = (52.23, 21.01);
const LONDON: (f64, f64) = (51.51, -0.13);

#[tokio::test]
async fn bounds_restrict_events_listing_to_the_viewport() {
    let env = common::build().await;
    for (lat, lon) in [WARSAW, LONDON] {
        let event = Event::new_skeleton(LatLon::new(lat, lon).unwrap(), "incident".to_string(), MediaKind::Image, None);
        env.state.events.insert(&event).await.unwrap();
    }
    let app = build_router(env.state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/events?bounds=52.0,20.5,52.5,21.5")
                .body(Body::empty())
                .unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let page: ListResponse = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(page.events.len(), 1);
    assert!((page.events[0].latitude - WARSAW.0).abs() < 1e-4);
}

#[tokio::test]
async fn bounds_restrict_cluster_listing_to_the_viewport() {
    let env = common::build().await;
    let engine = ClusteringEngine::new(Arc::new(env.state.clusters.clone()), ClusteringConfig::default());

    for (lat, lon) in [WARSAW, (52.2301, 21.0105), LONDON, (51.5101, -0.1295)] {
        let location = LatLon::new(lat, lon).unwrap();
        let mut event = Event::new_skeleton(location, "incident".to_string(), MediaKind::Image, None);
        env.state.events.insert(&event).await.unwrap();
        engine.assign(&mut event).await.unwrap();
        env.state.events.update(&event).await.unwrap();
    }

    let app = build_router(env.state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/clusters?bounds=52.0,20.5,52.5,21.5")
                .body(Body::empty())
                .unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let clusters: Vec<ClusterOut> = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(clusters.len(), 1);
    assert!((clusters[0].latitude - WARSAW.0).abs() < 0.01);
}
