// [apps/api/tests/pagination_test.rs]
//! S3 -- filter and pagination: `limit`/`offset` page through a listing
//! newest-first, and `limit` never exceeds its hard cap regardless of the
//! requested value.

mod common;

use attention_api::prelude::build_router;
use attention_core_geo::LatLon;
use attention_domain_models::{Event, EventOut, MediaKind};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde::Deserialize;
use tower::ServiceExt;

#[derive(Deserialize)]
struct ListResponse {
    events: Vec<EventOut>,
    total: u64,
    limit: u32,
}

async fn seed(env: &common::TestEnv, count: usize) {
    for i in 0..count {
        let location = LatLon::new(52.23 + i as f64 * 0.0001, 21.01).unwrap();
        let event = Event::new_skeleton(location, format!("report {i}"), MediaKind::Image, None);
        env.state.events.insert(&event).await.unwrap();
    }
}

#[tokio::test]
async fn limit_and_offset_page_through_newest_first() {
    let env = common::build().await;
    seed(&env, 10).await;
    let app = build_router(env.state);

    let response = app
        .oneshot(Request::builder().uri("/api/v1/events?limit=3&offset=2").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let page: ListResponse = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(page.events.len(), 3);
    assert_eq!(page.total, 10);
    for window in page.events.windows(2) {
        assert!(window[0].created_at >= window[1].created_at, "expected created_at DESC order");
    }
}

#[tokio::test]
async fn limit_is_clamped_to_500_regardless_of_requested_value() {
    let env = common::build().await;
    seed(&env, 3).await;
    let app = build_router(env.state);

    let response = app
        .oneshot(Request::builder().uri("/api/v1/events?limit=999999").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let page: ListResponse = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(page.limit, 500);
}
