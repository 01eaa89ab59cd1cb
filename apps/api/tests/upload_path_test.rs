// [apps/api/tests/upload_path_test.rs]
//! S1 -- image upload path: a submitted report is visible immediately at
//! its submitted coordinates, before any pipeline stage has touched it.

mod common;

use attention_api::prelude::build_router;
use attention_domain_models::EventOut;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

#[tokio::test]
async fn upload_returns_202_and_is_immediately_readable() {
    let env = common::build().await;
    let app = build_router(env.state);

    let body = common::multipart_body(
        &[("latitude", "52.2297"), ("longitude", "21.0122"), ("description", "Fire at the corner")],
        common::ONE_PIXEL_PNG,
        "image/png");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/events/upload")
                .header("content-type", common::multipart_content_type())
                .body(Body::from(body))
                .unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let accepted: Value = serde_json::from_slice(&bytes).unwrap();
    let id = accepted["id"].as_str().unwrap().to_string();
    assert_eq!(accepted["status"], "processing");

    let response = app
        .oneshot(Request::builder().uri(format!("/api/v1/events/{id}")).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let event: EventOut = serde_json::from_slice(&bytes).unwrap();

    assert!((event.latitude - 52.2297).abs() < 1e-4);
    assert!((event.longitude - 21.0122).abs() < 1e-4);
    assert_eq!(event.media_type, "image");
    assert_eq!(event.status, "new");
    assert_eq!(event.category, "unclassified");
}

#[tokio::test]
async fn upload_without_media_is_rejected() {
    let env = common::build().await;
    let app = build_router(env.state);

    const BOUNDARY: &str = "test-boundary-attention-map";
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"latitude\"\r\n\r\n52.0\r\n\
         --{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"longitude\"\r\n\r\n21.0\r\n\
         --{BOUNDARY}--\r\n");

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/events/upload")
                .header("content-type", common::multipart_content_type())
                .body(Body::from(body))
                .unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn uploading_identical_payloads_twice_creates_two_distinct_events() {
    let env = common::build().await;
    let app = build_router(env.state);

    let make_body = || {
        common::multipart_body(
            &[("latitude", "52.2297"), ("longitude", "21.0122"), ("description", "same report")],
            common::ONE_PIXEL_PNG,
            "image/png")
    };

    let mut ids = Vec::new();
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/events/upload")
                    .header("content-type", common::multipart_content_type())
                    .body(Body::from(make_body()))
                    .unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let accepted: Value = serde_json::from_slice(&bytes).unwrap();
        ids.push(accepted["id"].as_str().unwrap().to_string());
    }

    assert_ne!(ids[0], ids[1]);
}
