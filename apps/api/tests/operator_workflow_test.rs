// [apps/api/tests/operator_workflow_test.rs]
//! S5 -- operator workflow & gamification: a reporter submits a report, a
//! staff operator verifies it, and the reporter's profile reflects both the
//! submission and verification hooks; the status change is published on
//! the bus.

mod common;

use attention_api::prelude::build_router;
use attention_domain_models::{FanOutMessage, UserProfileOut};
use attention_infra_bus::Frame;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn register_and_login(app: &axum::Router, username: &str, email: &str) -> (i64, String) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/register")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"email": email, "password": "correct horse battery staple", "username": username})
                        .to_string()))
                .unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let registered: Value = serde_json::from_slice(&bytes).unwrap();
    let user_id = registered["user_id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/token/pair")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"username": username, "password": "correct horse battery staple"}).to_string()))
                .unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let pair: Value = serde_json::from_slice(&bytes).unwrap();
    (user_id, pair["access_token"].as_str().unwrap().to_string())
}

#[tokio::test]
async fn verification_awards_reputation_and_badges_and_publishes_status_change() {
    let env = common::build().await;
    let bus = env.state.bus.clone();
    let app = build_router(env.state.clone());

    let (reporter_id, reporter_token) = register_and_login(&app, "reporter_u", "reporter@example.com").await;
    let (_staff_id, staff_token) = register_and_login(&app, "operator_o", "operator@example.com").await;
    common::promote_to_staff(&env.db, _staff_id).await;

    let upload_body = common::multipart_body(
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
                .header("authorization", format!("Bearer {reporter_token}"))
                .body(Body::from(upload_body))
                .unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let accepted: Value = serde_json::from_slice(&bytes).unwrap();
    let event_id = accepted["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/auth/me")
                .header("authorization", format!("Bearer {reporter_token}"))
                .body(Body::empty())
                .unwrap())
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let profile: UserProfileOut = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(profile.reports_submitted, 1);
    assert!(profile.badges.contains(&"first_report".to_string()));

    let mut subscription = bus.subscribe();
    assert!(matches!(subscription_next(&mut subscription).await, Frame::Connected));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/api/v1/events/{event_id}/status"))
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {staff_token}"))
                .body(Body::from(json!({"status": "verified"}).to_string()))
                .unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    match subscription_next(&mut subscription).await {
        Frame::Message(FanOutMessage::StatusChange { event }) => assert_eq!(event.id.to_string(), event_id),
        other => panic!("expected a status_change message, got {other:?}"),
    }

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/auth/me")
                .header("authorization", format!("Bearer {reporter_token}"))
                .body(Body::empty())
                .unwrap())
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let profile: UserProfileOut = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(profile.reports_verified, 1);
    assert_eq!(profile.reputation_score, 10);
    assert!(profile.badges.contains(&"first_verified".to_string()));
    assert_eq!(reporter_id, profile.user_id);
}

async fn subscription_next(stream: &mut std::pin::Pin<Box<dyn futures::Stream<Item = Frame> + Send>>) -> Frame {
    use futures::StreamExt;
    stream.next().await.expect("bus subscription stream never ends")
}
