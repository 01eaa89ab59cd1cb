// [apps/api/src/handlers/stream.rs]
//! Server-sent-events subscription endpoint.

use crate::state::AppState;
use attention_infra_bus::Frame;
use axum::extract::State;
use axum::http::{header, HeaderName};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use futures::stream::StreamExt;
use std::convert::Infallible;

/// `GET /events/stream` -- one SSE connection per dashboard client. Emits a
/// synthetic `connected` frame first, then an `event_update` frame per
/// fan-out message. `Cache-Control`/`X-Accel-Buffering` discourage
/// intermediary proxies from buffering the response, which would defeat the
/// point of a streaming connection.
pub async fn subscribe(State(state): State<AppState>) -> impl IntoResponse {
    let stream = state.bus.subscribe().map(|frame| {
        let event = match frame {
            Frame::Connected => Event::default().event("connected").data(r#"{"status":"connected"}"#),
            Frame::Message(message) => {
                let payload = serde_json::to_string(&message).unwrap_or_default();
                Event::default().event("event_update").data(payload)
            }
        };
        Ok::<Event, Infallible>(event)
    });

    let sse = Sse::new(stream).keep_alive(KeepAlive::default());
    let headers = [(header::CACHE_CONTROL, "no-cache"), (HeaderName::from_static("x-accel-buffering"), "no")];
    (headers, sse)
}
