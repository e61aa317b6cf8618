//! SSE bridge between the progress hub and HTTP clients.
//!
//! Each connection subscribes a channel listener. The first message carries
//! the `init` envelope, later ones `progress` or `reset`. When the client
//! disconnects the stream is dropped, which unsubscribes the listener.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::stream::{Stream, StreamExt};
use inkpress::broadcast::ProgressHub;
use tracing::{debug, warn};

use crate::state::AppState;

/// Hub events serialized as JSON envelopes, one string per event.
pub fn envelope_stream(
    hub: &Arc<ProgressHub>,
    capacity: usize,
) -> impl Stream<Item = String> + Send + 'static {
    hub.event_stream(capacity)
        .filter_map(|event| async move {
            match event.to_json() {
                Ok(json) => Some(json),
                Err(e) => {
                    warn!("Failed to serialize {} event: {}", event.kind(), e);
                    None
                }
            }
        })
}

/// `GET /api/progress/stream`
pub async fn progress_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static> {
    debug!(
        "SSE client connected ({} listeners before)",
        state.hub.listener_count()
    );

    let events = envelope_stream(&state.hub, state.progress.listener_buffer)
        .map(|json| Ok(Event::default().data(json)));

    Sse::new(events).keep_alive(KeepAlive::new().interval(state.keep_alive()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use inkpress::broadcast::ProgressStatus;
    use inkpress::config::Config;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use crate::app;

    async fn read_until(stream: &mut TcpStream, received: &mut String, needle: &str) {
        let mut buf = [0u8; 1024];
        tokio::time::timeout(Duration::from_secs(5), async {
            while !received.contains(needle) {
                let n = stream.read(&mut buf).await.unwrap();
                assert!(n > 0, "connection closed before {:?} arrived", needle);
                received.push_str(&String::from_utf8_lossy(&buf[..n]));
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_envelope_stream_starts_with_init() {
        let hub = Arc::new(ProgressHub::new());
        hub.update("fetch", ProgressStatus::InProgress, "");
        hub.update("fetch", ProgressStatus::Completed, "done");
        hub.update("write", ProgressStatus::Pending, "queued");

        let mut stream = Box::pin(envelope_stream(&hub, 8));

        let init: serde_json::Value =
            serde_json::from_str(&stream.next().await.unwrap()).unwrap();
        assert_eq!(init["type"], "init");
        let snapshot = init["data"]["snapshot"].as_array().unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0]["stepId"], "fetch");
        assert_eq!(snapshot[0]["status"], "completed");
        assert_eq!(snapshot[0]["message"], "done");
        assert_eq!(snapshot[1]["stepId"], "write");
        assert_eq!(snapshot[1]["status"], "pending");

        hub.reset();
        let reset: serde_json::Value =
            serde_json::from_str(&stream.next().await.unwrap()).unwrap();
        assert_eq!(reset, serde_json::json!({ "type": "reset", "data": { "snapshot": [] } }));
    }

    #[tokio::test]
    async fn test_dropping_stream_unsubscribes() {
        let hub = Arc::new(ProgressHub::new());
        let stream = Box::pin(envelope_stream(&hub, 8));
        assert_eq!(hub.listener_count(), 1);

        drop(stream);
        assert_eq!(hub.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_stream_endpoint_sends_init_and_unsubscribes_on_disconnect() {
        let mut config = Config::default();
        config.progress.keep_alive_secs = 1;
        let state = AppState::from_config(&config).unwrap();
        let hub = state.hub.clone();
        hub.update("fetch", ProgressStatus::Completed, "done");

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = app::router(state, &[]);
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(
                b"GET /api/progress/stream HTTP/1.1\r\nHost: localhost\r\nAccept: text/event-stream\r\n\r\n",
            )
            .await
            .unwrap();

        let mut received = String::new();
        read_until(&mut stream, &mut received, "]}}\n\n").await;
        assert!(received.starts_with("HTTP/1.1 200 OK\r\n"), "{}", received);
        assert!(received
            .to_lowercase()
            .contains("content-type: text/event-stream"));

        let start = received.find("data: ").unwrap() + "data: ".len();
        let line = &received[start..];
        let line = &line[..line.find('\n').unwrap()];
        let init: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(init["type"], "init");
        assert_eq!(init["data"]["snapshot"][0]["stepId"], "fetch");
        assert_eq!(init["data"]["snapshot"][0]["status"], "completed");
        assert_eq!(hub.listener_count(), 1);

        // an idle stream carries keep-alive comments
        read_until(&mut stream, &mut received, "\r\n:\n\n").await;

        drop(stream);
        tokio::time::timeout(Duration::from_secs(5), async {
            while hub.listener_count() > 0 {
                hub.update("fetch", ProgressStatus::InProgress, "retry");
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        })
        .await
        .unwrap();

        hub.update("write", ProgressStatus::Pending, "queued");
        assert_eq!(hub.listener_count(), 0);
        assert_eq!(hub.snapshot().step_ids(), vec!["fetch", "write"]);
    }
}
