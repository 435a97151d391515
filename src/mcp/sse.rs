//! SSE session stream
//!
//! A session emits exactly one `endpoint` event carrying the absolute message URL,
//! then a `ping` event every keep-alive period. The stream never ends on its own;
//! it is dropped, and the session closed, when the client disconnects.

use std::{convert::Infallible, time::Duration};

use axum::response::sse::Event;
use futures::{
    future,
    stream::{self, Stream, StreamExt},
};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_stream::wrappers::IntervalStream;
use tracing::{debug, info};
use uuid::Uuid;

pub const SSE_PATH: &str = "/sse";
pub const MESSAGES_PATH: &str = "/messages";

pub const ENDPOINT_EVENT: &str = "endpoint";
pub const PING_EVENT: &str = "ping";

#[derive(Debug, Clone)]
pub struct SseSession {
    id: Uuid,
    endpoint: String,
    keepalive: Duration,
}

impl SseSession {
    /// `origin` is scheme plus authority, without a trailing slash.
    pub fn open(origin: &str, keepalive: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            endpoint: format!("{origin}{MESSAGES_PATH}"),
            keepalive,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn into_stream(self) -> impl Stream<Item = Result<Event, Infallible>> + Send + 'static {
        info!(session_id = %self.id, endpoint = %self.endpoint, "sse session opened");

        let mut lifecycle = SessionLifecycle {
            id: self.id,
            opened_at: Instant::now(),
            pings: 0,
        };

        let handshake = stream::once(future::ready(Ok(Event::default()
            .event(ENDPOINT_EVENT)
            .data(self.endpoint))));

        let mut ticker = interval_at(Instant::now() + self.keepalive, self.keepalive);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let pings = IntervalStream::new(ticker).map(move |_| {
            lifecycle.record_ping();
            Ok(Event::default().event(PING_EVENT).data(""))
        });

        handshake.chain(pings)
    }
}

/// Lives inside the keep-alive stream; dropping the stream drops it.
struct SessionLifecycle {
    id: Uuid,
    opened_at: Instant,
    pings: u64,
}

impl SessionLifecycle {
    fn record_ping(&mut self) {
        self.pings += 1;
        debug!(session_id = %self.id, pings = self.pings, "sse keep-alive sent");
    }
}

impl Drop for SessionLifecycle {
    fn drop(&mut self) {
        info!(
            session_id = %self.id,
            pings = self.pings,
            duration_ms = self.opened_at.elapsed().as_millis(),
            "sse session closed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_origin_plus_messages_path() {
        let session = SseSession::open("https://gateway.example.com", Duration::from_secs(10));
        assert_eq!(session.endpoint(), "https://gateway.example.com/messages");
    }

    #[test]
    fn sessions_have_distinct_ids() {
        let first = SseSession::open("http://localhost", Duration::from_secs(10));
        let second = SseSession::open("http://localhost", Duration::from_secs(10));
        assert_ne!(first.id(), second.id());
    }

    #[tokio::test(start_paused = true)]
    async fn emits_handshake_then_pings_on_schedule() {
        let started = Instant::now();
        let mut stream = Box::pin(
            SseSession::open("http://localhost:8080", Duration::from_secs(10)).into_stream(),
        );

        assert!(stream.next().await.is_some());
        assert_eq!(started.elapsed(), Duration::ZERO);

        assert!(stream.next().await.is_some());
        assert_eq!(started.elapsed(), Duration::from_secs(10));

        assert!(stream.next().await.is_some());
        assert_eq!(started.elapsed(), Duration::from_secs(20));
    }
}
