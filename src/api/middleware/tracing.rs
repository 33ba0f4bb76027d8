//! Per-message tracing for the bus.
//!
//! Every request gets a `message` span carrying the method and path. The
//! query string is left out because page URLs travel in it.

use axum::http::Request;
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, MakeSpan, TraceLayer};
use tracing::{Level, Span};

/// Opens the `message` span for one bus request.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageSpan;

impl<B> MakeSpan<B> for MessageSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::info_span!(
            "message",
            method = %request.method(),
            path = %request.uri().path(),
        )
    }
}

/// Tracing layer for the bus router.
///
/// Arrivals log at `DEBUG`, replies at `INFO` with latency in milliseconds,
/// and 5xx replies at `WARN`.
///
/// ```text
/// INFO message{method=POST path=/api/copy}: finished processing request latency=3 ms status=200
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, MessageSpan> {
    TraceLayer::new_for_http()
        .make_span_with(MessageSpan)
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(DefaultOnFailure::new().level(Level::WARN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, routing::get};
    use axum_test::TestServer;

    #[tokio::test]
    async fn test_layer_passes_messages_through() {
        let app = Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(layer());
        let server = TestServer::new(app).unwrap();

        let response = server.get("/ping?url=https://example.com/").await;

        response.assert_status_ok();
        response.assert_text("pong");
    }
}
