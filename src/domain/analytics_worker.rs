//! Background worker draining the analytics queue.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use crate::domain::analytics_event::AnalyticsEvent;

/// Errors raised while delivering an analytics event.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("Analytics transport error: {0}")]
    Transport(String),

    #[error("Analytics collector rejected event with status {0}")]
    Rejected(u16),
}

/// Destination for analytics events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    async fn send(&self, event: &AnalyticsEvent) -> Result<(), AnalyticsError>;
}

/// Delivery attempts per event after the first one.
const MAX_RETRIES: usize = 2;

/// Drains `rx` until every sender is dropped, delivering each event to `sink`.
///
/// Each event gets one attempt plus [`MAX_RETRIES`] retries with jittered
/// exponential backoff. Events that still fail are dropped with a warning;
/// nothing is persisted for later delivery.
pub async fn run_analytics_worker(
    mut rx: mpsc::Receiver<AnalyticsEvent>,
    sink: Arc<dyn AnalyticsSink>,
) {
    info!("Analytics worker started");

    while let Some(event) = rx.recv().await {
        let strategy = ExponentialBackoff::from_millis(10)
            .factor(10)
            .max_delay(std::time::Duration::from_secs(2))
            .map(jitter)
            .take(MAX_RETRIES);

        let result = Retry::spawn(strategy, || {
            let sink = sink.clone();
            let event = &event;
            async move { sink.send(event).await }
        })
        .await;

        match result {
            Ok(()) => debug!(event = %event.name, "Analytics event delivered"),
            Err(e) => {
                metrics::counter!("analytics_events_dropped_total").increment(1);
                warn!(event = %event.name, error = %e, "Dropping analytics event");
            }
        }
    }

    info!("Analytics worker stopped");
}
