//! Fire-and-forget analytics recording.

use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use crate::domain::analytics_event::AnalyticsEvent;
use crate::domain::repositories::{KeyValueStore, keys, load, save};
use crate::error::AppError;

/// Queues analytics events for the background worker.
///
/// Tracking never blocks and never fails: a full queue drops the event.
/// A disabled tracker discards everything.
#[derive(Clone)]
pub struct AnalyticsTracker {
    tx: Option<mpsc::Sender<AnalyticsEvent>>,
}

impl AnalyticsTracker {
    pub fn new(tx: mpsc::Sender<AnalyticsEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A tracker that discards every event.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.as_ref().is_some_and(|tx| !tx.is_closed())
    }

    /// Free slots in the queue, or `None` when disabled.
    pub fn queue_capacity(&self) -> Option<usize> {
        self.tx.as_ref().map(|tx| tx.capacity())
    }

    pub fn track(&self, event: AnalyticsEvent) {
        let Some(tx) = &self.tx else {
            return;
        };

        match tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                metrics::counter!("analytics_events_dropped_total").increment(1);
                warn!(event = %event.name, "Analytics queue full, dropping event");
            }
            Err(TrySendError::Closed(event)) => {
                debug!(event = %event.name, "Analytics worker stopped, dropping event");
            }
        }
    }

    /// Tracks an event built from a JSON object of custom fields.
    pub fn track_json(&self, name: &str, data: Value) {
        self.track(AnalyticsEvent::from_json(name, data));
    }

    pub fn track_error(&self, context: &str, message: &str) {
        self.track_json("error", json!({ "context": context, "message": message }));
    }
}

/// Returns the persisted anonymous user id, creating one on first use.
pub async fn load_or_create_user_id(store: &dyn KeyValueStore) -> Result<String, AppError> {
    if let Some(id) = load::<String>(store, keys::ANALYTICS_USER_ID).await? {
        return Ok(id);
    }

    let bytes: [u8; 16] = rand::random();
    let id = hex::encode(bytes);
    save(store, keys::ANALYTICS_USER_ID, &id).await?;

    debug!("Created analytics user id");
    Ok(id)
}

/// Creates a tracker and the receiving end for the worker.
pub fn channel(capacity: usize) -> (AnalyticsTracker, mpsc::Receiver<AnalyticsEvent>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (AnalyticsTracker::new(tx), rx)
}
