//! Umami event collector client.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::domain::analytics_event::AnalyticsEvent;
use crate::domain::analytics_worker::{AnalyticsError, AnalyticsSink};

/// Public Umami Cloud collector.
pub const DEFAULT_ENDPOINT: &str = "https://cloud.umami.is/api/send";

/// Connection and identity settings for [`UmamiClient`].
#[derive(Debug, Clone)]
pub struct UmamiConfig {
    pub endpoint: String,
    pub website_id: String,
    /// Anonymous per-installation id, sent with every event.
    pub user_id: String,
    pub language: String,
    pub timeout: Duration,
}

#[derive(Serialize)]
struct Envelope<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    payload: Payload<'a>,
}

#[derive(Serialize)]
struct Payload<'a> {
    website: &'a str,
    name: &'a str,
    language: &'a str,
    hostname: &'static str,
    url: String,
    data: BTreeMap<String, Option<String>>,
}

/// Posts events as Umami `event` envelopes.
///
/// Common fields (`userId`, `version`, `platform`) are merged under the
/// event's custom fields, so an event may override them.
pub struct UmamiClient {
    client: Client,
    config: UmamiConfig,
}

impl UmamiClient {
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: UmamiConfig) -> Result<Self, AnalyticsError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("arclet-copier/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AnalyticsError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn common_fields(&self) -> BTreeMap<String, Option<String>> {
        BTreeMap::from([
            ("userId".to_string(), Some(self.config.user_id.clone())),
            (
                "version".to_string(),
                Some(env!("CARGO_PKG_VERSION").to_string()),
            ),
            (
                "platform".to_string(),
                Some(std::env::consts::OS.to_string()),
            ),
        ])
    }

    fn envelope<'a>(&'a self, event: &'a AnalyticsEvent) -> Envelope<'a> {
        let mut data = self.common_fields();
        data.extend(event.data.clone());

        Envelope {
            kind: "event",
            payload: Payload {
                website: &self.config.website_id,
                name: &event.name,
                language: &self.config.language,
                hostname: "arclet-copier",
                url: format!("/{}", event.name),
                data,
            },
        }
    }
}

#[async_trait]
impl AnalyticsSink for UmamiClient {
    async fn send(&self, event: &AnalyticsEvent) -> Result<(), AnalyticsError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&self.envelope(event))
            .send()
            .await
            .map_err(|e| AnalyticsError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalyticsError::Rejected(status.as_u16()));
        }

        debug!(event = %event.name, "Analytics event accepted");
        Ok(())
    }
}
