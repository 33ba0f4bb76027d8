//! HTTP client for GET-based shortening APIs.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::form_urlencoded;

use super::service::{ShortenerError, UrlShortener};
use crate::domain::entities::ShortUrlProvider;

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest response body echoed back in an error.
const MAX_ERROR_BODY: usize = 200;

/// Calls `<endpoint><percent-encoded url>` and reads the plain-text body.
///
/// A response is a short URL only if the status is 2xx, the trimmed body
/// starts with `http` and it does not contain `Error`.
#[derive(Clone)]
pub struct HttpShortener {
    client: Client,
    endpoints: HashMap<ShortUrlProvider, String>,
}

impl HttpShortener {
    /// Creates a client using each provider's public endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenerError::Client`] if the TLS backend fails to initialise.
    pub fn new(timeout: Duration) -> Result<Self, ShortenerError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("arclet-copier/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ShortenerError::Client(e.to_string()))?;

        let endpoints = ShortUrlProvider::ALL
            .into_iter()
            .map(|provider| (provider, provider.default_endpoint().to_string()))
            .collect();

        Ok(Self { client, endpoints })
    }

    /// Overrides the endpoint prefix for one provider.
    pub fn with_endpoint(mut self, provider: ShortUrlProvider, endpoint: impl Into<String>) -> Self {
        self.endpoints.insert(provider, endpoint.into());
        self
    }

    fn request_url(&self, url: &str, provider: ShortUrlProvider) -> String {
        let endpoint = self
            .endpoints
            .get(&provider)
            .map(String::as_str)
            .unwrap_or_else(|| provider.default_endpoint());
        let encoded: String = form_urlencoded::byte_serialize(url.as_bytes()).collect();

        format!("{endpoint}{encoded}")
    }
}

/// Applies the success rule to a response body.
fn parse_short_url(body: &str) -> Option<String> {
    let body = body.trim();
    (body.starts_with("http") && !body.contains("Error")).then(|| body.to_string())
}

#[async_trait]
impl UrlShortener for HttpShortener {
    async fn shorten(
        &self,
        url: &str,
        provider: ShortUrlProvider,
    ) -> Result<String, ShortenerError> {
        let request_url = self.request_url(url, provider);
        debug!(%provider, "Requesting short URL");

        let response = self
            .client
            .get(&request_url)
            .send()
            .await
            .map_err(|e| ShortenerError::Transport {
                provider,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShortenerError::Status {
                provider,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| ShortenerError::Transport {
            provider,
            message: e.to_string(),
        })?;

        parse_short_url(&body).ok_or_else(|| ShortenerError::InvalidResponse {
            provider,
            body: body.trim().chars().take(MAX_ERROR_BODY).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_url() {
        assert_eq!(
            parse_short_url("https://is.gd/abc\n").as_deref(),
            Some("https://is.gd/abc")
        );
        assert_eq!(parse_short_url("Error: Please enter a valid URL"), None);
        assert_eq!(parse_short_url("https://is.gd/Error"), None);
        assert_eq!(parse_short_url("<html>rate limited</html>"), None);
        assert_eq!(parse_short_url(""), None);
    }

    #[test]
    fn test_request_url_encodes_target() {
        let shortener = HttpShortener::new(DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            shortener.request_url("https://example.com/a?b=1&c=2", ShortUrlProvider::Isgd),
            "https://is.gd/create.php?format=simple&url=https%3A%2F%2Fexample.com%2Fa%3Fb%3D1%26c%3D2"
        );
    }

    #[test]
    fn test_endpoint_override() {
        let shortener = HttpShortener::new(DEFAULT_TIMEOUT)
            .unwrap()
            .with_endpoint(ShortUrlProvider::Tinyurl, "http://127.0.0.1:9/create?u=");
        assert_eq!(
            shortener.request_url("https://a.com", ShortUrlProvider::Tinyurl),
            "http://127.0.0.1:9/create?u=https%3A%2F%2Fa.com"
        );
    }
}
