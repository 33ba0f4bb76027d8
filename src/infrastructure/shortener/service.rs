//! Shortener trait and error types.

use async_trait::async_trait;

use crate::domain::entities::ShortUrlProvider;

/// Errors raised while calling a shortening service.
#[derive(Debug, thiserror::Error)]
pub enum ShortenerError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Request to {provider} failed: {message}")]
    Transport {
        provider: ShortUrlProvider,
        message: String,
    },

    #[error("{provider} returned HTTP {status}")]
    Status {
        provider: ShortUrlProvider,
        status: u16,
    },

    #[error("{provider} returned an unusable response: {body}")]
    InvalidResponse {
        provider: ShortUrlProvider,
        body: String,
    },
}

/// Creates short URLs through an external service.
///
/// Implementations do not cache or throttle; that is the caller's job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlShortener: Send + Sync {
    /// Shortens `url` with `provider`.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenerError`] on transport failure, non-2xx status or a
    /// body that is not a short URL.
    async fn shorten(&self, url: &str, provider: ShortUrlProvider)
    -> Result<String, ShortenerError>;
}
