//! Third-party short-URL service clients.
//!
//! - [`UrlShortener`] - Trait implemented by shortening backends
//! - [`HttpShortener`] - `reqwest` client for is.gd, v.gd and TinyURL

mod http_shortener;
mod service;

pub use http_shortener::{DEFAULT_TIMEOUT, HttpShortener};
pub use service::{ShortenerError, UrlShortener};

#[cfg(test)]
pub use service::MockUrlShortener;
