use arclet_copier::domain::entities::ShortUrlProvider;
use arclet_copier::infrastructure::shortener::{HttpShortener, ShortenerError, UrlShortener};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn shortener_for(server: &MockServer) -> HttpShortener {
    HttpShortener::new(Duration::from_secs(2))
        .unwrap()
        .with_endpoint(
            ShortUrlProvider::Isgd,
            format!("{}/create.php?format=simple&url=", server.uri()),
        )
}

#[tokio::test]
async fn test_shorten_sends_encoded_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/create.php"))
        .and(query_param("format", "simple"))
        .and(query_param("url", "https://example.com/a?b=1&c=2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("https://is.gd/q1\n"))
        .expect(1)
        .mount(&server)
        .await;

    let shortener = shortener_for(&server).await;
    let short = shortener
        .shorten("https://example.com/a?b=1&c=2", ShortUrlProvider::Isgd)
        .await
        .unwrap();

    assert_eq!(short, "https://is.gd/q1");
}

#[tokio::test]
async fn test_error_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("Error: Please enter a valid URL to shorten"),
        )
        .mount(&server)
        .await;

    let shortener = shortener_for(&server).await;
    let result = shortener
        .shorten("https://example.com/", ShortUrlProvider::Isgd)
        .await;

    assert!(matches!(
        result,
        Err(ShortenerError::InvalidResponse { provider: ShortUrlProvider::Isgd, .. })
    ));
}

#[tokio::test]
async fn test_non_success_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let shortener = shortener_for(&server).await;
    let result = shortener
        .shorten("https://example.com/", ShortUrlProvider::Isgd)
        .await;

    assert!(matches!(
        result,
        Err(ShortenerError::Status { status: 429, .. })
    ));
}

#[tokio::test]
async fn test_timeout_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("https://is.gd/slow")
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let shortener = HttpShortener::new(Duration::from_millis(100))
        .unwrap()
        .with_endpoint(ShortUrlProvider::Isgd, format!("{}/?url=", server.uri()));
    let result = shortener
        .shorten("https://example.com/", ShortUrlProvider::Isgd)
        .await;

    assert!(matches!(result, Err(ShortenerError::Transport { .. })));
}
