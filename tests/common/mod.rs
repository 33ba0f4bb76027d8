#![allow(dead_code)]

use arclet_copier::api;
use arclet_copier::api::handlers::health_handler;
use arclet_copier::application::services::{
    AnalyticsTracker, CopyService, SettingsService, ShortUrlService, TemplateService,
};
use arclet_copier::domain::entities::ShortUrlProvider;
use arclet_copier::infrastructure::cache::PersistentCache;
use arclet_copier::infrastructure::clipboard::FileClipboard;
use arclet_copier::infrastructure::notifier::TracingNotifier;
use arclet_copier::infrastructure::shortener::HttpShortener;
use arclet_copier::infrastructure::storage::MemoryStore;
use arclet_copier::state::AppState;
use arclet_copier::utils::throttle::{RequestThrottle, ThrottleConfig};
use axum::Router;
use axum::routing::get;
use axum_test::TestServer;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A fully wired state over in-memory stores, a file clipboard and a mock
/// short-URL service.
pub struct TestApp {
    pub state: AppState,
    pub shortener: MockServer,
    pub sync_store: Arc<MemoryStore>,
    pub local_store: Arc<MemoryStore>,
    pub clipboard_file: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    pub fn server(&self) -> TestServer {
        TestServer::new(test_router(self.state.clone())).unwrap()
    }

    pub fn clipboard(&self) -> String {
        std::fs::read_to_string(&self.clipboard_file).unwrap_or_default()
    }

    /// Answers shortening requests for `long_url` with `short_url`.
    pub async fn mock_shorten(
        &self,
        provider: ShortUrlProvider,
        long_url: &str,
        short_url: &str,
        expected_calls: u64,
    ) {
        Mock::given(method("GET"))
            .and(path(format!("/{}", provider.as_str())))
            .and(query_param("url", long_url))
            .respond_with(ResponseTemplate::new(200).set_body_string(short_url))
            .expect(expected_calls)
            .mount(&self.shortener)
            .await;
    }

    /// Makes every shortening request for `provider` fail with `status`.
    pub async fn mock_shorten_failure(&self, provider: ShortUrlProvider, status: u16) {
        Mock::given(method("GET"))
            .and(path(format!("/{}", provider.as_str())))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.shortener)
            .await;
    }
}

pub async fn create_test_app() -> TestApp {
    let dir = TempDir::new().unwrap();
    let clipboard_file = dir.path().join("clipboard.txt");
    let shortener_server = MockServer::start().await;

    let sync_store = Arc::new(MemoryStore::new());
    let local_store = Arc::new(MemoryStore::new());

    let mut shortener = HttpShortener::new(Duration::from_secs(2)).unwrap();
    for provider in ShortUrlProvider::ALL {
        shortener = shortener.with_endpoint(
            provider,
            format!("{}/{}?url=", shortener_server.uri(), provider.as_str()),
        );
    }

    let throttle = RequestThrottle::new(ThrottleConfig {
        concurrency: 3,
        request_delay: Duration::ZERO,
        yield_delay: Duration::ZERO,
    });

    let cache = Arc::new(PersistentCache::new(local_store.clone()));
    let short_url_service = Arc::new(ShortUrlService::new(
        Arc::new(shortener),
        cache.clone(),
        throttle,
    ));
    let settings_service = Arc::new(SettingsService::new(sync_store.clone()));
    let template_service = Arc::new(TemplateService::new(sync_store.clone()));

    let copy_service = Arc::new(CopyService::new(
        settings_service.clone(),
        template_service.clone(),
        short_url_service.clone(),
        Arc::new(FileClipboard::new(clipboard_file.clone())),
        Arc::new(TracingNotifier),
        AnalyticsTracker::disabled(),
    ));

    let state = AppState {
        copy_service,
        short_url_service,
        template_service,
        settings_service,
        analytics: AnalyticsTracker::disabled(),
        store: sync_store.clone(),
        cache,
    };

    TestApp {
        state,
        shortener: shortener_server,
        sync_store,
        local_store,
        clipboard_file,
        _dir: dir,
    }
}

/// The message-bus routes without the tracing and path layers.
pub fn test_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api::routes::routes())
        .with_state(state)
}
