//! Service initialization and runtime setup.
//!
//! Handles store selection, cache setup, analytics worker spawning, and the
//! Axum message-bus lifecycle.

use crate::application::services::analytics_tracker::{self, load_or_create_user_id};
use crate::application::services::{
    AnalyticsTracker, CopyService, SettingsService, ShortUrlService, TemplateService,
};
use crate::config::{Config, mask_connection_string};
use crate::domain::analytics_worker::run_analytics_worker;
use crate::domain::repositories::{KeyValueStore, StoreArea};
use crate::infrastructure::analytics::{UmamiClient, UmamiConfig};
use crate::infrastructure::cache::{CacheService, PersistentCache};
use crate::infrastructure::clipboard::{FileClipboard, SystemClipboard};
use crate::infrastructure::notifier::TracingNotifier;
use crate::infrastructure::shortener::HttpShortener;
use crate::infrastructure::storage::{JsonFileStore, RedisStore};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::throttle::RequestThrottle;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// How long shutdown waits for queued analytics events to drain.
const ANALYTICS_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// The two logical storage areas.
#[derive(Clone)]
pub struct Stores {
    pub sync: Arc<dyn KeyValueStore>,
    pub local: Arc<dyn KeyValueStore>,
}

/// Opens the sync and local stores.
///
/// Redis is used when configured, JSON files under `data_dir` otherwise.
///
/// # Errors
///
/// Returns an error if Redis is unreachable or the data directory cannot
/// be created.
pub async fn open_stores(config: &Config) -> Result<Stores> {
    if let Some(redis_url) = &config.redis_url {
        let sync = RedisStore::connect(redis_url, StoreArea::Sync)
            .await
            .with_context(|| {
                format!(
                    "Failed to connect to Redis at {}",
                    mask_connection_string(redis_url)
                )
            })?;
        let local = sync.for_area(StoreArea::Local);
        tracing::info!("Storage backend: Redis");

        return Ok(Stores {
            sync: Arc::new(sync),
            local: Arc::new(local),
        });
    }

    let sync = JsonFileStore::open(&config.data_dir, StoreArea::Sync)
        .await
        .with_context(|| format!("Failed to open store in {}", config.data_dir.display()))?;
    let local = JsonFileStore::open(&config.data_dir, StoreArea::Local)
        .await
        .with_context(|| format!("Failed to open store in {}", config.data_dir.display()))?;
    tracing::info!("Storage backend: {}", config.data_dir.display());

    Ok(Stores {
        sync: Arc::new(sync),
        local: Arc::new(local),
    })
}

/// Builds the short-URL service over `cache` with the configured throttle.
pub fn build_short_url_service(
    config: &Config,
    cache: Arc<dyn CacheService>,
) -> Result<ShortUrlService> {
    let shortener =
        HttpShortener::new(config.shortener_timeout()).context("Failed to build HTTP client")?;
    let throttle = RequestThrottle::new(config.throttle_config());

    Ok(ShortUrlService::new(Arc::new(shortener), cache, throttle))
}

/// Starts the analytics worker when analytics is enabled and configured.
///
/// Returns a disabled tracker otherwise. Setup failures disable analytics
/// instead of failing startup.
async fn start_analytics(
    config: &Config,
    stores: &Stores,
    settings: &SettingsService,
) -> (AnalyticsTracker, Option<JoinHandle<()>>) {
    let website_id = match (&config.analytics_enabled, &config.analytics_website_id) {
        (true, Some(id)) => id.clone(),
        _ => {
            tracing::info!("Analytics disabled");
            return (AnalyticsTracker::disabled(), None);
        }
    };

    let user_id = match load_or_create_user_id(stores.local.as_ref()).await {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Analytics disabled, no user id: {}", e);
            return (AnalyticsTracker::disabled(), None);
        }
    };

    let client = match UmamiClient::new(UmamiConfig {
        endpoint: config.analytics_endpoint.clone(),
        website_id,
        user_id,
        language: settings.load().await.language,
        timeout: Duration::from_secs(config.analytics_timeout_seconds),
    }) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("Analytics disabled: {}", e);
            return (AnalyticsTracker::disabled(), None);
        }
    };

    let (tracker, rx) = analytics_tracker::channel(config.analytics_queue_capacity);
    let handle = tokio::spawn(run_analytics_worker(rx, Arc::new(client)));

    (tracker, Some(handle))
}

/// Wires stores, cache, shortener, clipboard and analytics into [`AppState`].
///
/// Also returns the analytics worker handle, if one was started. The worker
/// exits once every clone of the state is dropped.
///
/// # Errors
///
/// Returns an error if the stores cannot be opened or the HTTP client
/// cannot be built.
pub async fn build_state(config: &Config) -> Result<(AppState, Option<JoinHandle<()>>)> {
    let stores = open_stores(config).await?;

    let cache: Arc<dyn CacheService> = Arc::new(PersistentCache::with_limits(
        stores.local.clone(),
        config.cache_ttl(),
        config.cache_max_entries,
    ));

    let short_url_service = Arc::new(build_short_url_service(config, cache.clone())?);
    let settings_service = Arc::new(SettingsService::with_default_provider(
        stores.sync.clone(),
        config.short_url_service,
    ));
    let template_service = Arc::new(TemplateService::new(stores.sync.clone()));

    let (analytics, worker) = start_analytics(config, &stores, &settings_service).await;

    let copy_service = Arc::new(
        CopyService::new(
            settings_service.clone(),
            template_service.clone(),
            short_url_service.clone(),
            Arc::new(SystemClipboard::new()),
            Arc::new(TracingNotifier),
            analytics.clone(),
        )
        .with_fallback_clipboard(Arc::new(FileClipboard::new(
            config.clipboard_fallback_file.clone(),
        ))),
    );

    let state = AppState {
        copy_service,
        short_url_service,
        template_service,
        settings_service,
        analytics,
        store: stores.sync,
        cache,
    };

    Ok((state, worker))
}

/// Waits for the analytics worker to drain its queue, bounded by a timeout.
pub async fn drain_analytics(worker: Option<JoinHandle<()>>) {
    let Some(worker) = worker else {
        return;
    };

    if tokio::time::timeout(ANALYTICS_DRAIN_TIMEOUT, worker)
        .await
        .is_err()
    {
        tracing::warn!("Analytics worker did not finish in time, dropping queued events");
    }
}

/// Runs the message bus with the given configuration.
///
/// Initializes:
/// - Sync and local stores (JSON files or Redis)
/// - Persistent short-URL cache
/// - Background analytics worker
/// - Axum HTTP server with graceful shutdown on Ctrl-C
///
/// # Errors
///
/// Returns an error if:
/// - Store setup fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let (state, worker) = build_state(&config).await?;

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down");
    drain_analytics(worker).await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
