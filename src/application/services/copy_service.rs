//! Copy orchestration: format, write to the clipboard, notify, track.
//!
//! Every copy completes with an outcome and a notification. Failures in
//! optional steps (shortening, template rendering) degrade to the cleaned
//! URL; only a failure of both clipboard writers makes a copy unsuccessful.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, warn};

use super::analytics_tracker::AnalyticsTracker;
use super::settings_service::SettingsService;
use super::short_url_service::ShortUrlService;
use super::template_service::TemplateService;
use crate::domain::entities::{CleaningMode, CopyFormat, Settings, ShortUrlProvider, TabInfo};
use crate::infrastructure::clipboard::{ClipboardError, ClipboardWriter};
use crate::infrastructure::notifier::{Notification, Notifier};
use crate::utils::template_engine::TemplateContext;
use crate::utils::throttle::ProgressCallback;
use crate::utils::url_cleaner::clean_url;

/// A single-tab copy request. Unset options come from the stored settings.
#[derive(Debug, Clone, Default)]
pub struct CopyRequest {
    pub tab: TabInfo,
    pub format: Option<CopyFormat>,
    pub template_id: Option<String>,
    pub cleaning: Option<CleaningMode>,
    pub provider: Option<ShortUrlProvider>,
}

/// What a copy produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyOutcome {
    /// Whether the text reached a clipboard.
    pub success: bool,
    pub text: String,
    pub format: CopyFormat,
    pub message: String,
    /// Whether the text is a fallback (cleaned URL) rather than the requested format.
    pub fallback: bool,
}

/// Output layout of a batch copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchFormat {
    /// One URL per line.
    #[default]
    Text,
    Markdown,
    Html,
    Csv,
    Json,
}

impl BatchFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Markdown => "markdown",
            Self::Html => "html",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for BatchFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BatchFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" | "url" => Ok(Self::Text),
            "markdown" | "md" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unknown batch format '{other}' (expected: text, markdown, html, csv, json)"
            )),
        }
    }
}

/// Options for [`CopyService::copy_batch`].
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub format: BatchFormat,
    /// Drop tabs whose cleaned URL was already seen.
    pub dedupe: bool,
    /// Replace URLs with short URLs (through the shared throttle).
    pub short_urls: bool,
    pub cleaning: Option<CleaningMode>,
    pub provider: Option<ShortUrlProvider>,
}

/// What a batch copy produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub success: bool,
    pub text: String,
    pub format: BatchFormat,
    /// Tabs in the output after de-duplication.
    pub count: usize,
    /// Tabs whose short URL could not be created and kept their cleaned URL.
    pub shorten_failures: usize,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
struct BatchItem {
    title: String,
    url: String,
}

/// Coordinates the services behind a copy action.
pub struct CopyService {
    settings: Arc<SettingsService>,
    templates: Arc<TemplateService>,
    short_urls: Arc<ShortUrlService>,
    clipboard: Arc<dyn ClipboardWriter>,
    fallback_clipboard: Option<Arc<dyn ClipboardWriter>>,
    notifier: Arc<dyn Notifier>,
    analytics: AnalyticsTracker,
}

impl CopyService {
    pub fn new(
        settings: Arc<SettingsService>,
        templates: Arc<TemplateService>,
        short_urls: Arc<ShortUrlService>,
        clipboard: Arc<dyn ClipboardWriter>,
        notifier: Arc<dyn Notifier>,
        analytics: AnalyticsTracker,
    ) -> Self {
        Self {
            settings,
            templates,
            short_urls,
            clipboard,
            fallback_clipboard: None,
            notifier,
            analytics,
        }
    }

    /// Sets the writer used when the primary clipboard fails.
    pub fn with_fallback_clipboard(mut self, fallback: Arc<dyn ClipboardWriter>) -> Self {
        self.fallback_clipboard = Some(fallback);
        self
    }

    /// Copies one tab. Never fails; see [`CopyOutcome::success`].
    pub async fn copy(&self, request: CopyRequest) -> CopyOutcome {
        let settings = self.settings.load().await;
        let mode = request.cleaning.unwrap_or(settings.url_cleaning);
        let format = request.format.unwrap_or(settings.silent_copy_format);
        let provider = request.provider.unwrap_or(settings.short_url_service);
        let cleaned = clean_url(request.tab.url.trim(), mode);

        let (text, fallback_reason) = match format {
            CopyFormat::Url => (cleaned.clone(), None),
            CopyFormat::Markdown => (format_markdown(request.tab.display_title(), &cleaned), None),
            CopyFormat::ShortUrl => {
                match self
                    .short_urls
                    .get_or_create(&request.tab.url, provider, mode)
                    .await
                {
                    Ok(short) => (short.short_url, None),
                    Err(e) => (cleaned.clone(), Some(e.message().to_string())),
                }
            }
            CopyFormat::Custom => self.render_custom(&request, mode, provider).await,
        };

        let fallback = fallback_reason.is_some();

        let outcome = match self.write_clipboard(&text).await {
            Ok(()) => {
                let message = match &fallback_reason {
                    Some(reason) => format!("Copied URL instead: {reason}"),
                    None => success_message(format).to_string(),
                };
                CopyOutcome {
                    success: true,
                    text,
                    format,
                    message,
                    fallback,
                }
            }
            Err(e) => {
                error!("Copy failed: {}", e);
                self.track(&settings, || {
                    self.analytics.track_error("copy", &e.to_string());
                });
                CopyOutcome {
                    success: false,
                    text,
                    format,
                    message: "Copy failed".to_string(),
                    fallback,
                }
            }
        };

        self.notify(&settings, &outcome).await;
        self.track(&settings, || {
            self.analytics.track_json(
                "copy",
                json!({
                    "format": format.as_str(),
                    "cleaning": mode.as_str(),
                    "fallback": fallback,
                    "success": outcome.success,
                }),
            );
        });

        outcome
    }

    async fn render_custom(
        &self,
        request: &CopyRequest,
        mode: CleaningMode,
        provider: ShortUrlProvider,
    ) -> (String, Option<String>) {
        let cleaned = clean_url(request.tab.url.trim(), mode);

        let Some(template_id) = request.template_id.as_deref() else {
            return (cleaned, Some("No template selected".to_string()));
        };

        // Only hit the shortener when the template actually uses it.
        let needs_short_url = match self.templates.find(template_id).await {
            Ok(Some(template)) => template.requires_short_url(),
            _ => false,
        };

        let short_url = if needs_short_url {
            match self
                .short_urls
                .get_or_create(&request.tab.url, provider, mode)
                .await
            {
                Ok(short) => Some(short.short_url),
                Err(e) => {
                    debug!("Template short URL unavailable: {}", e);
                    None
                }
            }
        } else {
            None
        };

        let ctx = TemplateContext {
            url: request.tab.url.trim().to_string(),
            title: request.tab.title.clone(),
            url_cleaning: mode,
            short_url,
        };

        let outcome = self
            .templates
            .process_template_with_fallback(template_id, &ctx)
            .await;

        if outcome.success {
            (outcome.content, None)
        } else {
            (
                outcome.content,
                Some(
                    outcome
                        .error
                        .unwrap_or_else(|| "Template failed".to_string()),
                ),
            )
        }
    }

    /// Formats many tabs and writes the result to the clipboard.
    ///
    /// With `short_urls`, every URL goes through the shared throttle and
    /// `on_progress` (if any) is registered for the duration of the batch.
    pub async fn copy_batch(
        &self,
        tabs: Vec<TabInfo>,
        options: BatchOptions,
        on_progress: Option<ProgressCallback>,
    ) -> BatchOutcome {
        let settings = self.settings.load().await;
        let (text, count, shorten_failures) =
            self.format_batch(&settings, tabs, &options, on_progress).await;

        if count == 0 {
            let outcome = BatchOutcome {
                success: false,
                text,
                format: options.format,
                count,
                shorten_failures,
                message: "No tabs to copy".to_string(),
            };
            self.notify_batch(&settings, &outcome).await;
            return outcome;
        }

        let outcome = match self.write_clipboard(&text).await {
            Ok(()) => BatchOutcome {
                success: true,
                text,
                format: options.format,
                count,
                shorten_failures,
                message: format!("Copied {count} links"),
            },
            Err(e) => {
                error!("Batch copy failed: {}", e);
                BatchOutcome {
                    success: false,
                    text,
                    format: options.format,
                    count,
                    shorten_failures,
                    message: "Copy failed".to_string(),
                }
            }
        };

        self.notify_batch(&settings, &outcome).await;
        self.track(&settings, || {
            self.analytics.track_json(
                "batch_copy",
                json!({
                    "format": options.format.as_str(),
                    "count": count,
                    "shortUrls": options.short_urls,
                    "success": outcome.success,
                }),
            );
        });

        outcome
    }

    /// Returns `(text, item count, shorten failures)`.
    async fn format_batch(
        &self,
        settings: &Settings,
        tabs: Vec<TabInfo>,
        options: &BatchOptions,
        on_progress: Option<ProgressCallback>,
    ) -> (String, usize, usize) {
        let mode = options.cleaning.unwrap_or(settings.url_cleaning);
        let provider = options.provider.unwrap_or(settings.short_url_service);

        let mut seen = HashSet::new();
        let mut items: Vec<BatchItem> = Vec::with_capacity(tabs.len());
        for tab in tabs {
            let url = clean_url(tab.url.trim(), mode);
            if url.is_empty() || (options.dedupe && !seen.insert(url.clone())) {
                continue;
            }
            items.push(BatchItem {
                title: tab.display_title().to_string(),
                url,
            });
        }

        let mut failures = 0;
        if options.short_urls && !items.is_empty() {
            let throttle = self.short_urls.throttle();
            if let Some(callback) = on_progress {
                throttle.set_progress_callback(move |progress| callback(progress));
            }

            let results = join_all(items.iter().map(|item| {
                self.short_urls
                    .get_or_create(&item.url, provider, CleaningMode::Off)
            }))
            .await;

            throttle.clear_progress_callback();

            for (item, result) in items.iter_mut().zip(results) {
                match result {
                    Ok(short) => item.url = short.short_url,
                    Err(e) => {
                        warn!("Keeping long URL for {}: {}", item.url, e);
                        failures += 1;
                    }
                }
            }
        }

        let count = items.len();
        (render_batch(&items, options.format), count, failures)
    }

    async fn write_clipboard(&self, text: &str) -> Result<(), ClipboardError> {
        match self.clipboard.write(text).await {
            Ok(()) => Ok(()),
            Err(primary) => {
                let Some(fallback) = &self.fallback_clipboard else {
                    return Err(primary);
                };
                warn!(
                    "{} clipboard failed ({}), using {} clipboard",
                    self.clipboard.name(),
                    primary,
                    fallback.name()
                );
                fallback.write(text).await
            }
        }
    }

    async fn notify(&self, settings: &Settings, outcome: &CopyOutcome) {
        if !settings.notifications_enabled {
            return;
        }

        let notification = if outcome.success {
            Notification::success("Copied", outcome.message.clone())
        } else {
            Notification::error("Copy failed", "Could not write to the clipboard")
        };
        self.notifier.notify(&notification).await;
    }

    async fn notify_batch(&self, settings: &Settings, outcome: &BatchOutcome) {
        if !settings.notifications_enabled {
            return;
        }

        let notification = if outcome.success {
            Notification::success("Copied", outcome.message.clone())
        } else {
            Notification::error("Copy failed", outcome.message.clone())
        };
        self.notifier.notify(&notification).await;
    }

    fn track(&self, settings: &Settings, record: impl FnOnce()) {
        if settings.analytics_enabled {
            record();
        }
    }
}

fn success_message(format: CopyFormat) -> &'static str {
    match format {
        CopyFormat::Url => "URL copied",
        CopyFormat::Markdown => "Markdown link copied",
        CopyFormat::ShortUrl => "Short URL copied",
        CopyFormat::Custom => "Template copied",
    }
}

/// `[title](url)` with brackets in the title escaped.
pub fn format_markdown(title: &str, url: &str) -> String {
    let title = title.trim();
    let title = if title.is_empty() { url } else { title };
    let escaped = title.replace('[', "\\[").replace(']', "\\]");
    format!("[{escaped}]({url})")
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn escape_csv(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn render_batch(items: &[BatchItem], format: BatchFormat) -> String {
    match format {
        BatchFormat::Text => items
            .iter()
            .map(|i| i.url.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
        BatchFormat::Markdown => items
            .iter()
            .map(|i| format!("- {}", format_markdown(&i.title, &i.url)))
            .collect::<Vec<_>>()
            .join("\n"),
        BatchFormat::Html => items
            .iter()
            .map(|i| {
                format!(
                    "<a href=\"{}\">{}</a>",
                    escape_html(&i.url),
                    escape_html(&i.title)
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        BatchFormat::Csv => std::iter::once("title,url".to_string())
            .chain(
                items
                    .iter()
                    .map(|i| format!("{},{}", escape_csv(&i.title), escape_csv(&i.url))),
            )
            .collect::<Vec<_>>()
            .join("\n"),
        BatchFormat::Json => serde_json::to_string_pretty(items).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NewTemplate;
    use crate::infrastructure::cache::PersistentCache;
    use crate::infrastructure::clipboard::MockClipboardWriter;
    use crate::infrastructure::notifier::{MockNotifier, NotificationKind};
    use crate::infrastructure::shortener::{MockUrlShortener, ShortenerError};
    use crate::infrastructure::storage::MemoryStore;
    use crate::utils::throttle::{RequestThrottle, ThrottleConfig};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Harness {
        service: CopyService,
        copied: Arc<Mutex<Vec<String>>>,
        templates: Arc<TemplateService>,
    }

    fn recording_clipboard(copied: Arc<Mutex<Vec<String>>>) -> MockClipboardWriter {
        let mut clipboard = MockClipboardWriter::new();
        clipboard.expect_write().returning(move |text| {
            copied.lock().unwrap().push(text.to_string());
            Ok(())
        });
        clipboard.expect_name().return_const("test");
        clipboard
    }

    fn quiet_notifier() -> MockNotifier {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().returning(|_| ());
        notifier
    }

    fn harness(shortener: MockUrlShortener) -> Harness {
        let store = Arc::new(MemoryStore::new());
        let copied = Arc::new(Mutex::new(Vec::new()));
        let templates = Arc::new(TemplateService::new(store.clone()));
        let short_urls = Arc::new(ShortUrlService::new(
            Arc::new(shortener),
            Arc::new(PersistentCache::new(Arc::new(MemoryStore::new()))),
            RequestThrottle::new(ThrottleConfig {
                concurrency: 3,
                request_delay: Duration::from_millis(1),
                yield_delay: Duration::from_millis(1),
            }),
        ));

        let service = CopyService::new(
            Arc::new(SettingsService::new(store)),
            templates.clone(),
            short_urls,
            Arc::new(recording_clipboard(copied.clone())),
            Arc::new(quiet_notifier()),
            AnalyticsTracker::disabled(),
        );

        Harness {
            service,
            copied,
            templates,
        }
    }

    fn no_shortener() -> MockUrlShortener {
        let mut shortener = MockUrlShortener::new();
        shortener.expect_shorten().never();
        shortener
    }

    fn request(url: &str, title: &str, format: CopyFormat) -> CopyRequest {
        CopyRequest {
            tab: TabInfo::new(url, title),
            format: Some(format),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_copy_url_smart_cleaning() {
        let h = harness(no_shortener());

        let outcome = h
            .service
            .copy(request(
                "https://example.com/page?utm_source=news&id=42",
                "Example",
                CopyFormat::Url,
            ))
            .await;

        assert!(outcome.success);
        assert!(!outcome.fallback);
        assert_eq!(outcome.text, "https://example.com/page?id=42");
        assert_eq!(
            h.copied.lock().unwrap().as_slice(),
            ["https://example.com/page?id=42"]
        );
    }

    #[tokio::test]
    async fn test_copy_markdown_escapes_title() {
        let h = harness(no_shortener());

        let outcome = h
            .service
            .copy(request(
                "https://example.com/a",
                "[Draft] Notes",
                CopyFormat::Markdown,
            ))
            .await;

        assert_eq!(outcome.text, "[\\[Draft\\] Notes](https://example.com/a)");
    }

    #[tokio::test]
    async fn test_copy_short_url() {
        let mut shortener = MockUrlShortener::new();
        shortener
            .expect_shorten()
            .times(1)
            .returning(|_, _| Ok("https://is.gd/q".to_string()));
        let h = harness(shortener);

        let outcome = h
            .service
            .copy(request("https://example.com/x", "X", CopyFormat::ShortUrl))
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.text, "https://is.gd/q");
        assert!(!outcome.fallback);
    }

    #[tokio::test]
    async fn test_short_url_failure_falls_back_to_cleaned_url() {
        let mut shortener = MockUrlShortener::new();
        shortener
            .expect_shorten()
            .returning(|_, provider| Err(ShortenerError::Status { provider, status: 503 }));
        let h = harness(shortener);

        let outcome = h
            .service
            .copy(request(
                "https://example.com/x?gclid=1",
                "X",
                CopyFormat::ShortUrl,
            ))
            .await;

        assert!(outcome.success);
        assert!(outcome.fallback);
        assert_eq!(outcome.text, "https://example.com/x");
    }

    #[tokio::test]
    async fn test_custom_template_with_short_url() {
        let mut shortener = MockUrlShortener::new();
        shortener
            .expect_shorten()
            .times(1)
            .returning(|_, _| Ok("https://is.gd/t".to_string()));
        let h = harness(shortener);

        let template = h
            .templates
            .create(NewTemplate {
                name: "Share".to_string(),
                icon: None,
                template_text: "{{title}} → {{shortUrl}}".to_string(),
            })
            .await
            .unwrap();

        let outcome = h
            .service
            .copy(CopyRequest {
                tab: TabInfo::new("https://example.com/post", "Post"),
                format: Some(CopyFormat::Custom),
                template_id: Some(template.id.clone()),
                ..Default::default()
            })
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.text, "Post → https://is.gd/t");
        assert_eq!(h.templates.get(&template.id).await.unwrap().usage_count, 1);
    }

    #[tokio::test]
    async fn test_custom_template_missing_falls_back() {
        let h = harness(no_shortener());

        let outcome = h
            .service
            .copy(CopyRequest {
                tab: TabInfo::new("https://example.com/?fbclid=z", "T"),
                format: Some(CopyFormat::Custom),
                template_id: Some("custom_0_gone00".to_string()),
                ..Default::default()
            })
            .await;

        assert!(outcome.success);
        assert!(outcome.fallback);
        assert_eq!(outcome.text, "https://example.com/");
    }

    #[tokio::test]
    async fn test_clipboard_fallback_used() {
        let h = harness(no_shortener());
        let mut broken = MockClipboardWriter::new();
        broken
            .expect_write()
            .returning(|_| Err(ClipboardError::NoBackend("xclip".to_string())));
        broken.expect_name().return_const("system");

        let service = CopyService {
            clipboard: Arc::new(broken),
            ..h.service
        }
        .with_fallback_clipboard(Arc::new(recording_clipboard(h.copied.clone())));

        let outcome = service
            .copy(request("https://example.com", "", CopyFormat::Url))
            .await;

        assert!(outcome.success);
        assert_eq!(h.copied.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_clipboard_failure_reports_and_notifies() {
        let h = harness(no_shortener());
        let mut broken = MockClipboardWriter::new();
        broken
            .expect_write()
            .returning(|_| Err(ClipboardError::NoBackend("xclip".to_string())));
        broken.expect_name().return_const("system");

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|n| n.kind == NotificationKind::Error)
            .times(1)
            .returning(|_| ());

        let service = CopyService {
            clipboard: Arc::new(broken),
            notifier: Arc::new(notifier),
            ..h.service
        };

        let outcome = service
            .copy(request("https://example.com", "", CopyFormat::Url))
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.message, "Copy failed");
    }

    #[tokio::test]
    async fn test_batch_markdown_dedupes() {
        let h = harness(no_shortener());
        let tabs = vec![
            TabInfo::new("https://a.com/?utm_source=x", "A"),
            TabInfo::new("https://a.com/", "A again"),
            TabInfo::new("https://b.com/", ""),
        ];

        let outcome = h
            .service
            .copy_batch(
                tabs,
                BatchOptions {
                    format: BatchFormat::Markdown,
                    dedupe: true,
                    ..Default::default()
                },
                None,
            )
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.count, 2);
        assert_eq!(
            outcome.text,
            "- [A](https://a.com/)\n- [https://b.com/](https://b.com/)"
        );
    }

    #[tokio::test]
    async fn test_batch_short_urls_with_progress() {
        let mut shortener = MockUrlShortener::new();
        shortener.expect_shorten().times(3).returning(|url, _| {
            if url.contains("bad") {
                Err(ShortenerError::Transport {
                    provider: ShortUrlProvider::Isgd,
                    message: "timeout".to_string(),
                })
            } else {
                Ok(format!("https://is.gd/{}", url.len()))
            }
        });
        let h = harness(shortener);
        let progress_calls = Arc::new(AtomicUsize::new(0));
        let counter = progress_calls.clone();

        let outcome = h
            .service
            .copy_batch(
                vec![
                    TabInfo::new("https://one.com/", "1"),
                    TabInfo::new("https://bad.com/", "2"),
                    TabInfo::new("https://three.com/", "3"),
                ],
                BatchOptions {
                    short_urls: true,
                    ..Default::default()
                },
                Some(Arc::new(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                })),
            )
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.shorten_failures, 1);
        let lines: Vec<&str> = outcome.text.lines().collect();
        assert_eq!(lines[1], "https://bad.com/");
        assert!(lines[0].starts_with("https://is.gd/"));
        assert_eq!(progress_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_batch_empty() {
        let h = harness(no_shortener());
        let outcome = h
            .service
            .copy_batch(Vec::new(), BatchOptions::default(), None)
            .await;

        assert!(!outcome.success);
        assert!(h.copied.lock().unwrap().is_empty());
    }

    #[test]
    fn test_render_batch_formats() {
        let items = vec![
            BatchItem {
                title: "Say \"hi\" <now>".to_string(),
                url: "https://a.com/?q=1&v=2".to_string(),
            },
            BatchItem {
                title: "B".to_string(),
                url: "https://b.com/".to_string(),
            },
        ];

        assert_eq!(
            render_batch(&items, BatchFormat::Text),
            "https://a.com/?q=1&v=2\nhttps://b.com/"
        );
        assert_eq!(
            render_batch(&items, BatchFormat::Html).lines().next().unwrap(),
            "<a href=\"https://a.com/?q=1&amp;v=2\">Say &quot;hi&quot; &lt;now&gt;</a>"
        );
        assert_eq!(
            render_batch(&items, BatchFormat::Csv),
            "title,url\n\"Say \"\"hi\"\" <now>\",\"https://a.com/?q=1&v=2\"\n\"B\",\"https://b.com/\""
        );

        let json: serde_json::Value =
            serde_json::from_str(&render_batch(&items, BatchFormat::Json)).unwrap();
        assert_eq!(json[1]["url"], "https://b.com/");
    }

    #[test]
    fn test_format_markdown_empty_title() {
        assert_eq!(
            format_markdown("  ", "https://a.com"),
            "[https://a.com](https://a.com)"
        );
    }

    #[test]
    fn test_batch_format_parse() {
        assert_eq!("md".parse::<BatchFormat>().unwrap(), BatchFormat::Markdown);
        assert!("xml".parse::<BatchFormat>().is_err());
    }
}
