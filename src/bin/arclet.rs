//! Command-line front end for arclet-copier.
//!
//! Runs the same services as the message bus without starting a server:
//! cleaning, copying, short links, templates, the short-URL cache and
//! settings.
//!
//! # Usage
//!
//! ```bash
//! # Clean a URL
//! cargo run --bin arclet -- clean "https://example.com/?utm_source=x&id=7"
//!
//! # Copy as Markdown
//! cargo run --bin arclet -- copy "https://example.com" --title "Example" --format markdown
//!
//! # Copy many tabs with short links
//! cargo run --bin arclet -- batch https://a.com https://b.com --format csv --short
//!
//! # Create a short link without touching the cache
//! cargo run --bin arclet -- shorten "https://example.com" --no-cache
//!
//! # Manage templates
//! cargo run --bin arclet -- template add --name Cite --text "{{title}} - {{url}}"
//! cargo run --bin arclet -- template list
//!
//! # Cache maintenance
//! cargo run --bin arclet -- cache stats
//! ```
//!
//! # Environment Variables
//!
//! Same as the service; see [`arclet_copier::config`].

use arclet_copier::application::services::template_service::context_for;
use arclet_copier::application::services::{
    BatchFormat, BatchOptions, CopyRequest, ShortUrlService,
};
use arclet_copier::config::{self, Config};
use arclet_copier::domain::entities::{
    CleaningMode, CopyFormat, NewTemplate, Settings, SettingsPatch, ShortUrlProvider, TabInfo,
};
use arclet_copier::infrastructure::cache::NullCache;
use arclet_copier::server;
use arclet_copier::state::AppState;
use arclet_copier::telemetry;
use arclet_copier::utils::template_engine::{TemplateField, render, validate};
use arclet_copier::utils::throttle::{ProgressCallback, ThrottleProgress};
use arclet_copier::utils::url_cleaner::clean_url;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use std::sync::Arc;

/// Copy clean URLs, Markdown links, short links and templated text.
#[derive(Parser)]
#[command(name = "arclet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Strip tracking parameters from a URL
    Clean {
        url: String,

        /// off, smart or aggressive (default: stored setting)
        #[arg(short, long)]
        mode: Option<CleaningMode>,
    },

    /// Copy one page to the clipboard
    Copy {
        url: String,

        #[arg(short, long, default_value = "")]
        title: String,

        /// url, markdown, short-url or template (default: stored setting)
        #[arg(short, long)]
        format: Option<CopyFormat>,

        /// Template id, implies `--format template`
        #[arg(long)]
        template: Option<String>,

        #[arg(short, long)]
        mode: Option<CleaningMode>,

        /// isgd, vgd or tinyurl
        #[arg(short, long)]
        service: Option<ShortUrlProvider>,
    },

    /// Copy many pages as one block of text
    Batch {
        #[arg(required = true)]
        urls: Vec<String>,

        /// text, markdown, html, csv or json
        #[arg(short, long, default_value = "text")]
        format: BatchFormat,

        /// Drop duplicate URLs after cleaning
        #[arg(long)]
        dedupe: bool,

        /// Replace URLs with short links
        #[arg(long)]
        short: bool,

        #[arg(short, long)]
        mode: Option<CleaningMode>,

        #[arg(short, long)]
        service: Option<ShortUrlProvider>,
    },

    /// Create a short link
    Shorten {
        url: String,

        #[arg(short, long)]
        service: Option<ShortUrlProvider>,

        #[arg(short, long)]
        mode: Option<CleaningMode>,

        /// Neither read nor write the short-URL cache
        #[arg(long)]
        no_cache: bool,
    },

    /// Manage copy templates
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// Short-URL cache maintenance
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

/// Template subcommands.
#[derive(Subcommand)]
enum TemplateAction {
    /// List presets and custom templates
    List,

    /// Create a custom template
    Add {
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        icon: Option<String>,

        /// Template text, e.g. "{{title}} - {{url}}"
        #[arg(short, long)]
        text: Option<String>,
    },

    /// Delete a custom template
    Remove {
        id: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Check template text and list its fields
    Validate { text: String },

    /// Render template text (or a template id) for a URL
    Render {
        /// Template text or id
        template: String,

        #[arg(short, long)]
        url: String,

        #[arg(short, long, default_value = "")]
        title: String,

        #[arg(short, long)]
        mode: Option<CleaningMode>,
    },
}

/// Cache subcommands.
#[derive(Subcommand)]
enum CacheAction {
    /// Show entry counts and age
    Stats,

    /// Drop expired entries
    Cleanup,

    /// Drop every entry
    Clear {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Settings subcommands.
#[derive(Subcommand)]
enum SettingsAction {
    /// Print current settings
    Show,

    /// Change one setting
    ///
    /// Keys: url-cleaning, short-url-service, silent-copy-format,
    /// notifications, analytics, language
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    telemetry::init_tracing("warn", &config.log_format);

    let (state, worker) = server::build_state(&config).await?;
    let result = dispatch(cli.command, &config, &state).await;

    drop(state);
    server::drain_analytics(worker).await;
    result
}

/// Dispatches a parsed command.
async fn dispatch(command: Commands, config: &Config, state: &AppState) -> Result<()> {
    match command {
        Commands::Clean { url, mode } => handle_clean(state, url, mode).await,
        Commands::Copy {
            url,
            title,
            format,
            template,
            mode,
            service,
        } => {
            let format = if template.is_some() {
                Some(CopyFormat::Custom)
            } else {
                format
            };
            let request = CopyRequest {
                tab: TabInfo::new(url, title),
                format,
                template_id: template,
                cleaning: mode,
                provider: service,
            };
            handle_copy(state, request).await
        }
        Commands::Batch {
            urls,
            format,
            dedupe,
            short,
            mode,
            service,
        } => {
            let tabs = urls.into_iter().map(|url| TabInfo::new(url, "")).collect();
            let options = BatchOptions {
                format,
                dedupe,
                short_urls: short,
                cleaning: mode,
                provider: service,
            };
            handle_batch(state, tabs, options).await
        }
        Commands::Template { action } => handle_template_action(state, action).await,
        Commands::Cache { action } => handle_cache_action(state, action).await,
        Commands::Shorten {
            url,
            service,
            mode,
            no_cache,
        } => handle_shorten(config, state, url, service, mode, no_cache).await,
        Commands::Settings { action } => handle_settings_action(state, action).await,
    }
}

async fn handle_clean(state: &AppState, url: String, mode: Option<CleaningMode>) -> Result<()> {
    let mode = match mode {
        Some(mode) => mode,
        None => state.settings_service.load().await.url_cleaning,
    };

    let cleaned = clean_url(&url, mode);

    if cleaned == url {
        eprintln!("{}", format!("Nothing to clean ({mode})").bright_black());
    } else {
        eprintln!("{}", format!("Cleaned ({mode})").green());
    }
    println!("{cleaned}");

    Ok(())
}

async fn handle_copy(state: &AppState, request: CopyRequest) -> Result<()> {
    let outcome = state.copy_service.copy(request).await;

    if !outcome.success {
        eprintln!("{} {}", "❌".red(), outcome.message.red());
        println!("{}", outcome.text);
        bail!("Copy failed");
    }

    if outcome.fallback {
        eprintln!("{} {}", "⚠️ ".yellow(), outcome.message.yellow());
    } else {
        eprintln!(
            "{} {}",
            "✅".green(),
            format!("Copied as {}", outcome.format).green().bold()
        );
    }
    println!("{}", outcome.text);

    Ok(())
}

async fn handle_batch(state: &AppState, tabs: Vec<TabInfo>, options: BatchOptions) -> Result<()> {
    let show_progress = options.short_urls;
    let on_progress: ProgressCallback = Arc::new(|p: ThrottleProgress| {
        eprintln!(
            "  {} done, {} active, {} waiting",
            p.completed.to_string().bright_green(),
            p.active.to_string().bright_white(),
            p.pending.to_string().bright_black()
        );
    });

    let outcome = state
        .copy_service
        .copy_batch(tabs, options, show_progress.then_some(on_progress))
        .await;

    if !outcome.success {
        eprintln!("{} {}", "❌".red(), outcome.message.red());
        if !outcome.text.is_empty() {
            println!("{}", outcome.text);
        }
        bail!("Batch copy failed");
    }

    eprintln!(
        "{} {}",
        "✅".green(),
        format!("Copied {} tabs as {}", outcome.count, outcome.format)
            .green()
            .bold()
    );
    if outcome.shorten_failures > 0 {
        eprintln!(
            "{}",
            format!(
                "⚠️  {} short links failed, kept the long URL",
                outcome.shorten_failures
            )
            .yellow()
        );
    }
    println!("{}", outcome.text);

    Ok(())
}

/// Creates a short link, optionally bypassing the persistent cache.
async fn handle_shorten(
    config: &Config,
    state: &AppState,
    url: String,
    service: Option<ShortUrlProvider>,
    mode: Option<CleaningMode>,
    no_cache: bool,
) -> Result<()> {
    let settings = state.settings_service.load().await;
    let provider = service.unwrap_or(settings.short_url_service);
    let mode = mode.unwrap_or(settings.url_cleaning);

    let uncached;
    let short_urls: &ShortUrlService = if no_cache {
        uncached = server::build_short_url_service(config, Arc::new(NullCache::new()))?;
        &uncached
    } else {
        state.short_url_service.as_ref()
    };

    let short = short_urls
        .get_or_create(&url, provider, mode)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let source = if short.cached { "cached" } else { "created" };
    eprintln!(
        "{} {}",
        "🔗".bright_blue(),
        format!("{} ({}, {})", short.cleaned_url, provider, source).bright_black()
    );
    println!("{}", short.short_url);

    Ok(())
}

/// Dispatches template commands.
async fn handle_template_action(state: &AppState, action: TemplateAction) -> Result<()> {
    match action {
        TemplateAction::List => list_templates(state).await,
        TemplateAction::Add { name, icon, text } => add_template(state, name, icon, text).await,
        TemplateAction::Remove { id, yes } => remove_template(state, id, yes).await,
        TemplateAction::Validate { text } => {
            print_validation(&text);
            Ok(())
        }
        TemplateAction::Render {
            template,
            url,
            title,
            mode,
        } => render_template(state, template, url, title, mode).await,
    }
}

/// Lists templates.
///
/// # Output Format
///
/// ```text
/// 📋 Templates
///
///   ID                             Name                  Uses  Template
///   ──────────────────────────────────────────────────────────────────────
///   preset_markdown                Markdown link         -     [{{title}}]({{url}})
///   custom_1718000000000_ab12cd    Cite                  3     {{title}} - {{url}}
/// ```
async fn list_templates(state: &AppState) -> Result<()> {
    println!("{}", "📋 Templates".bright_blue().bold());
    println!();

    let templates = state
        .template_service
        .list_all()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list templates: {}", e))?;

    println!(
        "  {:<30} {:<21} {:<5} {}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Uses".bright_white().bold(),
        "Template".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for template in &templates {
        let uses = if template.is_preset {
            "-".bright_black()
        } else {
            template.usage_count.to_string().normal()
        };

        println!(
            "  {:<30} {:<21} {:<5} {}",
            template.id.bright_black(),
            format!("{} {}", template.icon, template.name).cyan(),
            uses,
            template.template_text.replace('\n', "⏎")
        );
    }

    println!();
    println!(
        "  Total: {}",
        templates.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Creates a custom template, prompting for missing fields.
async fn add_template(
    state: &AppState,
    name: Option<String>,
    icon: Option<String>,
    text: Option<String>,
) -> Result<()> {
    println!("{}", "📝 Create Template".bright_blue().bold());
    println!();

    let name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Name").interact_text()?,
    };

    let text = match text {
        Some(t) => t,
        None => Input::new()
            .with_prompt("Template")
            .with_initial_text("{{title}} - {{url}}")
            .interact_text()?,
    };

    let validation = validate(&text);
    if !validation.valid {
        for error in &validation.errors {
            println!("  {} {}", "✗".red(), error.red());
        }
        bail!("Template is invalid");
    }

    let template = state
        .template_service
        .create(NewTemplate {
            name,
            icon,
            template_text: text,
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create template: {}", e))?;

    println!("{}", "✅ Template created".green().bold());
    println!("  ID:   {}", template.id.bright_black());
    println!("  Name: {} {}", template.icon, template.name.cyan());
    println!();

    Ok(())
}

/// Deletes a custom template with confirmation prompt.
///
/// Requires confirmation (default: No) unless `--yes` is given.
async fn remove_template(state: &AppState, id: String, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Remove Template".bright_blue().bold());
    println!();

    let template = state
        .template_service
        .get(&id)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    if template.is_preset {
        println!("{}", "⚠️  Preset templates cannot be removed".yellow());
        return Ok(());
    }

    println!("  Template: {} {}", template.icon, template.name.cyan());
    println!("  Text:     {}", template.template_text.bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Remove this template?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    state
        .template_service
        .delete(&id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to remove template: {}", e))?;

    println!("{}", "✅ Template removed".green().bold());
    Ok(())
}

fn print_validation(text: &str) {
    let validation = validate(text);

    if validation.valid {
        println!("{}", "✅ Template is valid".green().bold());
    } else {
        println!("{}", "❌ Template is invalid".red().bold());
        for error in &validation.errors {
            println!("  {} {}", "✗".red(), error);
        }
    }

    if !validation.fields.is_empty() {
        println!();
        println!("{}", "Fields:".bright_white());
        for name in &validation.fields {
            let description = TemplateField::from_name(name)
                .map(|f| f.description())
                .unwrap_or_default();
            println!("  {:<12} {}", name.cyan(), description.bright_black());
        }
    }
}

/// Renders text or a stored template. Arguments that match a template id
/// are treated as ids.
async fn render_template(
    state: &AppState,
    template: String,
    url: String,
    title: String,
    mode: Option<CleaningMode>,
) -> Result<()> {
    let mode = match mode {
        Some(mode) => mode,
        None => state.settings_service.load().await.url_cleaning,
    };

    let text = match state.template_service.find(&template).await {
        Ok(Some(stored)) => stored.template_text,
        _ => template,
    };

    let validation = validate(&text);
    if !validation.valid {
        bail!("Template is invalid: {}", validation.errors.join("; "));
    }

    println!("{}", render(&text, &context_for(&url, &title, mode)));
    Ok(())
}

/// Dispatches cache commands.
async fn handle_cache_action(state: &AppState, action: CacheAction) -> Result<()> {
    let service = &state.short_url_service;

    match action {
        CacheAction::Stats => {
            let stats = service
                .cache_stats()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to read cache: {}", e))?;

            println!("{}", "📊 Short URL Cache".bright_blue().bold());
            println!();
            println!(
                "  Entries: {} / {}",
                stats.entries.to_string().bright_green().bold(),
                stats.max_entries
            );
            println!("  TTL:     {}s", stats.ttl_seconds);
            println!("  Oldest:  {}", format_timestamp(stats.oldest));
            println!("  Newest:  {}", format_timestamp(stats.newest));
            println!();
        }
        CacheAction::Cleanup => {
            let removed = service
                .cleanup_cache()
                .await
                .map_err(|e| anyhow::anyhow!("Cleanup failed: {}", e))?;
            println!(
                "{} Removed {} expired entries",
                "✅".green(),
                removed.to_string().bright_white().bold()
            );
        }
        CacheAction::Clear { yes } => {
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Clear every cached short URL?")
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            service
                .clear_cache()
                .await
                .map_err(|e| anyhow::anyhow!("Clear failed: {}", e))?;
            println!("{}", "✅ Cache cleared".green().bold());
        }
    }

    Ok(())
}

fn format_timestamp(ms: Option<i64>) -> String {
    ms.and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|t| {
            t.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| "-".to_string())
}

/// Dispatches settings commands.
async fn handle_settings_action(state: &AppState, action: SettingsAction) -> Result<()> {
    match action {
        SettingsAction::Show => {
            let settings = state.settings_service.load().await;
            print_settings(&settings);
        }
        SettingsAction::Set { key, value } => {
            let patch = parse_setting(&key, &value)?;
            let settings = state
                .settings_service
                .update(patch)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to save settings: {}", e))?;

            println!("{}", "✅ Settings saved".green().bold());
            println!();
            print_settings(&settings);
        }
    }

    Ok(())
}

fn print_settings(settings: &Settings) {
    println!("{}", "⚙️  Settings".bright_blue().bold());
    println!();
    println!("  url-cleaning        {}", settings.url_cleaning.to_string().cyan());
    println!("  short-url-service   {}", settings.short_url_service.to_string().cyan());
    println!("  silent-copy-format  {}", settings.silent_copy_format.to_string().cyan());
    println!("  notifications       {}", on_off(settings.notifications_enabled));
    println!("  analytics           {}", on_off(settings.analytics_enabled));
    println!("  language            {}", settings.language.cyan());
    println!();
}

fn on_off(enabled: bool) -> ColoredString {
    if enabled { "on".green() } else { "off".bright_black() }
}

/// Maps a `key value` pair from the command line onto a settings patch.
fn parse_setting(key: &str, value: &str) -> Result<SettingsPatch> {
    let mut patch = SettingsPatch::default();

    match key {
        "url-cleaning" => patch.url_cleaning = Some(value.parse()?),
        "short-url-service" => patch.short_url_service = Some(value.parse()?),
        "silent-copy-format" => {
            patch.silent_copy_format = Some(value.parse().map_err(|e: String| anyhow::anyhow!(e))?)
        }
        "notifications" => patch.notifications_enabled = Some(parse_bool(value)?),
        "analytics" => patch.analytics_enabled = Some(parse_bool(value)?),
        "language" => patch.language = Some(value.to_string()),
        other => bail!(
            "Unknown setting '{other}' (expected: url-cleaning, short-url-service, \
             silent-copy-format, notifications, analytics, language)"
        ),
    }

    Ok(patch)
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => bail!("Expected on or off, got '{other}'"),
    }
}
