mod action;
mod app;
mod app_state;
mod audio;
mod component;
mod components;
mod theme;
mod widgets;

use std::time::Duration;

use tokio::sync::mpsc;

use tour_core::catalog::Catalog;
use tour_core::config::Config;
use tour_core::lang::Lang;
use tour_core::platform;
use tour_core::prefs::Preferences;
use tour_core::session::Session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = data_dir.join("audiotour.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but suppress the
    // per-packet DEBUG chatter from the symphonia decoders.
    let log_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "debug,symphonia=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("audiotour log: {}", log_path.display());

    tracing::info!("audiotour starting…");

    // ── Load config, preferences, catalog ───────────────────────────────────
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("config load failed, using defaults: {e:#}");
        Config::default()
    });
    let prefs = Preferences::load(&config.paths.prefs_file);
    let catalog = Catalog::load_or_builtin(&config.paths.stations_file)?;
    if catalog.is_empty() {
        anyhow::bail!("station catalog is empty");
    }

    // Config override wins over locale detection.
    let lang = config
        .ui
        .language
        .as_deref()
        .and_then(Lang::from_code)
        .unwrap_or_else(Lang::detect);
    tracing::info!("{} stations, language {}", catalog.len(), lang.code());

    let session = Session::new(
        catalog,
        prefs,
        lang,
        config.playback.speeds.clone(),
        Duration::from_secs(config.playback.seek_step_secs),
    );

    // ── Audio engine (own thread; events flow back over this channel) ───────
    let (playback_tx, playback_rx) = mpsc::channel(256);
    let engine = audio::AudioEngine::spawn(playback_tx)?;

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let app = app::App::new(session, engine, &config);
    app.run(playback_rx).await?;

    Ok(())
}
