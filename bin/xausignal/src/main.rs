use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use common::{BarSource, BarSourceKind, Config, Notifier};
use engine::Runner;
use feed::{CsvSource, YahooSource};
use strategy::StrategyFileConfig;
use telegram_notify::TelegramNotifier;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // ── Logging ──────────────────────────────────────────────────────────────
    // .env first so a RUST_LOG set there reaches the filter.
    let dotenv = load_env(None);
    // Diagnostics go to stderr; stdout carries only the report lines.
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .init();
    if let Some(path) = &dotenv {
        info!(path = %path.display(), "Loaded .env");
    }

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "Configuration error");
            return ExitCode::FAILURE;
        }
    };

    let strategy_file = match cfg.strategy_config_path.as_deref() {
        Some(path) => match StrategyFileConfig::load(path) {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "Strategy configuration error");
                return ExitCode::FAILURE;
            }
        },
        None => StrategyFileConfig::default(),
    };
    info!(
        timeframe = %strategy_file.timeframe,
        groups = strategy_file.instruments.len(),
        tz = %cfg.report_tz,
        "XauSignal starting"
    );

    // ── Bar source ────────────────────────────────────────────────────────────
    let source: Arc<dyn BarSource> = match &cfg.bar_source {
        BarSourceKind::Yahoo => match YahooSource::new() {
            Ok(s) => Arc::new(s),
            Err(e) => {
                error!(error = %e, "Failed to build Yahoo client");
                return ExitCode::FAILURE;
            }
        },
        BarSourceKind::Csv { dir } => {
            info!(dir = %dir, "Reading bars from CSV files");
            Arc::new(CsvSource::new(dir))
        }
    };

    // ── Telegram ──────────────────────────────────────────────────────────────
    let notifier: Arc<dyn Notifier> =
        match TelegramNotifier::new(&cfg.telegram_token, &cfg.telegram_chat) {
            Ok(n) => Arc::new(n),
            Err(e) => {
                error!(error = %e, "Failed to build Telegram notifier");
                return ExitCode::FAILURE;
            }
        };

    // ── Run ───────────────────────────────────────────────────────────────────
    let runner = Runner::new(source, notifier, strategy_file, cfg.report_tz);
    let summary = runner.run_all().await;
    info!(
        evaluated = summary.evaluated,
        skipped = summary.skipped,
        failed = summary.failed,
        "XauSignal finished"
    );
    ExitCode::SUCCESS
}

/// Load `file`, or the nearest `.env` when `None`. Existing variables win.
fn load_env(file: Option<&Path>) -> Option<PathBuf> {
    match file {
        Some(path) => dotenvy::from_path(path).ok().map(|()| path.to_path_buf()),
        None => dotenvy::dotenv().ok(),
    }
}

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
