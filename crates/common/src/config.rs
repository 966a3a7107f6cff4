use chrono_tz::Tz;
use tracing::debug;

use crate::{Error, Result};

const DEFAULT_REPORT_TZ: Tz = chrono_tz::Asia::Bangkok;

/// Which bar source implementation to build at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BarSourceKind {
    Yahoo,
    /// Offline CSV files, one per symbol, under the given directory.
    Csv { dir: String },
}

/// Process configuration loaded from environment variables at startup.
/// Missing secrets are a fatal configuration error.
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub telegram_token: String,
    /// Numeric chat id or `@channel` username.
    pub telegram_chat: String,

    // Data
    pub bar_source: BarSourceKind,

    // Reporting
    pub report_tz: Tz,

    /// Optional TOML file with strategy parameters and instrument groups.
    pub strategy_config_path: Option<String>,
}

impl Config {
    /// Load configuration from the process environment.
    /// Loads `.env` if present.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::Config(format!("Missing {key}")))
        };
        let optional = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let telegram_token = required("TG_TOKEN")?;
        let telegram_chat = required("TG_CHAT")?;

        let bar_source = match optional("BAR_SOURCE")
            .unwrap_or_else(|| "yahoo".to_string())
            .to_lowercase()
            .as_str()
        {
            "yahoo" => BarSourceKind::Yahoo,
            "csv" => BarSourceKind::Csv {
                dir: optional("CSV_DATA_DIR").ok_or_else(|| {
                    Error::Config("CSV_DATA_DIR is required when BAR_SOURCE=csv".to_string())
                })?,
            },
            other => {
                return Err(Error::Config(format!(
                    "BAR_SOURCE must be 'yahoo' or 'csv', got: '{other}'"
                )))
            }
        };

        let report_tz = match optional("REPORT_TZ") {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|e| Error::Config(format!("REPORT_TZ '{name}': {e}")))?,
            None => DEFAULT_REPORT_TZ,
        };

        Ok(Config {
            telegram_token,
            telegram_chat,
            bar_source,
            report_tz,
            strategy_config_path: optional("STRATEGY_CONFIG_PATH"),
        })
    }
}
