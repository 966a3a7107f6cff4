use serde::{Deserialize, Serialize};

use common::{Error, Result};
use tracing::info;

/// Strategy parameters file (TOML). Every key is optional.
///
/// Example `config/strategy.toml`:
/// ```toml
/// timeframe = "5m"
/// period = "30d"
/// bars = 220
/// fresh_window_min = 4.0
///
/// [indicators]
/// fast_ema = 20
/// slow_ema = 50
///
/// [filters]
/// rsi_buy_min = 55.0
/// rsi_sell_max = 45.0
/// macd_hist_min = 0.02
///
/// [[instrument]]
/// candidates = ["GC=F", "XAUUSD=X"]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StrategyFileConfig {
    /// Bar timeframe requested from the source.
    pub timeframe: String,
    /// Lookback period requested from the source.
    pub period: String,
    /// Cap on the number of most recent bars kept after normalization.
    pub bars: usize,
    /// Maximum age in minutes of the latest bar for a notification to go out.
    pub fresh_window_min: f64,
    /// Deadline for one instrument group (fetch, compute, notify).
    pub group_timeout_secs: u64,
    pub indicators: IndicatorParams,
    pub filters: SignalFilters,
    /// Evaluated one after another, in file order.
    #[serde(rename = "instrument")]
    pub instruments: Vec<InstrumentGroup>,
}

/// Symbols for the same underlying, tried in order until one yields data.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InstrumentGroup {
    pub candidates: Vec<String>,
}

impl InstrumentGroup {
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub fast_ema: usize,
    pub slow_ema: usize,
    pub rsi_len: usize,
    pub atr_len: usize,
}

/// Thresholds a crossover must clear before it becomes BUY or SELL.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SignalFilters {
    pub rsi_buy_min: f64,
    pub rsi_sell_max: f64,
    /// BUY needs histogram >= this, SELL needs histogram <= -this.
    pub macd_hist_min: f64,
}

impl Default for StrategyFileConfig {
    fn default() -> Self {
        Self {
            timeframe: "5m".to_string(),
            period: "30d".to_string(),
            bars: 220,
            fresh_window_min: 4.0,
            group_timeout_secs: 60,
            indicators: IndicatorParams::default(),
            filters: SignalFilters::default(),
            instruments: vec![InstrumentGroup::new(["GC=F", "XAUUSD=X"])],
        }
    }
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            fast_ema: 20,
            slow_ema: 50,
            rsi_len: 14,
            atr_len: 14,
        }
    }
}

impl Default for SignalFilters {
    fn default() -> Self {
        Self {
            rsi_buy_min: 55.0,
            rsi_sell_max: 45.0,
            macd_hist_min: 0.02,
        }
    }
}

impl StrategyFileConfig {
    /// Load and validate a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read strategy config at '{path}': {e}"))
        })?;
        let cfg = Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("Strategy config at '{path}': {e}")))?;
        info!(path = %path, groups = cfg.instruments.len(), "Strategy config loaded");
        Ok(cfg)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(Error::Config(msg));

        if self.instruments.is_empty() {
            return fail("at least one [[instrument]] group is required".into());
        }
        if let Some(pos) = self.instruments.iter().position(|g| g.candidates.is_empty()) {
            return fail(format!("instrument group #{} has no candidates", pos + 1));
        }
        if self.group_timeout_secs == 0 {
            return fail("group_timeout_secs must be non-zero".into());
        }
        if self.bars < 2 {
            return fail(format!("bars must be >= 2, got {}", self.bars));
        }
        let ind = &self.indicators;
        if ind.fast_ema == 0 || ind.slow_ema == 0 || ind.rsi_len == 0 || ind.atr_len == 0 {
            return fail("indicator windows must be non-zero".into());
        }
        if ind.fast_ema >= ind.slow_ema {
            return fail(format!(
                "fast_ema ({}) must be less than slow_ema ({})",
                ind.fast_ema, ind.slow_ema
            ));
        }
        if self.fresh_window_min.is_nan() || self.fresh_window_min < 0.0 {
            return fail(format!(
                "fresh_window_min must be >= 0, got {}",
                self.fresh_window_min
            ));
        }
        let f = &self.filters;
        if f.macd_hist_min.is_nan() || f.macd_hist_min < 0.0 {
            return fail(format!("macd_hist_min must be >= 0, got {}", f.macd_hist_min));
        }
        if f.rsi_sell_max > f.rsi_buy_min {
            return fail(format!(
                "rsi_sell_max ({}) must not exceed rsi_buy_min ({})",
                f.rsi_sell_max, f.rsi_buy_min
            ));
        }
        Ok(())
    }
}
