use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One normalized OHLCV observation.
/// Every numeric field is finite once a bar leaves the feed adapter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Bars for a single symbol, oldest first.
///
/// `symbol` is the candidate that actually produced the data, which may be a
/// fallback rather than the first entry of the instrument group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub symbol: String,
    pub bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Keep only the most recent `max` bars.
    pub fn truncate_to_latest(&mut self, max: usize) {
        if self.bars.len() > max {
            let excess = self.bars.len() - max;
            self.bars.drain(..excess);
        }
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}

/// Classification of the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Wait,
}

impl Signal {
    /// BUY and SELL are worth a notification; WAIT never is.
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Signal::Wait)
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Wait => write!(f, "WAIT"),
        }
    }
}
