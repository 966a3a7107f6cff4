use async_trait::async_trait;

use crate::{RawFrame, Result};

/// What to ask a bar source for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarRequest {
    pub symbol: String,
    /// Bar timeframe, e.g. "5m".
    pub interval: String,
    /// Lookback period, e.g. "30d".
    pub period: String,
}

impl BarRequest {
    pub fn new(symbol: impl Into<String>, interval: impl Into<String>, period: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            interval: interval.into(),
            period: period.into(),
        }
    }
}

/// Abstraction over an OHLCV provider.
///
/// `YahooSource` implements this against the chart API, `CsvSource` against
/// local files. Both return raw frames; schema normalization and symbol
/// fallback live in the `feed` crate, not in implementations.
#[async_trait]
pub trait BarSource: Send + Sync {
    /// Primary fetch method.
    async fn download(&self, req: &BarRequest) -> Result<RawFrame>;

    /// Secondary fetch method, tried when the primary result lacks OHLC columns.
    async fn history(&self, req: &BarRequest) -> Result<RawFrame>;
}
