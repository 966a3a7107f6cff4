use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use common::{BarRequest, BarSource, Cell, Error, RawFrame, Result};

const DOWNLOAD_BASE: &str = "https://query1.finance.yahoo.com";
const HISTORY_BASE: &str = "https://query2.finance.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// How column labels are laid out in the returned frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// Two-level labels per symbol, flattened (`Close_GC=F`), as a bulk download returns them.
    PerSymbol,
    /// Plain labels (`Close`).
    Flat,
}

/// Yahoo Finance v8 chart API client.
///
/// `download` and `history` hit different hosts and label columns differently;
/// the adapter treats `history` as the fallback when `download` comes back
/// with columns it cannot resolve.
pub struct YahooSource {
    http: Client,
    download_base: String,
    history_base: String,
}

impl YahooSource {
    pub fn new() -> Result<Self> {
        Self::with_bases(DOWNLOAD_BASE, HISTORY_BASE)
    }

    /// Point both methods at custom hosts.
    pub fn with_bases(download_base: impl Into<String>, history_base: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .use_rustls_tls()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(20))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Http(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            download_base: download_base.into(),
            history_base: history_base.into(),
        })
    }

    fn chart_url(base: &str, req: &BarRequest, extra: &str) -> String {
        format!(
            "{base}/v8/finance/chart/{}?interval={}&range={}&includePrePost=false{extra}",
            req.symbol, req.interval, req.period
        )
    }

    async fn get_chart(&self, url: &str, req: &BarRequest, layout: Layout) -> Result<RawFrame> {
        debug!(symbol = %req.symbol, url = %url, "Requesting chart");
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;

        if !status.is_success() {
            // Yahoo answers unknown symbols with 404 and a chart.error body
            if let Ok(chart) = serde_json::from_str::<ChartResponse>(&body) {
                if let Some(err) = chart.chart.error {
                    return Err(Error::EmptyData(format!("{}: {}", err.code, err.description)));
                }
            }
            return Err(Error::Http(format!("HTTP {status} for {}", req.symbol)));
        }

        parse_chart(&body, &req.symbol, layout)
    }
}

#[async_trait]
impl BarSource for YahooSource {
    async fn download(&self, req: &BarRequest) -> Result<RawFrame> {
        let url = Self::chart_url(&self.download_base, req, "");
        self.get_chart(&url, req, Layout::PerSymbol).await
    }

    async fn history(&self, req: &BarRequest) -> Result<RawFrame> {
        let url = Self::chart_url(&self.history_base, req, "&events=div%2Csplits");
        self.get_chart(&url, req, Layout::Flat).await
    }
}

/// Turn a chart API body into a raw frame.
///
/// A result without timestamps (no trading in range) is an empty frame,
/// not an error; the adapter decides what empty means.
fn parse_chart(body: &str, symbol: &str, layout: Layout) -> Result<RawFrame> {
    let resp: ChartResponse = serde_json::from_str(body)?;

    let data = match (resp.chart.result, resp.chart.error) {
        (_, Some(err)) => {
            return Err(Error::EmptyData(format!("{}: {}", err.code, err.description)));
        }
        (Some(result), None) => result.into_iter().next(),
        (None, None) => None,
    };
    let Some(data) = data else {
        return Ok(RawFrame::new());
    };
    let Some(timestamps) = data.timestamp else {
        return Ok(RawFrame::new());
    };

    let quote = data.indicators.quote.into_iter().next().unwrap_or_default();
    let adj_close = data
        .indicators
        .adjclose
        .and_then(|v| v.into_iter().next())
        .map(|a| a.adjclose);

    let mut frame = RawFrame::new();
    // bar times are the frame index, never labeled per symbol
    frame.push_column(
        "Datetime",
        timestamps.iter().map(|&ts| Cell::Number(ts as f64)).collect(),
    );

    let mut push = |name: &str, values: Vec<Option<f64>>| {
        if values.is_empty() {
            return;
        }
        let cells: Vec<Cell> = values.into_iter().map(Cell::from).collect();
        match layout {
            Layout::PerSymbol => frame.push_multi_column(&[name, symbol], cells),
            Layout::Flat => frame.push_column(name, cells),
        }
    };

    push("Open", quote.open);
    push("High", quote.high);
    push("Low", quote.low);
    push("Close", quote.close);
    if let Some(adj) = adj_close {
        push("Adj Close", adj);
    }
    push("Volume", quote.volume);

    Ok(frame)
}

// ─── Response types ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}
