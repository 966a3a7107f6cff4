use tracing::{debug, warn};

use common::{BarRequest, BarSeries, BarSource, Error, Result};

use crate::normalize::normalize;

/// What to request from the source and how many bars to keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub interval: String,
    pub period: String,
    pub max_bars: usize,
}

/// Fetch a normalized series for the first candidate that yields usable data.
///
/// Candidates are tried strictly in order and data is never merged across
/// them. Each failure is logged and the next candidate tried; if all fail,
/// the last failure is carried in `AllCandidatesFailed`.
pub async fn fetch_series(
    source: &dyn BarSource,
    candidates: &[String],
    settings: &FetchSettings,
) -> Result<BarSeries> {
    let mut last_err: Option<Error> = None;

    for symbol in candidates {
        match fetch_candidate(source, symbol, settings).await {
            Ok(series) => {
                debug!(symbol = %series.symbol, bars = series.len(), "Fetched bars");
                return Ok(series);
            }
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "[fetch] candidate failed");
                last_err = Some(e);
            }
        }
    }

    Err(Error::AllCandidatesFailed {
        candidates: candidates.to_vec(),
        last: last_err
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no candidates".to_string()),
    })
}

async fn fetch_candidate(
    source: &dyn BarSource,
    symbol: &str,
    settings: &FetchSettings,
) -> Result<BarSeries> {
    let req = BarRequest::new(symbol, &settings.interval, &settings.period);

    let frame = source.download(&req).await?;
    if frame.is_empty() {
        return Err(Error::EmptyData("download".to_string()));
    }

    let mut series = match normalize(symbol, &frame) {
        Err(Error::MissingColumn(column)) => {
            debug!(symbol, column = %column, "OHLC unresolved, trying history");
            let frame = source.history(&req).await?;
            if frame.is_empty() {
                return Err(Error::EmptyData("history".to_string()));
            }
            normalize(symbol, &frame)?
        }
        other => other?,
    };

    series.truncate_to_latest(settings.max_bars);
    Ok(series)
}
