pub mod atr;
pub mod ema;
pub mod macd;
pub mod rsi;

pub use atr::AtrIndicator;
pub use ema::ema;
pub use macd::{MacdIndicator, MacdPoint};
pub use rsi::RsiIndicator;

use common::{Bar, BarSeries};

use crate::config::IndicatorParams;

/// Every derived value for one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSet {
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
    pub atr: f64,
}

/// A bar together with its complete indicator set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AugmentedBar {
    pub bar: Bar,
    pub ind: IndicatorSet,
}

/// Compute all indicators over `series` and keep only the bars where every
/// indicator is defined. Order is preserved.
///
/// MACD always uses 12/26/9, whatever the configured trend windows are.
pub fn augment(series: &BarSeries, params: &IndicatorParams) -> Vec<AugmentedBar> {
    let closes = series.closes();
    let highs: Vec<f64> = series.bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = series.bars.iter().map(|b| b.low).collect();

    let ema_fast = ema(&closes, params.fast_ema);
    let ema_slow = ema(&closes, params.slow_ema);
    let rsi = RsiIndicator::new(params.rsi_len).series(&closes);
    let macd = MacdIndicator::STANDARD.series(&closes);
    let atr = AtrIndicator::new(params.atr_len).series(&highs, &lows, &closes);

    series
        .bars
        .iter()
        .enumerate()
        .filter_map(|(i, bar)| {
            let m = macd[i]?;
            Some(AugmentedBar {
                bar: *bar,
                ind: IndicatorSet {
                    ema_fast: ema_fast[i]?,
                    ema_slow: ema_slow[i]?,
                    rsi: rsi[i]?,
                    macd: m.macd,
                    macd_signal: m.signal,
                    macd_hist: m.hist,
                    atr: atr[i]?,
                },
            })
        })
        .collect()
}
