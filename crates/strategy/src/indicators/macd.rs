use super::ema::{ema, ema_sparse};

/// MACD (Moving Average Convergence/Divergence) indicator.
///
/// Computes: MACD line = EMA(fast) − EMA(slow), Signal = EMA(macd_line, signal_period),
/// Histogram = MACD line − Signal.
#[derive(Debug, Clone)]
pub struct MacdIndicator {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

/// MACD values for one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdPoint {
    pub macd: f64,
    pub signal: f64,
    pub hist: f64,
}

impl MacdIndicator {
    /// The conventional 12/26/9 parameterization.
    pub const STANDARD: MacdIndicator = MacdIndicator {
        fast: 12,
        slow: 26,
        signal: 9,
    };

    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast < slow, "MACD fast period must be less than slow period");
        Self { fast, slow, signal }
    }

    /// MACD for every bar of `closes` (oldest first).
    /// `None` until `slow + signal - 1` bars are available.
    pub fn series(&self, closes: &[f64]) -> Vec<Option<MacdPoint>> {
        let fast = ema(closes, self.fast);
        let slow = ema(closes, self.slow);

        let line: Vec<Option<f64>> = fast
            .iter()
            .zip(&slow)
            .map(|(f, s)| Some((*f)? - (*s)?))
            .collect();
        let signal = ema_sparse(&line, self.signal);

        line.iter()
            .zip(&signal)
            .map(|(m, s)| {
                let (macd, signal) = ((*m)?, (*s)?);
                Some(MacdPoint {
                    macd,
                    signal,
                    hist: macd - signal,
                })
            })
            .collect()
    }
}
