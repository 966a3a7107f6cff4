/// ATR (Average True Range) indicator with Wilder smoothing.
///
/// The first value, at bar `period - 1`, is the plain mean of the first
/// `period` true ranges. The first bar's true range is `high - low`.
#[derive(Debug, Clone)]
pub struct AtrIndicator {
    pub period: usize,
}

impl AtrIndicator {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self { period }
    }

    /// ATR for every bar. The three slices must be the same length.
    pub fn series(&self, highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<Option<f64>> {
        let n = closes.len().min(highs.len()).min(lows.len());
        let mut out = vec![None; n];
        if n < self.period {
            return out;
        }

        let tr: Vec<f64> = (0..n)
            .map(|i| {
                let range = highs[i] - lows[i];
                if i == 0 {
                    return range;
                }
                let prev_close = closes[i - 1];
                range
                    .max((highs[i] - prev_close).abs())
                    .max((lows[i] - prev_close).abs())
            })
            .collect();

        let p = self.period as f64;
        let mut atr = tr[..self.period].iter().sum::<f64>() / p;
        out[self.period - 1] = Some(atr);
        for i in self.period..n {
            atr = (atr * (p - 1.0) + tr[i]) / p;
            out[i] = Some(atr);
        }
        out
    }
}
