/// RSI (Relative Strength Index) indicator.
///
/// Uses Wilder's smoothing (`alpha = 1 / period`) of gains and losses. The
/// first bar has no previous close, so its change counts as zero. Values are
/// `None` for the first `period - 1` bars and 100 when there are no losses.
#[derive(Debug, Clone)]
pub struct RsiIndicator {
    pub period: usize,
}

impl RsiIndicator {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self { period }
    }

    /// RSI for every bar of `closes` (oldest first).
    pub fn series(&self, closes: &[f64]) -> Vec<Option<f64>> {
        let alpha = 1.0 / self.period as f64;
        let mut avg_gain = 0.0;
        let mut avg_loss = 0.0;

        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let change = if i == 0 { 0.0 } else { close - closes[i - 1] };
                let gain = change.max(0.0);
                let loss = (-change).max(0.0);

                if i == 0 {
                    avg_gain = gain;
                    avg_loss = loss;
                } else {
                    avg_gain = alpha * gain + (1.0 - alpha) * avg_gain;
                    avg_loss = alpha * loss + (1.0 - alpha) * avg_loss;
                }

                if i + 1 < self.period {
                    return None;
                }
                if avg_loss == 0.0 {
                    return Some(100.0);
                }
                let rs = avg_gain / avg_loss;
                Some(100.0 - 100.0 / (1.0 + rs))
            })
            .collect()
    }
}
