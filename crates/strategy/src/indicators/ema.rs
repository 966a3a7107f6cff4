/// Exponential moving average, `k = 2 / (period + 1)`.
///
/// The recursion is seeded with the first value (no SMA seed), and output is
/// `None` until `period` values have been observed.
pub fn ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let wrapped: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
    ema_sparse(&wrapped, period)
}

/// EMA over a series that may start with undefined values (e.g. the MACD
/// line before its slow leg has warmed up). The recursion starts at the first
/// defined value; `period` counts defined values only.
pub fn ema_sparse(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }
    let k = 2.0 / (period as f64 + 1.0);
    let mut state: Option<f64> = None;
    let mut seen = 0usize;

    values
        .iter()
        .map(|value| {
            let x = (*value)?;
            let next = match state {
                Some(prev) => x * k + prev * (1.0 - k),
                None => x,
            };
            state = Some(next);
            seen += 1;
            (seen >= period).then_some(next)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warm_up_rows_are_undefined() {
        let out = ema(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert!(out[2].is_some());
        assert!(out[3].is_some());
    }

    #[test]
    fn seeded_with_first_value() {
        // k = 0.5: 10 -> 0.5*20 + 0.5*10 = 15 -> 0.5*30 + 0.5*15 = 22.5
        let out = ema(&[10.0, 20.0, 30.0], 3);
        assert!((out[2].unwrap() - 22.5).abs() < 1e-12);
    }

    #[test]
    fn constant_series_stays_constant() {
        let out = ema(&[7.0; 30], 10);
        assert!(out[9..].iter().all(|v| (v.unwrap() - 7.0).abs() < 1e-12));
    }

    #[test]
    fn sparse_input_skips_leading_gaps() {
        let out = ema_sparse(&[None, None, Some(4.0), Some(8.0)], 2);
        assert_eq!(out[..3], [None, None, None]);
        // k = 2/3: 8*2/3 + 4/3 = 6.666..
        assert!((out[3].unwrap() - 20.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn too_short_series_is_all_none() {
        assert!(ema(&[1.0, 2.0], 5).iter().all(Option::is_none));
        assert!(ema(&[1.0, 2.0], 0).iter().all(Option::is_none));
    }
}
