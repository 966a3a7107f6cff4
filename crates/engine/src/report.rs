//! Console report line and notification text.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use common::Signal;
use strategy::{AugmentedBar, IndicatorParams};

/// `2024-05-01 09:30 +07`
pub fn local_time(time: DateTime<Utc>, tz: Tz) -> String {
    time.with_timezone(&tz).format("%Y-%m-%d %H:%M %Z").to_string()
}

/// One line per evaluated group:
/// `<local time> | <symbol>/<tf> close <price> [(stale) ]→ <SIGNAL>`.
pub fn report_line(
    symbol: &str,
    timeframe: &str,
    last: &AugmentedBar,
    signal: Signal,
    fresh: bool,
    tz: Tz,
) -> String {
    let stale = if fresh { "" } else { "(stale) " };
    format!(
        "{} | {symbol}/{timeframe} close {:.2} {stale}→ {signal}",
        local_time(last.bar.time, tz),
        last.bar.close,
    )
}

/// Multi-line message sent for a fresh BUY/SELL.
pub fn notification_text(
    symbol: &str,
    timeframe: &str,
    last: &AugmentedBar,
    signal: Signal,
    params: &IndicatorParams,
    tz: Tz,
) -> String {
    let ind = &last.ind;
    format!(
        "[{symbol} {timeframe}] {signal}\n\
         Time {}\n\
         Close {:.2}\n\
         EMA{}/{} {:.2}/{:.2}\n\
         RSI {:.1} | MACD {:.4}/{:.4} | HIST {:.4}\n\
         ATR {:.2}",
        local_time(last.bar.time, tz),
        last.bar.close,
        params.fast_ema,
        params.slow_ema,
        ind.ema_fast,
        ind.ema_slow,
        ind.rsi,
        ind.macd,
        ind.macd_signal,
        ind.macd_hist,
        ind.atr,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use common::Bar;
    use strategy::IndicatorSet;

    fn row() -> AugmentedBar {
        AugmentedBar {
            bar: Bar {
                time: Utc.with_ymd_and_hms(2024, 5, 1, 2, 30, 0).unwrap(),
                open: 2330.0,
                high: 2336.0,
                low: 2329.5,
                close: 2335.456,
                volume: 10.0,
            },
            ind: IndicatorSet {
                ema_fast: 2331.123,
                ema_slow: 2330.987,
                rsi: 61.26,
                macd: 0.51234,
                macd_signal: 0.20111,
                macd_hist: 0.31123,
                atr: 1.876,
            },
        }
    }

    #[test]
    fn report_line_for_fresh_bar() {
        let line = report_line("GC=F", "5m", &row(), Signal::Buy, true, chrono_tz::Asia::Bangkok);
        assert_eq!(line, "2024-05-01 09:30 +07 | GC=F/5m close 2335.46 → BUY");
    }

    #[test]
    fn report_line_marks_stale_bar() {
        let line = report_line("XAUUSD=X", "5m", &row(), Signal::Wait, false, chrono_tz::UTC);
        assert_eq!(line, "2024-05-01 02:30 UTC | XAUUSD=X/5m close 2335.46 (stale) → WAIT");
    }

    #[test]
    fn notification_has_fixed_precision() {
        let text = notification_text(
            "GC=F",
            "5m",
            &row(),
            Signal::Buy,
            &IndicatorParams::default(),
            chrono_tz::Asia::Bangkok,
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "[GC=F 5m] BUY",
                "Time 2024-05-01 09:30 +07",
                "Close 2335.46",
                "EMA20/50 2331.12/2330.99",
                "RSI 61.3 | MACD 0.5123/0.2011 | HIST 0.3112",
                "ATR 1.88",
            ]
        );
    }
}
