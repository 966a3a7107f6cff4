use common::Signal;

use crate::config::SignalFilters;
use crate::indicators::IndicatorSet;

/// Classify the latest bar from the previous and current indicator sets.
///
/// A crossover of the fast EMA over the slow one is only a BUY when RSI,
/// histogram and MACD-over-signal all agree (and symmetrically for SELL).
/// Equal fast/slow on the previous bar counts as "not yet crossed"; the
/// current bar needs a strict inequality.
pub fn generate_signal(prev: &IndicatorSet, now: &IndicatorSet, filters: &SignalFilters) -> Signal {
    let cross_up = prev.ema_fast <= prev.ema_slow && now.ema_fast > now.ema_slow;
    let cross_down = prev.ema_fast >= prev.ema_slow && now.ema_fast < now.ema_slow;

    let buy_ok = now.rsi >= filters.rsi_buy_min
        && now.macd_hist >= filters.macd_hist_min
        && now.macd > now.macd_signal;
    let sell_ok = now.rsi <= filters.rsi_sell_max
        && now.macd_hist <= -filters.macd_hist_min
        && now.macd < now.macd_signal;

    if cross_up && buy_ok {
        Signal::Buy
    } else if cross_down && sell_ok {
        Signal::Sell
    } else {
        Signal::Wait
    }
}
