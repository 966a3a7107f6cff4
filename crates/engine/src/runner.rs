use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, error, info, warn};

use common::{BarSource, Error, Notifier, Result, Signal};
use feed::{fetch_series, FetchSettings};
use strategy::{augment, generate_signal, is_fresh, AugmentedBar, InstrumentGroup, StrategyFileConfig};

use crate::report::{notification_text, report_line};

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;
type ReportSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Result of evaluating one instrument group.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupOutcome {
    Evaluated(Evaluation),
    /// Fewer than two bars survived indicator warm-up.
    Skipped { symbol: String, bars: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub symbol: String,
    pub signal: Signal,
    pub fresh: bool,
    pub report: String,
    /// True only when a notification was attempted and delivered.
    pub notified: bool,
}

/// Per-run tally, logged by the binary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub evaluated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// A group whose report line is already out, with the message still to send.
enum Stage {
    Reported { eval: Evaluation, message: Option<String> },
    Skipped { symbol: String, bars: usize },
}

/// Drives one evaluation pass over every instrument group.
///
/// Groups run strictly one after another. A failing group is logged and
/// counted; it never stops the groups after it.
pub struct Runner {
    source: Arc<dyn BarSource>,
    notifier: Arc<dyn Notifier>,
    strategy: StrategyFileConfig,
    report_tz: Tz,
    clock: Clock,
    report_sink: ReportSink,
}

impl Runner {
    pub fn new(
        source: Arc<dyn BarSource>,
        notifier: Arc<dyn Notifier>,
        strategy: StrategyFileConfig,
        report_tz: Tz,
    ) -> Self {
        Self {
            source,
            notifier,
            strategy,
            report_tz,
            clock: Arc::new(Utc::now),
            report_sink: Arc::new(|line: &str| println!("{line}")),
        }
    }

    /// Replace the wall clock used by the freshness gate.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    /// Send report lines somewhere other than stdout.
    pub fn with_report_sink<F>(mut self, sink: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.report_sink = Arc::new(sink);
        self
    }

    pub async fn run_all(&self) -> RunSummary {
        let mut summary = RunSummary::default();
        let deadline = Duration::from_secs(self.strategy.group_timeout_secs);

        for group in &self.strategy.instruments {
            // The deadline covers fetch and evaluation only. Delivery is bounded
            // by the notifier's own client timeout.
            let stage = match tokio::time::timeout(deadline, self.prepare(group)).await {
                Ok(result) => result,
                Err(_) => Err(Error::Timeout(self.strategy.group_timeout_secs)),
            };
            let outcome = match stage {
                Ok(stage) => Ok(self.finish(stage).await),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(GroupOutcome::Evaluated(eval)) => {
                    debug!(symbol = %eval.symbol, signal = %eval.signal, fresh = eval.fresh, "Group evaluated");
                    summary.evaluated += 1;
                }
                Ok(GroupOutcome::Skipped { symbol, bars }) => {
                    debug!(symbol = %symbol, bars, "Not enough bars after warm-up, skipping");
                    summary.skipped += 1;
                }
                Err(e) => {
                    error!(group = ?group.candidates, error = %e, "[run] group failed");
                    summary.failed += 1;
                }
            }
        }

        info!(
            evaluated = summary.evaluated,
            skipped = summary.skipped,
            failed = summary.failed,
            "Run complete"
        );
        summary
    }

    /// Fetch, compute and classify one group, emitting its report line and
    /// then notifying when the signal is actionable and the bar is fresh.
    pub async fn run_group(&self, group: &InstrumentGroup) -> Result<GroupOutcome> {
        let stage = self.prepare(group).await?;
        Ok(self.finish(stage).await)
    }

    async fn prepare(&self, group: &InstrumentGroup) -> Result<Stage> {
        let settings = FetchSettings {
            interval: self.strategy.timeframe.clone(),
            period: self.strategy.period.clone(),
            max_bars: self.strategy.bars,
        };
        let series = fetch_series(self.source.as_ref(), &group.candidates, &settings).await?;
        let rows = augment(&series, &self.strategy.indicators);

        let [.., prev, last] = rows.as_slice() else {
            return Ok(Stage::Skipped {
                symbol: series.symbol,
                bars: rows.len(),
            });
        };

        Ok(self.conclude(&series.symbol, prev, last))
    }

    /// Classify the last bar and emit the report line.
    fn conclude(&self, symbol: &str, prev: &AugmentedBar, last: &AugmentedBar) -> Stage {
        let cfg = &self.strategy;
        let signal = generate_signal(&prev.ind, &last.ind, &cfg.filters);
        let fresh = is_fresh(last.bar.time, (self.clock)(), cfg.fresh_window_min);
        let report = report_line(symbol, &cfg.timeframe, last, signal, fresh, self.report_tz);
        (self.report_sink)(&report);

        let message = (fresh && signal.is_actionable()).then(|| {
            notification_text(
                symbol,
                &cfg.timeframe,
                last,
                signal,
                &cfg.indicators,
                self.report_tz,
            )
        });

        Stage::Reported {
            eval: Evaluation {
                symbol: symbol.to_string(),
                signal,
                fresh,
                report,
                notified: false,
            },
            message,
        }
    }

    /// Deliver any pending message. Delivery failures never fail the group.
    async fn finish(&self, stage: Stage) -> GroupOutcome {
        match stage {
            Stage::Reported { mut eval, message } => {
                if let Some(text) = message {
                    match self.notifier.notify(&text).await {
                        Ok(()) => eval.notified = true,
                        Err(e) => warn!(symbol = %eval.symbol, error = %e, "Notification failed"),
                    }
                }
                GroupOutcome::Evaluated(eval)
            }
            Stage::Skipped { symbol, bars } => GroupOutcome::Skipped { symbol, bars },
        }
    }
}
