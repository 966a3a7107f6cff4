pub mod config;
pub mod freshness;
pub mod indicators;
pub mod signal;

pub use config::{IndicatorParams, InstrumentGroup, SignalFilters, StrategyFileConfig};
pub use freshness::{bar_age_minutes, is_fresh};
pub use indicators::{augment, AugmentedBar, IndicatorSet};
pub use signal::generate_signal;
