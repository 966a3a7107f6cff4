pub mod report;
pub mod runner;

pub use report::{local_time, notification_text, report_line};
pub use runner::{Evaluation, GroupOutcome, RunSummary, Runner};
