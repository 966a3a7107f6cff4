pub mod config;
pub mod error;
pub mod frame;
pub mod notifier;
pub mod source;
pub mod types;

pub use config::{BarSourceKind, Config};
pub use error::{Error, Result};
pub use frame::{Cell, RawColumn, RawFrame};
pub use notifier::Notifier;
pub use source::{BarRequest, BarSource};
pub use types::*;
