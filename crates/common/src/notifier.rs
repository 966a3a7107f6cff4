use async_trait::async_trait;

use crate::Result;

/// Outbound message channel.
///
/// The destination is fixed at construction. Callers treat delivery as
/// best-effort: an `Err` is logged and never aborts an evaluation pass.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> Result<()>;
}
