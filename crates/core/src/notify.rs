//! Notifier trait: the abstraction over outbound alerts.

use async_trait::async_trait;

/// Sends a one-line text alert somewhere a human will see it.
///
/// Implementations must never fail to their caller: an unconfigured or
/// unreachable backend is logged and ignored, because a lost alert must not
/// interrupt the conversation that triggered it.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// A human-readable name for this notifier (e.g., "pushover").
    fn name(&self) -> &str;

    /// Deliver `text`, best effort.
    async fn notify(&self, text: &str);
}
