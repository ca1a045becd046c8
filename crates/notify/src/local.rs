//! Local, log-only notifier.

use async_trait::async_trait;
use personachat_core::notify::Notifier;
use tracing::info;

/// Writes alerts to the local log and nowhere else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn notify(&self, text: &str) {
        info!(notification = %text, "Notification recorded locally");
    }
}
