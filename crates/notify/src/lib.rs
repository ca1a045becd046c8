//! Notification gateways for PersonaChat.
//!
//! All notifiers implement the `personachat_core::Notifier` trait and never
//! fail to their caller.
//!
//! - **Pushover**: one JSON POST per alert, skipped when unconfigured
//! - **Log**: writes the alert to the local log only

pub mod local;
pub mod pushover;

use std::sync::Arc;

use personachat_config::NotificationConfig;
use personachat_core::notify::Notifier;
use tracing::info;

pub use local::LogNotifier;
pub use pushover::PushoverNotifier;

/// Build the notifier described by the configuration.
pub fn build_from_config(config: &NotificationConfig) -> Arc<dyn Notifier> {
    let notifier = PushoverNotifier::new(
        config.pushover_token.as_deref().unwrap_or_default(),
        config.pushover_user.as_deref().unwrap_or_default(),
        std::time::Duration::from_secs(config.timeout_secs),
    );

    if notifier.is_configured() {
        info!("Pushover notifications enabled");
    } else {
        info!("Pushover not configured; notifications will only be logged");
    }

    Arc::new(notifier)
}
