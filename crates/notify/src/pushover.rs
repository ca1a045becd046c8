//! Pushover notification gateway.
//!
//! Sends each alert as a single `POST https://api.pushover.net/1/messages.json`
//! carrying the app token, the user key and the message text. Without real
//! credentials the notifier degrades to local logging so the assistant works
//! without the integration.

use std::time::Duration;

use async_trait::async_trait;
use personachat_core::notify::Notifier;
use serde::Serialize;
use tracing::{info, warn};

/// The public Pushover messages endpoint.
pub const PUSHOVER_ENDPOINT: &str = "https://api.pushover.net/1/messages.json";

/// Values that ship in sample `.env` files and never are real credentials.
const PLACEHOLDERS: &[&str] = &[
    "changeme",
    "change-me",
    "placeholder",
    "xxx",
    "todo",
    "none",
    "hauvo",
];

/// Pushover-backed [`Notifier`].
pub struct PushoverNotifier {
    credentials: Option<Credentials>,
    endpoint: String,
    client: reqwest::Client,
}

struct Credentials {
    token: String,
    user: String,
}

#[derive(Serialize)]
struct PushoverMessage<'a> {
    token: &'a str,
    user: &'a str,
    message: &'a str,
}

impl PushoverNotifier {
    /// Create a notifier from an app token and user key.
    ///
    /// Missing or placeholder values leave the notifier unconfigured.
    pub fn new(token: &str, user: &str, timeout: Duration) -> Self {
        let credentials = if is_placeholder(token) || is_placeholder(user) {
            None
        } else {
            Some(Credentials {
                token: token.trim().to_string(),
                user: user.trim().to_string(),
            })
        };

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Pushover client build failed, no timeout");
                reqwest::Client::new()
            });

        Self {
            credentials,
            endpoint: PUSHOVER_ENDPOINT.to_string(),
            client,
        }
    }

    /// Send to a different endpoint (self-hosted relays, tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Whether real credentials are present.
    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }
}

/// Whether a credential value is missing or an obvious stand-in.
pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return true;
    }
    let lower = value.to_ascii_lowercase();
    PLACEHOLDERS.contains(&lower.as_str())
        || lower.starts_with("your")
        || (lower.starts_with('<') && lower.ends_with('>'))
}

#[async_trait]
impl Notifier for PushoverNotifier {
    fn name(&self) -> &str {
        "pushover"
    }

    async fn notify(&self, text: &str) {
        let Some(credentials) = &self.credentials else {
            info!(notification = %text, "Pushover not configured, would send");
            return;
        };

        let payload = PushoverMessage {
            token: &credentials.token,
            user: &credentials.user,
            message: text,
        };

        match self.client.post(&self.endpoint).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                info!("Pushover notification sent");
            }
            Ok(response) => {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                warn!(status, body = %body, "Pushover rejected notification");
            }
            Err(e) => {
                warn!(error = %e, "Failed to send Pushover notification");
            }
        }
    }
}
