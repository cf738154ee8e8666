//! Notification messages and delivery sinks.
//!
//! The pipeline hands a finished `NotificationMessage` to a `Notifier` and
//! does not look at it again. Delivery is fire-and-forget apart from the
//! success/failure result.

use std::time::Duration;

use log::info;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid notifier configuration: {0}")]
    Config(String),
    #[error("delivery failed: {0}")]
    Delivery(String),
    #[error("notification rejected with HTTP {status}")]
    Rejected { status: u16 },
}

/// Recipient and text of one result notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationMessage {
    recipient: String,
    subject: String,
    body: String,
}

impl NotificationMessage {
    pub fn new(recipient: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Trait for notification sinks (stdout, webhook, test recorders).
pub trait Notifier: Send + Sync {
    /// Human-readable name of this sink.
    fn name(&self) -> &str;

    /// Deliver a message. Blocks until the sink accepts or rejects it.
    fn deliver(&self, message: &NotificationMessage) -> Result<(), NotifyError>;
}

/// Prints messages to stdout.
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn name(&self) -> &str {
        "stdout"
    }

    fn deliver(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        println!("To: {}", message.recipient);
        println!("Subject: {}", message.subject);
        println!();
        println!("{}", message.body);
        Ok(())
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    recipient: &'a str,
    subject: &'a str,
    content: &'a str,
}

/// POSTs messages as JSON to a webhook URL (chat integrations, mail relays).
pub struct WebhookNotifier {
    client: reqwest::blocking::Client,
    url: reqwest::Url,
}

impl WebhookNotifier {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, NotifyError> {
        let url = reqwest::Url::parse(url)
            .map_err(|e| NotifyError::Config(format!("invalid webhook URL '{url}': {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(NotifyError::Config(format!(
                "webhook URL must be http or https, got '{}'",
                url.scheme()
            )));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }
}

impl Notifier for WebhookNotifier {
    fn name(&self) -> &str {
        "webhook"
    }

    fn deliver(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        let payload = WebhookPayload {
            recipient: &message.recipient,
            subject: &message.subject,
            content: &message.body,
        };
        let resp = self
            .client
            .post(self.url.clone())
            .json(&payload)
            .send()
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
            });
        }
        info!("webhook accepted notification for {}", message.recipient);
        Ok(())
    }
}
