//! Tickerwatch Runner: pipeline orchestration, retry, metrics, notifications.
//!
//! This crate builds on `tickerwatch-core` to provide:
//! - ROI and maximum-drawdown metrics over a price series
//! - A bounded retry policy that returns the first successful fetch
//! - Notification sinks (stdout, webhook)
//! - The request pipeline: fetch → validate → reshape → metrics → notify
//! - TOML configuration

pub mod config;
pub mod metrics;
pub mod notify;
pub mod report;
pub mod retry;
pub mod runner;

pub use config::{ConfigError, NotifyConfig, ProviderConfig, RetryConfig, TickerwatchConfig};
pub use metrics::{max_drawdown, roi, MetricError, RiskReturn};
pub use notify::{NotificationMessage, Notifier, NotifyError, StdoutNotifier, WebhookNotifier};
pub use report::{format_body, to_percent, RunReport};
pub use retry::RetryPolicy;
pub use runner::{Pipeline, RunError, RunOutcome, UNEXPECTED_RESULT};
