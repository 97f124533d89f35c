//! Live notifications.

mod webhook;

pub use webhook::{WebhookChannel, WebhookConfig};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use platforms_probe::Platform;

use crate::Result;

/// Payload emitted once per offline-to-live transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveEvent {
    pub display_name: String,
    pub platform: Platform,
    pub live_url: String,
    pub timestamp: DateTime<Utc>,
}

impl LiveEvent {
    pub fn new(display_name: impl Into<String>, platform: Platform, live_url: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            platform,
            live_url: live_url.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Trait for notification channels.
///
/// Delivery is best-effort: the scheduler logs a failed send and moves on,
/// it never retries across cycles.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Get the channel type name.
    fn channel_type(&self) -> &'static str;

    /// Check if the channel is enabled.
    fn is_enabled(&self) -> bool;

    /// Send a notification through this channel.
    async fn send(&self, event: &LiveEvent) -> Result<()>;

    /// Test the channel configuration.
    async fn test(&self) -> Result<()>;
}
