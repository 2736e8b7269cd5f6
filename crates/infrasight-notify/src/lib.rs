//! Alert delivery with pluggable channel support.
//!
//! Threshold alerts produced by the analysis pipeline are fanned out by the
//! [`manager::NotificationManager`] to every configured
//! [`NotificationChannel`]. Built-in channels are email (SMTP) and webhook.

pub mod channels;
pub mod error;
pub mod manager;
pub mod plugin;
pub mod utils;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use infrasight_common::types::AlertMessage;

use crate::error::Result;

/// A delivery channel that sends alert messages to an external service
/// (e.g., SMTP relay, webhook endpoint).
///
/// Implementations are created by the corresponding [`plugin::ChannelPlugin`].
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Delivers the alert to its recipient through this channel.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails after retries (if applicable).
    async fn send(&self, alert: &AlertMessage) -> Result<()>;

    /// Returns the channel type name (e.g., `"email"`, `"webhook"`).
    fn channel_type(&self) -> &str;

    /// Returns the configured instance name.
    fn instance_name(&self) -> &str;
}
