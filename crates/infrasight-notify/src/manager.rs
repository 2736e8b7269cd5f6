use crate::error::Result;
use crate::plugin::ChannelRegistry;
use crate::NotificationChannel;
use infrasight_common::types::AlertMessage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// A configured channel instance: which plugin to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSpec {
    pub name: String,
    pub channel_type: String,
    #[serde(default = "default_channel_config")]
    pub config: Value,
}

fn default_channel_config() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Fans alerts out to every configured channel.
pub struct NotificationManager {
    channels: Vec<Box<dyn NotificationChannel>>,
    enabled: bool,
}

impl NotificationManager {
    pub fn new(channels: Vec<Box<dyn NotificationChannel>>, enabled: bool) -> Self {
        Self { channels, enabled }
    }

    /// A manager that drops every alert.
    pub fn disabled() -> Self {
        Self::new(Vec::new(), false)
    }

    /// Instantiates every spec through `registry`.
    ///
    /// # Errors
    ///
    /// Fails on the first spec naming an unknown plugin or carrying an
    /// invalid config.
    pub fn from_specs(registry: &ChannelRegistry, specs: &[ChannelSpec], enabled: bool) -> Result<Self> {
        let mut channels = Vec::with_capacity(specs.len());
        for spec in specs {
            let channel = registry.create_channel(&spec.channel_type, &spec.name, &spec.config)?;
            let redacted = registry
                .get_plugin(&spec.channel_type)
                .map(|p| p.redact_config(&spec.config))
                .unwrap_or_default();
            tracing::info!(
                name = %spec.name,
                channel_type = %spec.channel_type,
                config = %redacted,
                "Notification channel configured"
            );
            channels.push(channel);
        }
        Ok(Self::new(channels, enabled))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn channels(&self) -> &[Box<dyn NotificationChannel>] {
        &self.channels
    }

    /// Sends `alert` through every channel. Failures are logged and never
    /// propagated; one failing channel does not stop the others.
    pub async fn notify(&self, alert: &AlertMessage) {
        if !self.enabled {
            tracing::debug!(
                channel = %alert.channel,
                recipient = %alert.recipient,
                "Notifications disabled, alert dropped"
            );
            return;
        }

        if self.channels.is_empty() {
            tracing::warn!(
                channel = %alert.channel,
                recipient = %alert.recipient,
                "No notification channel configured, alert dropped"
            );
            return;
        }

        for channel in &self.channels {
            if let Err(e) = channel.send(alert).await {
                tracing::error!(
                    channel_type = channel.channel_type(),
                    name = channel.instance_name(),
                    recipient = %alert.recipient,
                    subject = %alert.subject,
                    error = %e,
                    "Failed to send notification"
                );
            }
        }
    }

    /// Spawns one detached task per alert. Callers that do not care about
    /// completion may drop the returned handles.
    pub fn dispatch(self: &Arc<Self>, alerts: Vec<AlertMessage>) -> Vec<JoinHandle<()>> {
        alerts
            .into_iter()
            .map(|alert| {
                let manager = Arc::clone(self);
                tokio::spawn(async move {
                    manager.notify(&alert).await;
                })
            })
            .collect()
    }
}
