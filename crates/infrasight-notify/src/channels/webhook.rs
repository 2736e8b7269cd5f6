use crate::channels::{backoff, MAX_ATTEMPTS};
use crate::error::{NotifyError, Result};
use crate::plugin::ChannelPlugin;
use crate::utils::{truncate_string, MAX_BODY_LENGTH};
use crate::NotificationChannel;
use async_trait::async_trait;
use infrasight_common::types::AlertMessage;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

pub struct WebhookChannel {
    name: String,
    url: String,
    client: reqwest::Client,
}

impl WebhookChannel {
    pub fn new(name: &str, url: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            name: name.to_string(),
            url: url.to_string(),
            client,
        })
    }

    pub(crate) fn payload(alert: &AlertMessage) -> Value {
        serde_json::json!({
            "recipient": alert.recipient,
            "subject": alert.subject,
            "body": alert.body,
            "channel": alert.channel,
            "value": alert.value,
            "threshold": alert.threshold,
            "timestamp": alert.timestamp.to_rfc3339(),
        })
    }

    async fn post_once(&self, payload: &Value) -> Result<()> {
        let resp = self.client.post(&self.url).json(payload).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let body = match resp.text().await {
            Ok(text) => truncate_string(&text, MAX_BODY_LENGTH),
            Err(e) => format!("[Failed to read response body: {e}]"),
        };
        Err(NotifyError::ApiError {
            service: "webhook".to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl NotificationChannel for WebhookChannel {
    async fn send(&self, alert: &AlertMessage) -> Result<()> {
        let payload = Self::payload(alert);

        let mut last_err = None;
        for attempt in 0..MAX_ATTEMPTS {
            match self.post_once(&payload).await {
                Ok(()) => {
                    last_err = None;
                    break;
                }
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        url = %self.url,
                        error = %e,
                        "Webhook send failed, retrying"
                    );
                    last_err = Some(e);
                    if attempt + 1 < MAX_ATTEMPTS {
                        tokio::time::sleep(backoff(attempt)).await;
                    }
                }
            }
        }

        match last_err {
            Some(e) => {
                tracing::error!(url = %self.url, error = %e, "Webhook failed after {MAX_ATTEMPTS} attempts");
                Err(e)
            }
            None => Ok(()),
        }
    }

    fn channel_type(&self) -> &str {
        "webhook"
    }

    fn instance_name(&self) -> &str {
        &self.name
    }
}

// Plugin

#[derive(Deserialize)]
struct WebhookConfig {
    url: String,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

pub struct WebhookPlugin;

impl WebhookPlugin {
    fn parse(config: &Value) -> Result<WebhookConfig> {
        let cfg: WebhookConfig = serde_json::from_value(config.clone())
            .map_err(|e| NotifyError::InvalidConfig(format!("webhook: {e}")))?;
        if !(cfg.url.starts_with("http://") || cfg.url.starts_with("https://")) {
            return Err(NotifyError::InvalidConfig(format!(
                "webhook: url must be http(s), got '{}'",
                cfg.url
            )));
        }
        Ok(cfg)
    }
}

impl ChannelPlugin for WebhookPlugin {
    fn name(&self) -> &str {
        "webhook"
    }

    fn recipient_type(&self) -> &str {
        "webhook_url"
    }

    fn validate_config(&self, config: &Value) -> Result<()> {
        Self::parse(config).map(|_| ())
    }

    fn create_channel(&self, name: &str, config: &Value) -> Result<Box<dyn NotificationChannel>> {
        let cfg = Self::parse(config)?;
        Ok(Box::new(WebhookChannel::new(name, &cfg.url, cfg.timeout_secs)?))
    }
}
