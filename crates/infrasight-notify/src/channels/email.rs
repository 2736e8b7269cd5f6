use crate::channels::{backoff, MAX_ATTEMPTS};
use crate::error::{NotifyError, Result};
use crate::plugin::ChannelPlugin;
use crate::NotificationChannel;
use async_trait::async_trait;
use infrasight_common::types::AlertMessage;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Deserialize;
use serde_json::Value;

pub struct EmailChannel {
    name: String,
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl EmailChannel {
    pub fn new(
        name: &str,
        smtp_host: &str,
        smtp_port: u16,
        username: Option<&str>,
        password: Option<&str>,
        from: &str,
    ) -> Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(smtp_host)?.port(smtp_port);

        if let (Some(user), Some(pass)) = (username, password) {
            builder = builder.credentials(Credentials::new(user.to_string(), pass.to_string()));
        }

        let from = from
            .parse::<Mailbox>()
            .map_err(|e| NotifyError::InvalidConfig(format!("from address '{from}': {e}")))?;

        Ok(Self {
            name: name.to_string(),
            transport: builder.build(),
            from,
        })
    }

    fn build_message(&self, alert: &AlertMessage) -> Result<Message> {
        let to = alert
            .recipient
            .parse::<Mailbox>()
            .map_err(|_| NotifyError::InvalidRecipient(alert.recipient.clone()))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&alert.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(alert.body.clone())
            .map_err(|e| NotifyError::SmtpError(e.to_string()))
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    async fn send(&self, alert: &AlertMessage) -> Result<()> {
        let email = self.build_message(alert)?;

        let mut last_err = None;
        for attempt in 0..MAX_ATTEMPTS {
            match self.transport.send(email.clone()).await {
                Ok(_) => {
                    last_err = None;
                    break;
                }
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        recipient = %alert.recipient,
                        error = %e,
                        "Email send failed, retrying"
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
                tracing::error!(
                    recipient = %alert.recipient,
                    error = %e,
                    "Email send failed after {MAX_ATTEMPTS} attempts"
                );
                Err(e.into())
            }
            None => {
                tracing::info!(
                    channel = %self.name,
                    recipient = %alert.recipient,
                    subject = %alert.subject,
                    "Alert email sent"
                );
                Ok(())
            }
        }
    }

    fn channel_type(&self) -> &str {
        "email"
    }

    fn instance_name(&self) -> &str {
        &self.name
    }
}

// Plugin

#[derive(Deserialize)]
struct EmailConfig {
    smtp_host: String,
    #[serde(default = "default_smtp_port")]
    smtp_port: u16,
    smtp_username: Option<String>,
    smtp_password: Option<String>,
    from: String,
}

fn default_smtp_port() -> u16 {
    587
}

pub struct EmailPlugin;

impl ChannelPlugin for EmailPlugin {
    fn name(&self) -> &str {
        "email"
    }

    fn recipient_type(&self) -> &str {
        "email"
    }

    fn validate_config(&self, config: &Value) -> Result<()> {
        let cfg: EmailConfig = serde_json::from_value(config.clone())
            .map_err(|e| NotifyError::InvalidConfig(format!("email: {e}")))?;
        if cfg.smtp_host.trim().is_empty() {
            return Err(NotifyError::InvalidConfig(
                "email: smtp_host must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn create_channel(&self, name: &str, config: &Value) -> Result<Box<dyn NotificationChannel>> {
        let cfg: EmailConfig = serde_json::from_value(config.clone())
            .map_err(|e| NotifyError::InvalidConfig(format!("email: {e}")))?;
        let channel = EmailChannel::new(
            name,
            &cfg.smtp_host,
            cfg.smtp_port,
            cfg.smtp_username.as_deref(),
            cfg.smtp_password.as_deref(),
            &cfg.from,
        )?;
        Ok(Box::new(channel))
    }

    fn redact_config(&self, config: &Value) -> Value {
        let mut redacted = config.clone();
        if let Some(obj) = redacted.as_object_mut() {
            if obj.contains_key("smtp_password") {
                obj.insert(
                    "smtp_password".to_string(),
                    Value::String("***".to_string()),
                );
            }
        }
        redacted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use infrasight_common::types::Channel;

    fn channel() -> EmailChannel {
        EmailChannel::new("ops-mail", "smtp.example.com", 587, None, None, "InfraSight <alerts@example.com>")
            .unwrap()
    }

    fn alert(recipient: &str) -> AlertMessage {
        AlertMessage {
            recipient: recipient.to_string(),
            subject: "Pressure Threshold Exceeded".to_string(),
            body: "Alert! The pressure has exceeded the safe threshold with a value of 336. Immediate action is required.".to_string(),
            channel: Channel::Pressure,
            value: 336.0,
            threshold: 100.0,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn builds_plain_text_message_for_recipient() {
        let message = channel().build_message(&alert("jane@example.com")).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("To: jane@example.com"));
        assert!(raw.contains("Subject: Pressure Threshold Exceeded"));
        assert!(raw.contains("text/plain"));
    }

    #[tokio::test]
    async fn rejects_recipient_that_is_not_a_mailbox() {
        let err = channel().build_message(&alert("not an address")).unwrap_err();
        assert!(matches!(err, NotifyError::InvalidRecipient(_)));
    }

    #[tokio::test]
    async fn rejects_invalid_from_address() {
        let result = EmailChannel::new("m", "smtp.example.com", 25, None, None, "nope");
        assert!(matches!(result, Err(NotifyError::InvalidConfig(_))));
    }

    #[test]
    fn redacts_smtp_password() {
        let config = serde_json::json!({
            "smtp_host": "smtp.example.com",
            "smtp_password": "hunter2",
            "from": "alerts@example.com"
        });
        let redacted = EmailPlugin.redact_config(&config);
        assert_eq!(redacted["smtp_password"], "***");
        assert_eq!(redacted["smtp_host"], "smtp.example.com");
    }
}
