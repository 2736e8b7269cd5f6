use crate::error::{NotifyError, Result};
use crate::manager::{ChannelSpec, NotificationManager};
use crate::plugin::ChannelRegistry;
use crate::NotificationChannel;
use async_trait::async_trait;
use chrono::Utc;
use infrasight_common::types::{AlertMessage, Channel};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RecordingChannel {
    sent: Arc<Mutex<Vec<AlertMessage>>>,
    fail: bool,
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    async fn send(&self, alert: &AlertMessage) -> Result<()> {
        if self.fail {
            return Err(NotifyError::SmtpError("relay refused".into()));
        }
        self.sent.lock().unwrap().push(alert.clone());
        Ok(())
    }

    fn channel_type(&self) -> &str {
        "recording"
    }

    fn instance_name(&self) -> &str {
        "recorder"
    }
}

fn alert(channel: Channel, value: f64) -> AlertMessage {
    AlertMessage {
        recipient: "ops@example.com".to_string(),
        subject: format!("{channel} alert"),
        body: format!("value {value}"),
        channel,
        value,
        threshold: 0.0,
        timestamp: Utc::now(),
    }
}

// ── Manager tests ──

#[tokio::test]
async fn notify_reaches_every_channel() {
    let first = Arc::new(Mutex::new(Vec::new()));
    let second = Arc::new(Mutex::new(Vec::new()));
    let manager = NotificationManager::new(
        vec![
            Box::new(RecordingChannel { sent: first.clone(), fail: false }),
            Box::new(RecordingChannel { sent: second.clone(), fail: false }),
        ],
        true,
    );

    manager.notify(&alert(Channel::Humidity, 85.0)).await;

    assert_eq!(first.lock().unwrap().len(), 1);
    assert_eq!(second.lock().unwrap()[0].channel, Channel::Humidity);
}

#[tokio::test]
async fn failing_channel_does_not_block_others() {
    let sent = Arc::new(Mutex::new(Vec::new()));
    let manager = NotificationManager::new(
        vec![
            Box::new(RecordingChannel { sent: Arc::default(), fail: true }),
            Box::new(RecordingChannel { sent: sent.clone(), fail: false }),
        ],
        true,
    );

    manager.notify(&alert(Channel::Pressure, 336.0)).await;

    assert_eq!(sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn disabled_manager_drops_alerts() {
    let sent = Arc::new(Mutex::new(Vec::new()));
    let manager = NotificationManager::new(
        vec![Box::new(RecordingChannel { sent: sent.clone(), fail: false })],
        false,
    );

    manager.notify(&alert(Channel::Temperature, 40.0)).await;

    assert!(sent.lock().unwrap().is_empty());
    assert!(!manager.is_enabled());
}

#[tokio::test]
async fn dispatch_spawns_one_task_per_alert() {
    let sent = Arc::new(Mutex::new(Vec::new()));
    let manager = Arc::new(NotificationManager::new(
        vec![Box::new(RecordingChannel { sent: sent.clone(), fail: false })],
        true,
    ));

    let handles = manager.dispatch(vec![
        alert(Channel::Temperature, 31.0),
        alert(Channel::Acceleration, 1.2),
    ]);
    assert_eq!(handles.len(), 2);
    for handle in handles {
        handle.await.unwrap();
    }

    let mut channels: Vec<Channel> = sent.lock().unwrap().iter().map(|a| a.channel).collect();
    channels.sort_by_key(|c| c.as_str());
    assert_eq!(channels, vec![Channel::Acceleration, Channel::Temperature]);
}

// ── Plugin registry tests ──

#[test]
fn registry_default_has_builtin_plugins() {
    let registry = ChannelRegistry::default();
    let mut names = registry.plugin_names();
    names.sort();
    assert_eq!(names, vec!["email", "webhook"]);
}

#[test]
fn registry_unknown_plugin_returns_error() {
    let registry = ChannelRegistry::default();
    let result = registry.create_channel("pager", "p", &serde_json::json!({}));
    assert!(matches!(result, Err(NotifyError::UnknownChannelType(t)) if t == "pager"));
}

#[tokio::test]
async fn email_plugin_validates_config() {
    let registry = ChannelRegistry::default();

    let valid = serde_json::json!({
        "smtp_host": "smtp.example.com",
        "smtp_port": 587,
        "from": "alerts@example.com"
    });
    assert!(registry.create_channel("email", "mail", &valid).is_ok());

    let invalid = serde_json::json!({});
    assert!(registry.create_channel("email", "mail", &invalid).is_err());
}

#[test]
fn webhook_plugin_validates_config() {
    let registry = ChannelRegistry::default();

    let valid = serde_json::json!({ "url": "https://hooks.example.com/infrasight" });
    assert!(registry.create_channel("webhook", "hook", &valid).is_ok());

    let invalid = serde_json::json!({});
    assert!(registry.create_channel("webhook", "hook", &invalid).is_err());
}

#[test]
fn from_specs_builds_named_channels() {
    let specs = vec![ChannelSpec {
        name: "ops-hook".to_string(),
        channel_type: "webhook".to_string(),
        config: serde_json::json!({ "url": "http://localhost:9000/hook" }),
    }];
    let manager = NotificationManager::from_specs(&ChannelRegistry::default(), &specs, true).unwrap();
    assert_eq!(manager.channels().len(), 1);
    assert_eq!(manager.channels()[0].instance_name(), "ops-hook");
    assert_eq!(manager.channels()[0].channel_type(), "webhook");
}

#[test]
fn from_specs_rejects_unknown_type() {
    let specs = vec![ChannelSpec {
        name: "x".to_string(),
        channel_type: "carrier-pigeon".to_string(),
        config: serde_json::json!({}),
    }];
    assert!(NotificationManager::from_specs(&ChannelRegistry::default(), &specs, true).is_err());
}
