use crate::AlertRule;
use chrono::{DateTime, Utc};
use infrasight_common::types::{AlertMessage, Channel, PredictionSet};

/// Fires when a channel's prediction is strictly above `threshold`.
pub struct ThresholdRule {
    pub channel: Channel,
    pub threshold: f64,
    pub subject: String,
}

impl ThresholdRule {
    pub fn new(channel: Channel, threshold: f64, subject: impl Into<String>) -> Self {
        Self {
            channel,
            threshold,
            subject: subject.into(),
        }
    }

    fn message(&self, value: f64) -> String {
        format!(
            "Alert! The {} has exceeded the safe threshold with a value of {}{}. Immediate action is required.",
            self.channel,
            value,
            self.channel.unit(),
        )
    }
}

impl AlertRule for ThresholdRule {
    fn evaluate(
        &self,
        predictions: &PredictionSet,
        recipient: &str,
        now: DateTime<Utc>,
    ) -> Option<AlertMessage> {
        let value = predictions.get(self.channel);
        if value.is_nan() || value <= self.threshold {
            return None;
        }

        Some(AlertMessage {
            recipient: recipient.to_string(),
            subject: self.subject.clone(),
            body: self.message(value),
            channel: self.channel,
            value,
            threshold: self.threshold,
            timestamp: now,
        })
    }
}
