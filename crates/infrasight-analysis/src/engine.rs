use crate::rules::ThresholdRule;
use crate::AlertRule;
use chrono::Utc;
use infrasight_common::types::{AlertMessage, Channel, PredictionSet};

/// Alert cut-offs applied to predictions. These are deliberately separate
/// from the advisor band edges.
pub const TEMPERATURE_ALERT_THRESHOLD: f64 = 30.0;
pub const HUMIDITY_ALERT_THRESHOLD: f64 = 70.0;
pub const ACCELERATION_ALERT_THRESHOLD: f64 = 1.0;
pub const PRESSURE_ALERT_THRESHOLD: f64 = 100.0;

pub struct AlertEngine {
    rules: Vec<Box<dyn AlertRule>>,
}

impl AlertEngine {
    pub fn new(rules: Vec<Box<dyn AlertRule>>) -> Self {
        Self { rules }
    }

    /// The four fixed per-channel threshold rules.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(ThresholdRule::new(
                Channel::Temperature,
                TEMPERATURE_ALERT_THRESHOLD,
                "Temperature Threshold Exceeded",
            )),
            Box::new(ThresholdRule::new(
                Channel::Humidity,
                HUMIDITY_ALERT_THRESHOLD,
                "Humidity Threshold Exceeded",
            )),
            Box::new(ThresholdRule::new(
                Channel::Acceleration,
                ACCELERATION_ALERT_THRESHOLD,
                "Acceleration Threshold Exceeded",
            )),
            Box::new(ThresholdRule::new(
                Channel::Pressure,
                PRESSURE_ALERT_THRESHOLD,
                "Pressure Threshold Exceeded",
            )),
        ])
    }

    /// Runs every rule against `predictions`, addressing alerts to `recipient`.
    pub fn evaluate(&self, predictions: &PredictionSet, recipient: &str) -> Vec<AlertMessage> {
        let now = Utc::now();
        let alerts: Vec<AlertMessage> = self
            .rules
            .iter()
            .filter_map(|rule| rule.evaluate(predictions, recipient, now))
            .collect();

        for alert in &alerts {
            tracing::debug!(
                channel = %alert.channel,
                value = alert.value,
                threshold = alert.threshold,
                "Prediction exceeded alert threshold"
            );
        }

        alerts
    }
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::standard()
    }
}
