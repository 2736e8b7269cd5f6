use crate::engine::AlertEngine;
use crate::error::AnalysisError;
use crate::rules::ThresholdRule;
use crate::{analyze, AlertRule};
use chrono::Utc;
use infrasight_common::types::{Channel, PredictionSet, SensorRow};

fn make_row(temperature: f64, humidity: f64, axis: f64, pressure: f64) -> SensorRow {
    SensorRow {
        temperature,
        humidity,
        accel_x: axis,
        accel_y: axis,
        accel_z: axis,
        pressure,
    }
}

fn scenario_rows() -> Vec<SensorRow> {
    vec![
        make_row(20.0, 79.0, 1.0, 336.0),
        make_row(22.0, 81.0, 1.0, 336.0),
        make_row(24.0, 83.0, 1.0, 336.0),
    ]
}

#[test]
fn analyze_extrapolates_every_channel() {
    let analysis = analyze(&scenario_rows()).unwrap();
    assert_eq!(analysis.observations, 3);
    assert_eq!(analysis.predictions.temperature, 26.0);
    assert_eq!(analysis.predictions.humidity, 85.0);
    assert_eq!(analysis.predictions.acceleration, 1.0);
    assert_eq!(analysis.predictions.pressure, 336.0);
}

#[test]
fn temperature_26_selects_moderate_heat_band() {
    let analysis = analyze(&scenario_rows()).unwrap();
    assert_eq!(
        analysis.measures.temperature,
        vec![
            "1. Ensure that regular inspections of cooling systems are maintained.".to_string(),
            "2. Consider natural ventilation methods such as cross-ventilation for moderate heat management.".to_string(),
        ]
    );
}

#[test]
fn humidity_85_selects_top_band_and_fires_alert() {
    let analysis = analyze(&scenario_rows()).unwrap();
    assert_eq!(analysis.measures.humidity.len(), 4);
    assert!(analysis.measures.humidity[0].contains("industrial dehumidifiers"));

    let alerts = AlertEngine::standard().evaluate(&analysis.predictions, "ops@example.com");
    let humidity = alerts
        .iter()
        .find(|a| a.channel == Channel::Humidity)
        .expect("humidity alert should fire");
    assert_eq!(humidity.recipient, "ops@example.com");
    assert_eq!(humidity.subject, "Humidity Threshold Exceeded");
    assert_eq!(
        humidity.body,
        "Alert! The humidity has exceeded the safe threshold with a value of 85%. Immediate action is required."
    );
}

#[test]
fn acceleration_exactly_one_is_not_high_band_and_does_not_alert() {
    let analysis = analyze(&scenario_rows()).unwrap();
    assert_eq!(analysis.measures.acceleration.len(), 3);
    assert!(analysis.measures.acceleration[0].starts_with("1. Regularly monitor"));

    let alerts = AlertEngine::standard().evaluate(&analysis.predictions, "ops@example.com");
    assert!(alerts.iter().all(|a| a.channel != Channel::Acceleration));
}

#[test]
fn standard_engine_only_alerts_above_its_own_thresholds() {
    // 26 °C sits above the 25 band edge but below the 30 alert cut-off
    let predictions = PredictionSet {
        temperature: 26.0,
        humidity: 70.0,
        acceleration: 1.01,
        pressure: 100.0,
    };
    let alerts = AlertEngine::standard().evaluate(&predictions, "ops@example.com");
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].channel, Channel::Acceleration);
    assert_eq!(alerts[0].subject, "Acceleration Threshold Exceeded");
    assert_eq!(
        alerts[0].body,
        "Alert! The acceleration has exceeded the safe threshold with a value of 1.01. Immediate action is required."
    );
}

#[test]
fn all_four_alerts_fire_in_channel_order() {
    let predictions = PredictionSet {
        temperature: 31.5,
        humidity: 90.0,
        acceleration: 2.0,
        pressure: 336.0,
    };
    let alerts = AlertEngine::standard().evaluate(&predictions, "ops@example.com");
    let channels: Vec<Channel> = alerts.iter().map(|a| a.channel).collect();
    assert_eq!(channels, Channel::ALL.to_vec());
    assert_eq!(
        alerts[0].body,
        "Alert! The temperature has exceeded the safe threshold with a value of 31.5°C. Immediate action is required."
    );
    assert_eq!(alerts[3].threshold, 100.0);
}

#[test]
fn threshold_rule_ignores_nan() {
    let rule = ThresholdRule::new(Channel::Pressure, 100.0, "Pressure Threshold Exceeded");
    let predictions = PredictionSet {
        temperature: 0.0,
        humidity: 0.0,
        acceleration: 0.0,
        pressure: f64::NAN,
    };
    assert!(rule.evaluate(&predictions, "a@b.c", Utc::now()).is_none());
}

#[test]
fn empty_rows_are_insufficient_data() {
    let err = analyze(&[]).unwrap_err();
    assert_eq!(
        err,
        AnalysisError::InsufficientData {
            channel: Channel::Temperature
        }
    );
}

#[test]
fn single_row_predicts_its_own_values() {
    let analysis = analyze(&[make_row(18.0, 45.0, 0.2, 60.0)]).unwrap();
    assert_eq!(analysis.predictions.temperature, 18.0);
    assert_eq!(analysis.predictions.humidity, 45.0);
    assert!((analysis.predictions.acceleration - 0.2).abs() < 1e-12);
    assert_eq!(analysis.predictions.pressure, 60.0);
    assert_eq!(analysis.measures.pressure.len(), 2);
}

#[test]
fn huge_readings_fail_instead_of_predicting_nan() {
    let rows = [
        make_row(1.0e308, 40.0, 0.1, 336.0),
        make_row(1.0e308, 41.0, 0.1, 336.0),
    ];
    let err = analyze(&rows).unwrap_err();
    assert_eq!(
        err,
        AnalysisError::NonFinitePrediction {
            channel: Channel::Temperature
        }
    );
}
