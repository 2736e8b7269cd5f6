//! Predictive-maintenance analysis.
//!
//! Joined sensor rows are split into per-channel observation sequences, each
//! sequence is extrapolated one step ahead with a least-squares line
//! ([`predictor`]), the predictions are mapped to recommended actions
//! ([`advisor`]) and checked against fixed alert thresholds
//! ([`engine::AlertEngine`]).

pub mod advisor;
pub mod engine;
pub mod error;
pub mod predictor;
pub mod rules;

#[cfg(test)]
mod tests;

use chrono::{DateTime, Utc};
use infrasight_common::types::{AlertMessage, Channel, MeasureSet, PredictionSet, SensorRow};

use crate::error::{AnalysisError, Result};
use crate::predictor::{predict_next, ObservationSet};

/// A rule that inspects a prediction set and optionally produces an alert
/// for the requester.
pub trait AlertRule: Send + Sync {
    /// Returns an alert addressed to `recipient` when the rule condition is
    /// met, or `None` otherwise.
    fn evaluate(
        &self,
        predictions: &PredictionSet,
        recipient: &str,
        now: DateTime<Utc>,
    ) -> Option<AlertMessage>;
}

/// Predictions paired with the measures derived from them.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub predictions: PredictionSet,
    pub measures: MeasureSet,
    /// Number of joined rows the predictions were fitted on.
    pub observations: usize,
}

/// Predicts the next value of every channel.
pub fn predict(observations: &ObservationSet) -> Result<PredictionSet> {
    let next = |channel| predict_next(channel, observations.get(channel));
    Ok(PredictionSet {
        temperature: next(Channel::Temperature)?,
        humidity: next(Channel::Humidity)?,
        acceleration: next(Channel::Acceleration)?,
        pressure: next(Channel::Pressure)?,
    })
}

/// Runs the pure part of the pipeline over rows in store order.
///
/// # Errors
///
/// Fails when there are no rows, a row holds a non-finite value or a fit
/// overflows.
pub fn analyze(rows: &[SensorRow]) -> Result<Analysis> {
    let observations = ObservationSet::from_rows(rows);
    if observations.is_empty() {
        return Err(AnalysisError::InsufficientData {
            channel: Channel::Temperature,
        });
    }
    let predictions = predict(&observations)?;
    let measures = advisor::advise(&predictions);
    Ok(Analysis {
        predictions,
        measures,
        observations: observations.len(),
    })
}
