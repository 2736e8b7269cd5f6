//! The predictive-maintenance pipeline: read joined sensor rows, predict,
//! advise, dispatch threshold alerts, persist the run.

use crate::state::AppState;
use infrasight_analysis::error::AnalysisError;
use infrasight_analysis::{analyze, Analysis};
use infrasight_common::types::{AlertMessage, Channel};
use infrasight_storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Reading the sensor rows failed; nothing was analysed.
    #[error("failed to read sensor data: {0}")]
    Read(#[from] StorageError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Result of one pipeline run.
#[derive(Debug)]
pub struct MaintenanceOutcome {
    pub analysis: Analysis,
    /// Channels whose prediction crossed its alert threshold.
    pub alerted: Vec<Channel>,
    /// Id of the stored record, `None` when persisting failed.
    pub record_id: Option<String>,
}

impl MaintenanceOutcome {
    pub fn persisted(&self) -> bool {
        self.record_id.is_some()
    }
}

/// Runs the pipeline for `requester`.
///
/// Only the read and the analysis can fail the run. Alerts are dispatched on
/// detached tasks and a failed record write is logged and reported through
/// [`MaintenanceOutcome::record_id`].
pub async fn run(state: &AppState, requester: &str) -> Result<MaintenanceOutcome, PipelineError> {
    let rows = state.store.joined_sensor_rows().await?;
    let analysis = analyze(&rows)?;

    tracing::info!(
        requester = %requester,
        observations = analysis.observations,
        temperature = analysis.predictions.temperature,
        humidity = analysis.predictions.humidity,
        acceleration = analysis.predictions.acceleration,
        pressure = analysis.predictions.pressure,
        "Predictions computed"
    );

    let alerts = state.alert_engine.evaluate(&analysis.predictions, requester);
    let alerted = dispatch_alerts(state, alerts);

    let record_id = match state
        .store
        .insert_maintenance_record(&analysis.predictions, &analysis.measures, requester)
        .await
    {
        Ok(record) => Some(record.id),
        Err(e) => {
            tracing::error!(
                requester = %requester,
                error = %e,
                "Failed to persist maintenance record"
            );
            None
        }
    };

    Ok(MaintenanceOutcome {
        analysis,
        alerted,
        record_id,
    })
}

fn dispatch_alerts(state: &AppState, alerts: Vec<AlertMessage>) -> Vec<Channel> {
    let alerted: Vec<Channel> = alerts.iter().map(|a| a.channel).collect();
    if !alerts.is_empty() {
        tracing::info!(count = alerts.len(), "Dispatching threshold alerts");
        // Completion is not awaited; failures are logged by the notifier.
        drop(state.notifier.dispatch(alerts));
    }
    alerted
}
