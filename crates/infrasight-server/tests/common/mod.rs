#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::Utc;
use infrasight_analysis::engine::AlertEngine;
use infrasight_common::types::{AlertMessage, NewClimateReading, NewMotionReading};
use infrasight_notify::manager::NotificationManager;
use infrasight_notify::NotificationChannel;
use infrasight_server::app;
use infrasight_server::config::{DatabaseConfig, ServerConfig};
use infrasight_server::state::AppState;
use infrasight_storage::Store;
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const REQUESTER: &str = "jane@example.com";

pub type SentAlerts = Arc<Mutex<Vec<AlertMessage>>>;

/// Channel that keeps every alert it is asked to deliver.
pub struct RecordingChannel {
    sent: SentAlerts,
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    async fn send(&self, alert: &AlertMessage) -> infrasight_notify::error::Result<()> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(alert.clone());
        Ok(())
    }

    fn channel_type(&self) -> &str {
        "recording"
    }

    fn instance_name(&self) -> &str {
        "test-recorder"
    }
}

pub struct TestContext {
    pub temp_dir: TempDir,
    pub state: AppState,
    pub app: axum::Router,
    pub sent: SentAlerts,
}

pub async fn build_test_context() -> Result<TestContext> {
    build_test_context_with(|_| {}).await
}

pub async fn build_test_context_with(customize: impl FnOnce(&mut ServerConfig)) -> Result<TestContext> {
    let temp_dir = tempfile::tempdir()?;
    let mut config = ServerConfig {
        database: DatabaseConfig {
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            url: None,
        },
        ..ServerConfig::default()
    };
    customize(&mut config);

    let store = Store::new(
        &config.database.connection_url(),
        Path::new(&config.database.data_dir),
    )
    .await?;

    let sent: SentAlerts = Arc::default();
    let notifier = NotificationManager::new(
        vec![Box::new(RecordingChannel { sent: sent.clone() })],
        config.notify.enabled,
    );

    let state = AppState {
        store: Arc::new(store),
        notifier: Arc::new(notifier),
        alert_engine: Arc::new(AlertEngine::standard()),
        config: Arc::new(config),
        start_time: Utc::now(),
    };
    let app = app::build_http_app(state.clone());

    Ok(TestContext {
        temp_dir,
        state,
        app,
        sent,
    })
}

/// Inserts paired climate and motion readings; all three axes get `axis`.
pub async fn seed_samples(ctx: &TestContext, samples: &[(f64, f64, f64, f64)]) {
    for &(temperature, humidity, axis, pressure) in samples {
        ctx.state
            .store
            .insert_climate_reading(&NewClimateReading {
                temperature,
                humidity,
            })
            .await
            .expect("climate reading should insert");
        ctx.state
            .store
            .insert_motion_reading(&NewMotionReading {
                accel_x: axis,
                accel_y: axis,
                accel_z: axis,
                pressure,
            })
            .await
            .expect("motion reading should insert");
    }
}

/// Waits for the detached alert tasks to deliver `expected` alerts.
pub async fn wait_for_alerts(ctx: &TestContext, expected: usize) -> Vec<AlertMessage> {
    for _ in 0..100 {
        {
            let sent = ctx.sent.lock().expect("lock should not be poisoned");
            if sent.len() >= expected {
                return sent.clone();
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    ctx.sent.lock().expect("lock should not be poisoned").clone()
}

async fn send(app: &axum::Router, req: Request<Body>) -> (StatusCode, Value, Option<String>) {
    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("request should be handled");

    let status = resp.status();
    let trace_id = resp
        .headers()
        .get("x-trace-id")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice::<Value>(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
    };

    (status, json, trace_id)
}

pub async fn request_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    requester: Option<&str>,
    body: Value,
) -> (StatusCode, Value, Option<String>) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(requester) = requester {
        builder = builder.header("x-requester", requester);
    }
    let req = builder
        .body(Body::from(body.to_string()))
        .expect("request should build");
    send(app, req).await
}

pub async fn request_no_body(
    app: &axum::Router,
    method: &str,
    uri: &str,
    requester: Option<&str>,
) -> (StatusCode, Value, Option<String>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(requester) = requester {
        builder = builder.header("x-requester", requester);
    }
    let req = builder.body(Body::empty()).expect("request should build");
    send(app, req).await
}

pub fn assert_ok_envelope(json: &Value) {
    assert_eq!(json["err_code"], 0);
    assert!(json["err_msg"].is_string());
    assert!(json.get("trace_id").is_some());
}

pub fn assert_err_envelope(json: &Value, err_code: i32) {
    assert_eq!(json["err_code"], err_code);
    assert!(json["err_msg"].is_string());
    assert!(json.get("trace_id").is_some());
    assert!(json.get("data").is_some());
    assert!(json["data"].is_null());
}
