use crate::config::ServerConfig;
use chrono::{DateTime, Utc};
use infrasight_analysis::engine::AlertEngine;
use infrasight_notify::manager::NotificationManager;
use infrasight_notify::plugin::ChannelRegistry;
use infrasight_storage::Store;
use std::path::Path;
use std::sync::Arc;

/// Shared handles injected into every request handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub notifier: Arc<NotificationManager>,
    pub alert_engine: Arc<AlertEngine>,
    pub config: Arc<ServerConfig>,
    pub start_time: DateTime<Utc>,
}

impl AppState {
    /// Opens the store and builds the notifier described by `config`.
    pub async fn from_config(config: ServerConfig) -> anyhow::Result<Self> {
        let store = Store::new(
            &config.database.connection_url(),
            Path::new(&config.database.data_dir),
        )
        .await?;
        let notifier = NotificationManager::from_specs(
            &ChannelRegistry::default(),
            &config.notify.channels,
            config.notify.enabled,
        )?;

        Ok(Self {
            store: Arc::new(store),
            notifier: Arc::new(notifier),
            alert_engine: Arc::new(AlertEngine::standard()),
            config: Arc::new(config),
            start_time: Utc::now(),
        })
    }
}
