use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};
use std::path::Path;

use crate::error::Result;

pub mod maintenance;
pub mod sensor;

/// Access layer for the InfraSight database (`infrasight.db`).
///
/// All methods are `async fn` on top of SeaORM. The connection pool inside is
/// cheap to share; wrap the store in an `Arc` to hand it to request handlers.
pub struct Store {
    db: DatabaseConnection,
}

impl Store {
    /// Connects to `db_url` and brings the schema up to date.
    ///
    /// - `db_url`: full connection URL, e.g. `sqlite:///data/infrasight.db?mode=rwc`
    /// - `data_dir`: local data directory, created if missing
    pub async fn new(db_url: &str, data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let db = Database::connect(db_url).await?;

        // WAL only applies to SQLite
        if db_url.starts_with("sqlite://") {
            db.execute_unprepared("PRAGMA journal_mode=WAL;").await?;
        }

        Migrator::up(&db, None).await?;

        tracing::info!("Initialized InfraSight store");
        Ok(Self { db })
    }

    pub(crate) fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Round-trips to the database; used by the health endpoint.
    pub async fn ping(&self) -> Result<()> {
        self.db.ping().await?;
        Ok(())
    }
}
