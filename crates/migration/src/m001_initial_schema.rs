use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m001_initial_schema"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.get_connection().execute_unprepared(UP_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(DOWN_SQL)
            .await?;
        Ok(())
    }
}

// tdata and adata rows with the same id describe the same sampling instant.
const UP_SQL: &str = "
CREATE TABLE IF NOT EXISTS tdata (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    temperature REAL NOT NULL,
    humidity REAL NOT NULL,
    recorded_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_tdata_recorded_at ON tdata(recorded_at DESC);

CREATE TABLE IF NOT EXISTS adata (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    accel_x REAL NOT NULL,
    accel_y REAL NOT NULL,
    accel_z REAL NOT NULL,
    pressure REAL NOT NULL,
    recorded_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_adata_recorded_at ON adata(recorded_at DESC);

CREATE TABLE IF NOT EXISTS predictive_maintenance (
    id TEXT PRIMARY KEY NOT NULL,
    temperature_prediction REAL NOT NULL,
    humidity_prediction REAL NOT NULL,
    acceleration_prediction REAL NOT NULL,
    pressure_prediction REAL NOT NULL,
    temperature_measures TEXT NOT NULL,
    humidity_measures TEXT NOT NULL,
    acceleration_measures TEXT NOT NULL,
    pressure_measures TEXT NOT NULL,
    requested_by TEXT NOT NULL,
    timestamp TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_pm_timestamp ON predictive_maintenance(timestamp DESC);
CREATE INDEX IF NOT EXISTS idx_pm_requested_by ON predictive_maintenance(requested_by);
";

const DOWN_SQL: &str = "
DROP TABLE IF EXISTS predictive_maintenance;
DROP TABLE IF EXISTS adata;
DROP TABLE IF EXISTS tdata;
";
