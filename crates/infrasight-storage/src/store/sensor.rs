use chrono::Utc;
use infrasight_common::types::{
    ClimateReading, MotionReading, NewClimateReading, NewMotionReading, SensorRow,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectionTrait, EntityTrait, FromQueryResult, Order,
    PaginatorTrait, QueryOrder, QuerySelect, Statement,
};

use crate::entities::{climate_reading, motion_reading};
use crate::error::Result;
use crate::store::Store;

/// Inner join of the two reading tables on their shared sample id.
const JOINED_ROWS_SQL: &str = "
SELECT t.temperature AS temperature,
       t.humidity AS humidity,
       a.accel_x AS accel_x,
       a.accel_y AS accel_y,
       a.accel_z AS accel_z,
       a.pressure AS pressure
FROM tdata t
JOIN adata a ON t.id = a.id
ORDER BY t.id ASC";

#[derive(Debug, FromQueryResult)]
struct JoinedRow {
    temperature: f64,
    humidity: f64,
    accel_x: f64,
    accel_y: f64,
    accel_z: f64,
    pressure: f64,
}

impl From<JoinedRow> for SensorRow {
    fn from(r: JoinedRow) -> Self {
        SensorRow {
            temperature: r.temperature,
            humidity: r.humidity,
            accel_x: r.accel_x,
            accel_y: r.accel_y,
            accel_z: r.accel_z,
            pressure: r.pressure,
        }
    }
}

fn to_climate(m: climate_reading::Model) -> ClimateReading {
    ClimateReading {
        id: m.id,
        temperature: m.temperature,
        humidity: m.humidity,
        recorded_at: m.recorded_at.with_timezone(&Utc),
    }
}

fn to_motion(m: motion_reading::Model) -> MotionReading {
    MotionReading {
        id: m.id,
        accel_x: m.accel_x,
        accel_y: m.accel_y,
        accel_z: m.accel_z,
        pressure: m.pressure,
        recorded_at: m.recorded_at.with_timezone(&Utc),
    }
}

impl Store {
    pub async fn insert_climate_reading(&self, reading: &NewClimateReading) -> Result<ClimateReading> {
        let am = climate_reading::ActiveModel {
            temperature: Set(reading.temperature),
            humidity: Set(reading.humidity),
            recorded_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };
        let model = am.insert(self.db()).await?;
        Ok(to_climate(model))
    }

    pub async fn insert_motion_reading(&self, reading: &NewMotionReading) -> Result<MotionReading> {
        let am = motion_reading::ActiveModel {
            accel_x: Set(reading.accel_x),
            accel_y: Set(reading.accel_y),
            accel_z: Set(reading.accel_z),
            pressure: Set(reading.pressure),
            recorded_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };
        let model = am.insert(self.db()).await?;
        Ok(to_motion(model))
    }

    /// All joined sensor rows in ascending sample order. Samples present in
    /// only one of the two tables are skipped.
    pub async fn joined_sensor_rows(&self) -> Result<Vec<SensorRow>> {
        let stmt = Statement::from_string(self.db().get_database_backend(), JOINED_ROWS_SQL);
        let rows = JoinedRow::find_by_statement(stmt).all(self.db()).await?;
        Ok(rows.into_iter().map(SensorRow::from).collect())
    }

    /// Climate readings, newest first.
    pub async fn list_climate_readings(&self, limit: usize, offset: usize) -> Result<Vec<ClimateReading>> {
        let rows = climate_reading::Entity::find()
            .order_by(climate_reading::Column::Id, Order::Desc)
            .limit(limit as u64)
            .offset(offset as u64)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_climate).collect())
    }

    pub async fn count_climate_readings(&self) -> Result<u64> {
        Ok(climate_reading::Entity::find().count(self.db()).await?)
    }

    /// Motion readings, newest first.
    pub async fn list_motion_readings(&self, limit: usize, offset: usize) -> Result<Vec<MotionReading>> {
        let rows = motion_reading::Entity::find()
            .order_by(motion_reading::Column::Id, Order::Desc)
            .limit(limit as u64)
            .offset(offset as u64)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_motion).collect())
    }

    pub async fn count_motion_readings(&self) -> Result<u64> {
        Ok(motion_reading::Entity::find().count(self.db()).await?)
    }
}
