use chrono::{NaiveDate, Utc};
use infrasight_common::types::{MaintenanceRecord, MeasureSet, PredictionSet};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select,
};

use crate::entities::maintenance_record::{self, Column, Entity};
use crate::error::{Result, StorageError};
use crate::store::Store;

/// Filter for listing maintenance records.
#[derive(Debug, Clone, Default)]
pub struct MaintenanceFilter {
    /// Only records created on this UTC calendar day.
    pub date: Option<NaiveDate>,
    pub requested_by: Option<String>,
}

impl MaintenanceFilter {
    fn apply(&self, mut q: Select<Entity>) -> Select<Entity> {
        if let Some(date) = self.date {
            let start = date.and_hms_opt(0, 0, 0).map(|d| d.and_utc());
            let end = date
                .succ_opt()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|d| d.and_utc());
            if let Some(start) = start {
                q = q.filter(Column::Timestamp.gte(start.fixed_offset()));
            }
            if let Some(end) = end {
                q = q.filter(Column::Timestamp.lt(end.fixed_offset()));
            }
        }
        if let Some(requested_by) = &self.requested_by {
            q = q.filter(Column::RequestedBy.eq(requested_by.as_str()));
        }
        q
    }
}

fn encode_measures(measures: &[String]) -> Result<String> {
    Ok(serde_json::to_string(measures)?)
}

fn decode_measures(raw: &str) -> Result<Vec<String>> {
    Ok(serde_json::from_str(raw)?)
}

fn to_record(m: maintenance_record::Model) -> Result<MaintenanceRecord> {
    Ok(MaintenanceRecord {
        predictions: PredictionSet {
            temperature: m.temperature_prediction,
            humidity: m.humidity_prediction,
            acceleration: m.acceleration_prediction,
            pressure: m.pressure_prediction,
        },
        measures: MeasureSet {
            temperature: decode_measures(&m.temperature_measures)?,
            humidity: decode_measures(&m.humidity_measures)?,
            acceleration: decode_measures(&m.acceleration_measures)?,
            pressure: decode_measures(&m.pressure_measures)?,
        },
        requested_by: m.requested_by,
        timestamp: m.timestamp.with_timezone(&Utc),
        id: m.id,
    })
}

impl Store {
    /// Writes one maintenance record and returns it with its assigned id and
    /// timestamp.
    pub async fn insert_maintenance_record(
        &self,
        predictions: &PredictionSet,
        measures: &MeasureSet,
        requested_by: &str,
    ) -> Result<MaintenanceRecord> {
        let am = maintenance_record::ActiveModel {
            id: Set(infrasight_common::id::next_id()),
            temperature_prediction: Set(predictions.temperature),
            humidity_prediction: Set(predictions.humidity),
            acceleration_prediction: Set(predictions.acceleration),
            pressure_prediction: Set(predictions.pressure),
            temperature_measures: Set(encode_measures(&measures.temperature)?),
            humidity_measures: Set(encode_measures(&measures.humidity)?),
            acceleration_measures: Set(encode_measures(&measures.acceleration)?),
            pressure_measures: Set(encode_measures(&measures.pressure)?),
            requested_by: Set(requested_by.to_owned()),
            timestamp: Set(Utc::now().fixed_offset()),
        };
        let model = am.insert(self.db()).await?;
        to_record(model)
    }

    pub async fn get_maintenance_record(&self, id: &str) -> Result<MaintenanceRecord> {
        let model = Entity::find_by_id(id)
            .one(self.db())
            .await?
            .ok_or_else(|| StorageError::NotFound {
                entity: "maintenance_record",
                id: id.to_string(),
            })?;
        to_record(model)
    }

    /// Records matching `filter`, newest first.
    pub async fn list_maintenance_records(
        &self,
        filter: &MaintenanceFilter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<MaintenanceRecord>> {
        let rows = filter
            .apply(Entity::find())
            .order_by(Column::Timestamp, Order::Desc)
            .order_by(Column::Id, Order::Desc)
            .limit(limit as u64)
            .offset(offset as u64)
            .all(self.db())
            .await?;
        rows.into_iter().map(to_record).collect()
    }

    pub async fn count_maintenance_records(&self, filter: &MaintenanceFilter) -> Result<u64> {
        Ok(filter.apply(Entity::find()).count(self.db()).await?)
    }
}
