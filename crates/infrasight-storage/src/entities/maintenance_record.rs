use sea_orm::entity::prelude::*;

/// Measure columns hold JSON arrays of strings.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "predictive_maintenance")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub temperature_prediction: f64,
    pub humidity_prediction: f64,
    pub acceleration_prediction: f64,
    pub pressure_prediction: f64,
    pub temperature_measures: String,
    pub humidity_measures: String,
    pub acceleration_measures: String,
    pub pressure_measures: String,
    pub requested_by: String,
    pub timestamp: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
