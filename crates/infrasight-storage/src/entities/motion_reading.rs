use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "adata")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub accel_x: f64,
    pub accel_y: f64,
    pub accel_z: f64,
    pub pressure: f64,
    pub recorded_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
