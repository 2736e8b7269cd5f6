pub mod climate_reading;
pub mod maintenance_record;
pub mod motion_reading;
