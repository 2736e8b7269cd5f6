//! SQLite-backed storage for sensor readings and maintenance records.
//!
//! [`store::Store`] wraps a SeaORM connection. Schema migrations from the
//! `migration` crate run on connect.

pub mod entities;
pub mod error;
pub mod store;


pub use error::{Result, StorageError};
pub use store::maintenance::MaintenanceFilter;
pub use store::Store;
