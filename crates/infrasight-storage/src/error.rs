/// Errors that can occur within the storage layer.
///
/// # Examples
///
/// ```rust
/// use infrasight_storage::error::StorageError;
///
/// let err = StorageError::NotFound {
///     entity: "maintenance_record",
///     id: "7311".to_string(),
/// };
/// assert!(err.to_string().contains("maintenance_record"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A required record was not found in the database.
    #[error("Storage: {entity} not found (id={id})")]
    NotFound { entity: &'static str, id: String },

    /// An error reported by the database driver or SeaORM.
    #[error("Storage: database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// JSON serialization or deserialization failure (measure list columns).
    #[error("Storage: JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Creating the data directory failed.
    #[error("Storage: I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
