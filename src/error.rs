use thiserror::Error;

/// Infrastructure and data errors.
///
/// Business rule rejections (ineligible carts, invalid retries) are never
/// reported through this type; they are returned as outcome values.
#[derive(Error, Debug)]
pub enum PayLaterError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("Storage error: {0}")]
    StorageError(#[from] rocksdb::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Invalid command: {0}")]
    CommandError(String),
    #[error("Agreement {agreement_id} has no installment at index {index}")]
    UnknownInstallment { agreement_id: String, index: usize },
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, PayLaterError>;
