//! Storage layer error types.

use achilles_types::MappingError;
use thiserror::Error;

/// Errors that can occur in the counter storage layer
#[derive(Error, Debug)]
pub enum StorageError {
    /// RocksDB operation failed
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),

    /// Column family not found
    #[error("Column family not found: {0}")]
    ColumnFamilyNotFound(String),

    /// Stored key could not be decoded
    #[error("Key error: {0}")]
    Key(String),

    /// Stored counter value could not be decoded
    #[error("Value error: {0}")]
    Value(String),

    /// Caller violated a mapping contract
    #[error(transparent)]
    Mapping(#[from] MappingError),
}
