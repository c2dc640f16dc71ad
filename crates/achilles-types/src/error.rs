//! Error types for the achilles mapping layer.

use thiserror::Error;

/// Unified error type for mapping-level contract violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    /// Counter operation name outside INCR/DECR/SELECT/DELETE
    #[error("Unknown counter operation: {0}")]
    UnknownOperation(String),

    /// Interception record built without a required part
    #[error("Invalid interception record: missing {0}")]
    InvalidRecord(&'static str),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Counter key component is empty or malformed
    #[error("Invalid counter key: {0}")]
    InvalidKey(String),

    /// Property is not declared as a counter on the entity
    #[error("Property {property} is not a counter of {fqcn}")]
    NotACounter { fqcn: String, property: String },
}
