//! # achilles-types
//!
//! Shared domain types for the achilles entity mapping layer:
//! - Counter table schema profiles and the counter operation taxonomy
//! - Entity lifecycle events
//! - Immutable key/value carriers
//! - Settings and the mapping error type

pub mod config;
pub mod counter;
pub mod error;
pub mod lifecycle;
pub mod pair;

pub use config::Settings;
pub use counter::{
    CounterColumnSchema, CounterOperationKind, CounterProfile, CounterRegistry,
    CQL_COUNTER_SCHEMA, THRIFT_COUNTER_SCHEMA,
};
pub use error::MappingError;
pub use lifecycle::LifecycleEvent;
pub use pair::{TypedPair, TypedPairWithTtl};
