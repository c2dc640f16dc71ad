//! Counter storage layer for achilles.
//!
//! Provides RocksDB-backed counter persistence with:
//! - One column family per counter profile (CQL table, Thrift CF)
//! - Merge-operator increments, safe under concurrent writers
//! - `{fqcn}:{primary_key}:{property_name}` keys for entity-wide prefix scans

pub mod column_families;
pub mod db;
pub mod error;
pub mod keys;

pub use db::CounterStore;
pub use error::StorageError;
pub use keys::CounterKey;
