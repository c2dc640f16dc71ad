//! RocksDB-backed counter store.
//!
//! Provides:
//! - Database open with both counter column families
//! - Increment/decrement as merge operands (no read-modify-write)
//! - Single counter reads and deletes
//! - Entity-wide counter scans and removal

use achilles_types::{CounterColumnSchema, CounterOperationKind, CounterProfile, Settings};
use rocksdb::{ColumnFamily, Direction, IteratorMode, Options, WriteBatch, DB};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::column_families::{build_cf_descriptors, decode_counter, encode_counter};
use crate::error::StorageError;
use crate::keys::CounterKey;

/// Counter persistence for one storage profile
pub struct CounterStore {
    db: DB,
    profile: CounterProfile,
}

impl CounterStore {
    /// Open the counter store at the given path, creating it if necessary
    pub fn open(path: &Path, profile: CounterProfile) -> Result<Self, StorageError> {
        info!(profile = %profile, "Opening counter store at {:?}", path);

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        let db = DB::open_cf_descriptors(&db_opts, path, build_cf_descriptors())?;

        let store = Self { db, profile };
        store.counter_cf()?;
        Ok(store)
    }

    /// Open the store described by settings
    pub fn open_with_settings(settings: &Settings) -> Result<Self, StorageError> {
        Self::open(&settings.expanded_db_path(), settings.counter_profile)
    }

    pub fn profile(&self) -> CounterProfile {
        self.profile
    }

    pub fn schema(&self) -> &'static CounterColumnSchema {
        self.profile.schema()
    }

    fn counter_cf(&self) -> Result<&ColumnFamily, StorageError> {
        let table = self.schema().table_name;
        self.db
            .cf_handle(table)
            .ok_or_else(|| StorageError::ColumnFamilyNotFound(table.to_string()))
    }

    /// Add `delta` to a counter
    pub fn incr(&self, key: &CounterKey, delta: i64) -> Result<(), StorageError> {
        let cf = self.counter_cf()?;
        self.db.merge_cf(cf, key.to_bytes(), encode_counter(delta))?;
        debug!(
            fqcn = %key.fqcn,
            property = %key.property_name,
            delta,
            "Incremented counter"
        );
        Ok(())
    }

    /// Subtract `delta` from a counter
    pub fn decr(&self, key: &CounterKey, delta: i64) -> Result<(), StorageError> {
        self.incr(key, delta.wrapping_neg())
    }

    /// Read a counter, None if it was never written or has been deleted
    pub fn get(&self, key: &CounterKey) -> Result<Option<i64>, StorageError> {
        let cf = self.counter_cf()?;
        match self.db.get_cf(cf, key.to_bytes())? {
            Some(bytes) => decode_counter(&bytes).map(Some).ok_or_else(|| {
                StorageError::Value(format!(
                    "counter {}:{} has {} bytes, expected 8",
                    key.fqcn,
                    key.property_name,
                    bytes.len()
                ))
            }),
            None => Ok(None),
        }
    }

    /// Remove a single counter
    pub fn delete(&self, key: &CounterKey) -> Result<(), StorageError> {
        let cf = self.counter_cf()?;
        self.db.delete_cf(cf, key.to_bytes())?;
        debug!(fqcn = %key.fqcn, property = %key.property_name, "Deleted counter");
        Ok(())
    }

    /// Run a classified counter operation.
    ///
    /// `delta` is ignored for SELECT and DELETE. Only SELECT returns a value.
    pub fn execute(
        &self,
        kind: CounterOperationKind,
        key: &CounterKey,
        delta: i64,
    ) -> Result<Option<i64>, StorageError> {
        debug!(
            operation = %kind,
            mutation = kind.is_mutation(),
            table = self.schema().table_name,
            "Executing counter operation"
        );
        match kind {
            CounterOperationKind::Increment => self.incr(key, delta).map(|_| None),
            CounterOperationKind::Decrement => self.decr(key, delta).map(|_| None),
            CounterOperationKind::Select => self.get(key),
            CounterOperationKind::Delete => self.delete(key).map(|_| None),
        }
    }

    /// All counters of one entity as (property_name, value), ordered by property
    pub fn entity_counters(
        &self,
        fqcn: &str,
        primary_key: &str,
    ) -> Result<Vec<(String, i64)>, StorageError> {
        let mut counters = Vec::new();
        for (key, bytes) in self.scan_entity(fqcn, primary_key)? {
            match decode_counter(&bytes) {
                Some(value) => counters.push((key.property_name, value)),
                None => warn!(
                    fqcn,
                    property = %key.property_name,
                    "Skipping counter with malformed value"
                ),
            }
        }
        Ok(counters)
    }

    /// Remove every counter of one entity. Returns number of counters removed.
    pub fn delete_entity(&self, fqcn: &str, primary_key: &str) -> Result<usize, StorageError> {
        let cf = self.counter_cf()?;
        let keys = self.scan_entity(fqcn, primary_key)?;
        if keys.is_empty() {
            return Ok(0);
        }

        let mut batch = WriteBatch::default();
        for (key, _) in &keys {
            batch.delete_cf(cf, key.to_bytes());
        }
        self.db.write(batch)?;

        debug!(fqcn, removed = keys.len(), "Deleted entity counters");
        Ok(keys.len())
    }

    fn scan_entity(
        &self,
        fqcn: &str,
        primary_key: &str,
    ) -> Result<Vec<(CounterKey, Box<[u8]>)>, StorageError> {
        let cf = self.counter_cf()?;
        let prefix = CounterKey::entity_prefix(fqcn, primary_key)?;

        let mut rows = Vec::new();
        let iter = self
            .db
            .iterator_cf(cf, IteratorMode::From(&prefix, Direction::Forward));
        for item in iter {
            let (key, value) = item?;
            if !key.starts_with(&prefix) {
                break;
            }
            // A primary key containing ':' can share the prefix of a shorter one
            let counter_key = CounterKey::from_bytes(&key)?;
            if counter_key.belongs_to(fqcn, primary_key) {
                rows.push((counter_key, value));
            }
        }
        Ok(rows)
    }
}
