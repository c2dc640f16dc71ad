//! Key encoding and decoding for the counter table.
//!
//! Key format: `{fqcn}:{primary_key}:{property_name}`
//! - fqcn: fully qualified owner type name, no ':' allowed
//! - primary_key: serialized primary key of the owning entity, may contain ':'
//! - property_name: counter property on the entity, no ':' allowed
//!
//! All counters of one entity share the `{fqcn}:{primary_key}:` prefix, which
//! enables entity-wide scans via RocksDB prefix iteration.

use achilles_types::MappingError;

use crate::error::StorageError;

/// Row address of a single counter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CounterKey {
    /// Owner type (fqcn column)
    pub fqcn: String,
    /// Owning entity's primary key (primary_key column)
    pub primary_key: String,
    /// Counter property (property_name column)
    pub property_name: String,
}

fn check_component(what: &str, value: &str, allow_separator: bool) -> Result<(), MappingError> {
    if value.is_empty() {
        return Err(MappingError::InvalidKey(format!("{what} must not be empty")));
    }
    if !allow_separator && value.contains(':') {
        return Err(MappingError::InvalidKey(format!(
            "{what} must not contain ':': {value}"
        )));
    }
    Ok(())
}

impl CounterKey {
    /// Create a counter key, validating every component
    pub fn new(
        fqcn: impl Into<String>,
        primary_key: impl Into<String>,
        property_name: impl Into<String>,
    ) -> Result<Self, MappingError> {
        let key = Self {
            fqcn: fqcn.into(),
            primary_key: primary_key.into(),
            property_name: property_name.into(),
        };
        check_component("fqcn", &key.fqcn, false)?;
        check_component("primary_key", &key.primary_key, true)?;
        check_component("property_name", &key.property_name, false)?;
        Ok(key)
    }

    /// Encode key to bytes for storage
    pub fn to_bytes(&self) -> Vec<u8> {
        format!("{}:{}:{}", self.fqcn, self.primary_key, self.property_name).into_bytes()
    }

    /// Decode key from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StorageError> {
        let s = std::str::from_utf8(bytes)
            .map_err(|e| StorageError::Key(format!("Invalid UTF-8: {}", e)))?;

        let malformed = || StorageError::Key(format!("Invalid counter key format: {}", s));
        let (fqcn, rest) = s.split_once(':').ok_or_else(malformed)?;
        let (primary_key, property_name) = rest.rsplit_once(':').ok_or_else(malformed)?;

        Self::new(fqcn, primary_key, property_name).map_err(|e| StorageError::Key(e.to_string()))
    }

    /// Prefix shared by every counter of one entity
    pub fn entity_prefix(fqcn: &str, primary_key: &str) -> Result<Vec<u8>, MappingError> {
        check_component("fqcn", fqcn, false)?;
        check_component("primary_key", primary_key, true)?;
        Ok(format!("{}:{}:", fqcn, primary_key).into_bytes())
    }

    /// Whether this key belongs to the given entity
    pub fn belongs_to(&self, fqcn: &str, primary_key: &str) -> bool {
        self.fqcn == fqcn && self.primary_key == primary_key
    }
}
