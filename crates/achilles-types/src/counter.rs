//! Counter table schema and operation taxonomy.
//!
//! Counters live in a dedicated table addressed by owner type, primary key
//! and property name. Two storage profiles coexist:
//! - cql: `achilles_counter_table`
//! - thrift: `achillesCounterCF`
//!
//! Both share the same four column names. The literals are a compatibility
//! contract with already-stored counter data and must never change.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MappingError;

/// Counter table name for the CQL profile
pub const CQL_COUNTER_TABLE: &str = "achilles_counter_table";

/// Counter column family name for the Thrift profile
pub const THRIFT_COUNTER_CF: &str = "achillesCounterCF";

/// Column holding the fully qualified owner type name
pub const COUNTER_FQCN: &str = "fqcn";

/// Column holding the owning entity's primary key
pub const COUNTER_PRIMARY_KEY: &str = "primary_key";

/// Column holding the counter property name
pub const COUNTER_PROPERTY_NAME: &str = "property_name";

/// Column holding the counter value
pub const COUNTER_VALUE: &str = "counter_value";

/// Physical layout of the counter table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CounterColumnSchema {
    pub table_name: &'static str,
    pub fqcn_column: &'static str,
    pub primary_key_column: &'static str,
    pub property_name_column: &'static str,
    pub value_column: &'static str,
}

impl CounterColumnSchema {
    /// Column names in declaration order: fqcn, primary key, property, value.
    pub fn columns(&self) -> [&'static str; 4] {
        [
            self.fqcn_column,
            self.primary_key_column,
            self.property_name_column,
            self.value_column,
        ]
    }
}

/// Schema used by the CQL storage profile.
pub const CQL_COUNTER_SCHEMA: CounterColumnSchema = CounterColumnSchema {
    table_name: CQL_COUNTER_TABLE,
    fqcn_column: COUNTER_FQCN,
    primary_key_column: COUNTER_PRIMARY_KEY,
    property_name_column: COUNTER_PROPERTY_NAME,
    value_column: COUNTER_VALUE,
};

/// Schema used by the Thrift storage profile.
pub const THRIFT_COUNTER_SCHEMA: CounterColumnSchema = CounterColumnSchema {
    table_name: THRIFT_COUNTER_CF,
    ..CQL_COUNTER_SCHEMA
};

/// Storage backend profile selecting the counter table name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterProfile {
    #[default]
    Cql,
    Thrift,
}

impl CounterProfile {
    pub fn schema(self) -> &'static CounterColumnSchema {
        match self {
            CounterProfile::Cql => &CQL_COUNTER_SCHEMA,
            CounterProfile::Thrift => &THRIFT_COUNTER_SCHEMA,
        }
    }
}

impl fmt::Display for CounterProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CounterProfile::Cql => write!(f, "cql"),
            CounterProfile::Thrift => write!(f, "thrift"),
        }
    }
}

/// Kind of operation targeting the counter table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CounterOperationKind {
    Increment,
    Decrement,
    Select,
    Delete,
}

impl CounterOperationKind {
    /// All kinds, in declaration order
    pub const ALL: [CounterOperationKind; 4] = [
        CounterOperationKind::Increment,
        CounterOperationKind::Decrement,
        CounterOperationKind::Select,
        CounterOperationKind::Delete,
    ];

    /// Wire name of the operation
    pub fn as_str(self) -> &'static str {
        match self {
            CounterOperationKind::Increment => "INCR",
            CounterOperationKind::Decrement => "DECR",
            CounterOperationKind::Select => "SELECT",
            CounterOperationKind::Delete => "DELETE",
        }
    }

    /// Whether the operation writes to the counter table
    pub fn is_mutation(self) -> bool {
        !matches!(self, CounterOperationKind::Select)
    }
}

impl fmt::Display for CounterOperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CounterOperationKind {
    type Err = MappingError;

    /// Exact match only: no case folding, no prefixes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INCR" => Ok(CounterOperationKind::Increment),
            "DECR" => Ok(CounterOperationKind::Decrement),
            "SELECT" => Ok(CounterOperationKind::Select),
            "DELETE" => Ok(CounterOperationKind::Delete),
            other => Err(MappingError::UnknownOperation(other.to_string())),
        }
    }
}

/// Single source of truth for the counter table schema and operation kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterRegistry {
    profile: CounterProfile,
}

impl CounterRegistry {
    pub fn new(profile: CounterProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> CounterProfile {
        self.profile
    }

    /// The fixed schema for this registry's profile.
    pub fn schema(&self) -> &'static CounterColumnSchema {
        self.profile.schema()
    }

    /// Map an operation name to its kind.
    pub fn classify(&self, operation_name: &str) -> Result<CounterOperationKind, MappingError> {
        operation_name.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_operations() {
        let registry = CounterRegistry::default();
        assert_eq!(
            registry.classify("INCR").unwrap(),
            CounterOperationKind::Increment
        );
        assert_eq!(
            registry.classify("DECR").unwrap(),
            CounterOperationKind::Decrement
        );
        assert_eq!(
            registry.classify("SELECT").unwrap(),
            CounterOperationKind::Select
        );
        assert_eq!(
            registry.classify("DELETE").unwrap(),
            CounterOperationKind::Delete
        );
    }

    #[test]
    fn test_classify_rejects_unknown() {
        let registry = CounterRegistry::default();
        assert_eq!(
            registry.classify("FOO"),
            Err(MappingError::UnknownOperation("FOO".to_string()))
        );
    }

    #[test]
    fn test_classify_is_exact_match() {
        let registry = CounterRegistry::default();
        for name in ["incr", "Incr", "INC", "INCREMENT", " INCR", "SELECT ", ""] {
            assert!(
                matches!(registry.classify(name), Err(MappingError::UnknownOperation(_))),
                "{name:?} should not classify"
            );
        }
    }

    #[test]
    fn test_as_str_parses_back() {
        for kind in CounterOperationKind::ALL {
            assert_eq!(kind.as_str().parse::<CounterOperationKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_cql_schema_literals() {
        let schema = CounterRegistry::default().schema();
        assert_eq!(schema.table_name, "achilles_counter_table");
        assert_eq!(schema.value_column, "counter_value");
        assert_eq!(
            schema.columns(),
            ["fqcn", "primary_key", "property_name", "counter_value"]
        );
    }

    #[test]
    fn test_schema_is_stable_across_calls() {
        let registry = CounterRegistry::default();
        assert_eq!(registry.schema(), registry.schema());
    }

    #[test]
    fn test_thrift_profile_shares_columns() {
        let registry = CounterRegistry::new(CounterProfile::Thrift);
        assert_eq!(registry.schema().table_name, "achillesCounterCF");
        assert_eq!(registry.schema().columns(), CQL_COUNTER_SCHEMA.columns());
    }

    #[test]
    fn test_only_select_is_read_only() {
        let read_only: Vec<_> = CounterOperationKind::ALL
            .into_iter()
            .filter(|k| !k.is_mutation())
            .collect();
        assert_eq!(read_only, vec![CounterOperationKind::Select]);
    }
}
