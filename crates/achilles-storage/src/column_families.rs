//! Column family definitions for RocksDB.
//!
//! Both counter profiles get a column family so a store written under one
//! profile can still be opened under the other:
//! - achilles_counter_table: CQL profile counters
//! - achillesCounterCF: Thrift profile counters
//!
//! Counter families carry an associative merge operator, so increments are
//! written as deltas and summed by RocksDB on read and compaction.

use achilles_types::counter::{CQL_COUNTER_TABLE, THRIFT_COUNTER_CF};
use rocksdb::{ColumnFamilyDescriptor, MergeOperands, Options};

/// Name under which the merge operator is registered
const COUNTER_MERGE_OPERATOR: &str = "achilles_counter_add";

/// All column family names
pub const ALL_CF_NAMES: &[&str] = &[CQL_COUNTER_TABLE, THRIFT_COUNTER_CF];

/// Encode a counter value for storage (big-endian i64)
pub fn encode_counter(value: i64) -> [u8; 8] {
    value.to_be_bytes()
}

/// Decode a stored counter value, None if the bytes are not 8 wide
pub fn decode_counter(bytes: &[u8]) -> Option<i64> {
    bytes.try_into().ok().map(i64::from_be_bytes)
}

/// Sum the existing value and all pending deltas.
///
/// Counters wrap on overflow like CQL counters do. Malformed operands count as 0.
fn counter_merge(
    _key: &[u8],
    existing: Option<&[u8]>,
    operands: &MergeOperands,
) -> Option<Vec<u8>> {
    let mut total = existing.and_then(decode_counter).unwrap_or(0);
    for operand in operands.iter() {
        total = total.wrapping_add(decode_counter(operand).unwrap_or(0));
    }
    Some(encode_counter(total).to_vec())
}

/// Create column family options for counter tables
fn counter_options() -> Options {
    let mut opts = Options::default();
    opts.set_merge_operator_associative(COUNTER_MERGE_OPERATOR, counter_merge);
    opts
}

/// Build all column family descriptors
pub fn build_cf_descriptors() -> Vec<ColumnFamilyDescriptor> {
    ALL_CF_NAMES
        .iter()
        .map(|name| ColumnFamilyDescriptor::new(*name, counter_options()))
        .collect()
}
