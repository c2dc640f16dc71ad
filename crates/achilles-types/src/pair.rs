//! Immutable key/value carriers.

use serde::{Deserialize, Serialize};

/// An immutable key/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypedPair<K, V> {
    key: K,
    value: V,
}

impl<K, V> TypedPair<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// An immutable key/value pair carrying a time-to-live in seconds.
///
/// A ttl of 0 means the value never expires.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypedPairWithTtl<K, V> {
    key: K,
    value: V,
    #[serde(default)]
    ttl: u32,
}

impl<K, V> TypedPairWithTtl<K, V> {
    /// Pair without expiration (ttl = 0)
    pub fn new(key: K, value: V) -> Self {
        Self::with_ttl(key, value, 0)
    }

    pub fn with_ttl(key: K, value: V, ttl: u32) -> Self {
        Self { key, value, ttl }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub fn into_parts(self) -> (K, V, u32) {
        (self.key, self.value, self.ttl)
    }
}

impl<K, V> From<TypedPair<K, V>> for TypedPairWithTtl<K, V> {
    fn from(pair: TypedPair<K, V>) -> Self {
        let (key, value) = pair.into_parts();
        Self::new(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_accessors() {
        let pair = TypedPair::new("name", 42);
        assert_eq!(*pair.key(), "name");
        assert_eq!(*pair.value(), 42);
    }

    #[test]
    fn test_ttl_defaults_to_zero() {
        let pair = TypedPairWithTtl::new("name", "value");
        assert_eq!(pair.ttl(), 0);
    }

    #[test]
    fn test_explicit_ttl() {
        let pair = TypedPairWithTtl::with_ttl(1u64, "session", 3600);
        assert_eq!(pair.ttl(), 3600);
        assert_eq!(pair.into_parts(), (1u64, "session", 3600));
    }

    #[test]
    fn test_missing_ttl_deserializes_as_zero() {
        let pair: TypedPairWithTtl<String, i64> =
            serde_json::from_str(r#"{"key":"views","value":7}"#).unwrap();
        assert_eq!(pair.key(), "views");
        assert_eq!(*pair.value(), 7);
        assert_eq!(pair.ttl(), 0);
    }

    #[test]
    fn test_pair_converts_without_expiration() {
        let pair: TypedPairWithTtl<_, _> = TypedPair::new('k', 'v').into();
        assert_eq!(pair.ttl(), 0);
    }
}
