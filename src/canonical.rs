//! Canonical serialization for deterministic graph fingerprints.
//!
//! - Struct fields serialize in declaration order
//! - Vectors serialize in index order, so callers sort before hashing
//! - Maps in hashed data must be BTreeMap

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to canonical JSON bytes for hashing.
///
/// # Panics
///
/// Panics if `value` cannot be serialized. Types hashed by this crate contain
/// only strings, integers, booleans and sequences, for which `serde_json`
/// serialization cannot fail.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("canonical serialization cannot fail")
}

/// Compute canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    xxh64(&to_canonical_bytes(value), 0)
}

/// Compute canonical hash and return as hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}
