// Path: crates/types/src/codec.rs

//! Defines the canonical JSON codec and hashing helpers for all
//! consensus-critical bytes.
//!
//! This module wraps `serde_jcs` (RFC 8785, the JSON Canonicalization
//! Scheme). Canonical JSON sorts object keys by code-point order, emits
//! numbers in shortest round-trip form, and strips insignificant
//! whitespace, so any two semantically equal values serialize to identical
//! bytes. By centralizing the codec here in the base `types` crate, every
//! component hashes and signs the exact same byte representation,
//! preventing verdict mismatches between conforming implementations.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Encodes a value into its canonical JSON byte representation.
///
/// This function must be used for all data that is hashed, committed to, or
/// compared across implementations: canonical payloads, revealed verdicts,
/// and memo bodies.
///
/// # Errors
///
/// Returns a descriptive `String` if the value cannot be represented as
/// canonical JSON (for example a non-finite float).
pub fn to_canonical_json<T: Serialize>(v: &T) -> Result<Vec<u8>, String> {
    serde_jcs::to_vec(v).map_err(|e| format!("canonical JSON encoding failed: {}", e))
}

/// Decodes a value from JSON bytes.
///
/// Decoding is intentionally lenient about formatting: canonical form is an
/// encoding guarantee, not a decoding requirement.
pub fn from_json<T: serde::de::DeserializeOwned>(b: &[u8]) -> Result<T, String> {
    serde_json::from_slice(b).map_err(|e| format!("JSON decoding failed: {}", e))
}

/// Computes the SHA-256 digest of a byte slice.
pub fn sha256<T: AsRef<[u8]>>(data: T) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data.as_ref());
    hasher.finalize().into()
}

/// Computes the SHA-256 digest of a byte slice, rendered as lowercase hex.
pub fn sha256_hex<T: AsRef<[u8]>>(data: T) -> String {
    hex::encode(sha256(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn canonical_json_is_key_order_independent() {
        let a: Value = serde_json::from_str(r#"{"b":1,"a":{"y":2,"x":3}}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"a":{"x":3,"y":2},"b":1}"#).unwrap();
        assert_eq!(to_canonical_json(&a).unwrap(), to_canonical_json(&b).unwrap());
    }

    #[test]
    fn canonical_json_strips_whitespace() {
        let a: Value = serde_json::from_str(r#"{ "k" : [ 1 , 2 ] }"#).unwrap();
        assert_eq!(to_canonical_json(&a).unwrap(), br#"{"k":[1,2]}"#.to_vec());
    }

    #[test]
    fn sha256_known_vector() {
        // SHA-256 of the empty string.
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(from_json::<Value>(b"not json").is_err());
    }
}
