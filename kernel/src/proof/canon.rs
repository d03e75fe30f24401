//! Canonical JSON bytes: the single serialization-for-hashing implementation.
//!
//! Every digest in the workspace (graph, trace, result, bundle) is computed
//! over bytes produced here.
//!
//! # Canonicalization rules
//!
//! 1. Object keys are sorted lexicographically (byte order).
//! 2. No extraneous whitespace (compact form: `{"a":1,"b":2}`).
//! 3. Strings are JSON-escaped per RFC 8259 §7.
//! 4. Numbers must be integers (`i64` or `u64`). Floats are rejected to
//!    prevent cross-platform formatting drift.
//! 5. Output is always valid UTF-8.
//!
//! `serde_json::Map` is a `BTreeMap` unless the `preserve_order` feature is
//! enabled, so the compact writer already emits sorted keys. The workspace
//! never enables `preserve_order`; [`canonical_json_bytes`] still checks
//! key order so a feature flip elsewhere in the dependency graph fails loudly.

use thiserror::Error;

/// Error type for canonical JSON serialization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanonError {
    /// A JSON number was not an integer (float, NaN, Infinity).
    #[error("non-integer number in canonical JSON: {raw}")]
    NonIntegerNumber { raw: String },
    /// Object keys were not in sorted order when written.
    #[error("object keys are not sorted: {key:?} follows {previous:?}")]
    UnsortedKeys { previous: String, key: String },
    /// The underlying writer failed.
    #[error("canonical JSON write failed: {detail}")]
    Write { detail: String },
}

/// Produce canonical JSON bytes from a `serde_json::Value`.
///
/// # Errors
///
/// Returns [`CanonError::NonIntegerNumber`] if any JSON number is not
/// representable as `i64` or `u64`, and [`CanonError::UnsortedKeys`] if the
/// map implementation does not iterate in sorted order.
pub fn canonical_json_bytes(value: &serde_json::Value) -> Result<Vec<u8>, CanonError> {
    check_value(value)?;
    serde_json::to_vec(value).map_err(|e| CanonError::Write {
        detail: e.to_string(),
    })
}

fn check_value(value: &serde_json::Value) -> Result<(), CanonError> {
    match value {
        serde_json::Value::Null | serde_json::Value::Bool(_) | serde_json::Value::String(_) => {
            Ok(())
        }
        serde_json::Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                Ok(())
            } else {
                Err(CanonError::NonIntegerNumber { raw: n.to_string() })
            }
        }
        serde_json::Value::Array(items) => items.iter().try_for_each(check_value),
        serde_json::Value::Object(map) => {
            let mut previous: Option<&String> = None;
            for (key, item) in map {
                if let Some(prev) = previous {
                    if prev.as_bytes() >= key.as_bytes() {
                        return Err(CanonError::UnsortedKeys {
                            previous: prev.clone(),
                            key: key.clone(),
                        });
                    }
                }
                previous = Some(key);
                check_value(item)?;
            }
            Ok(())
        }
    }
}
