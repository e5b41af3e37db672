use crate::value::{JsonMap, kind};
use serde_json::Value;
use thiserror::Error as ThisError;

///
/// MergeShapeError
///
/// Structured failures for caller-supplied merge payloads.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum MergeShapeError {
    #[error("invalid merge payload: expected {expected}, found {actual}")]
    InvalidShape {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Require an object-shaped payload, surfacing the actual shape otherwise.
///
/// Whole-map merges accept only objects; single-key sets accept any value
/// and never pass through here.
pub fn require_object(value: Value) -> Result<JsonMap, MergeShapeError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(MergeShapeError::InvalidShape {
            expected: "object",
            actual: kind(&other),
        }),
    }
}

/// Shallow top-level merge: every key in `update` overwrites or adds the
/// corresponding key in `target`; keys not mentioned in `update` are
/// preserved untouched.
pub fn merge_shallow(target: &mut JsonMap, update: JsonMap) {
    for (key, value) in update {
        target.insert(key, value);
    }
}

/// Recursive deep merge: for any key present in both sides whose values are
/// both objects, merge recursively; otherwise the update's value replaces
/// the stored value.
///
/// This variant exists so that updating one nested block does not erase
/// sibling nested blocks.
pub fn merge_deep(target: &mut JsonMap, update: JsonMap) {
    for (key, value) in update {
        match (target.get_mut(&key), value) {
            (Some(Value::Object(stored)), Value::Object(incoming)) => {
                merge_deep(stored, incoming);
            }
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}

///
/// TESTS
///
