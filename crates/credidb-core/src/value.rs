use serde_json::Value;

///
/// JsonMap
///
/// The dynamic-attribute representation: a JSON object mapping attribute
/// keys to arbitrary JSON values. Direct addressing is bounded to one level
/// of depth; nesting below that is opaque to the accessor.
///

pub type JsonMap = serde_json::Map<String, Value>;

/// Stable label for a JSON value's shape, used in error messages.
#[must_use]
pub const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Borrow a value as an object, or `None` for any other shape.
#[must_use]
pub const fn as_object(value: &Value) -> Option<&JsonMap> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
