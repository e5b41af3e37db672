use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Sort key for definitions with no resolvable order: lowest display
/// priority, ties broken stably by key.
pub const ORDER_SENTINEL: i64 = i64::MAX;

///
/// FieldType
///
/// Declared type of a dynamic attribute. Unknown names are preserved as
/// opaque strings rather than rejected, so a newer writer's catalog still
/// round-trips through an older reader.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum FieldType {
    Text,
    Number,
    Boolean,
    Enum,
    ObjectArray,
    Other(String),
}

impl FieldType {
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "text" => Self::Text,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "enum" => Self::Enum,
            "object_array" => Self::ObjectArray,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Enum => "enum",
            Self::ObjectArray => "object_array",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

///
/// AllowedValues
///
/// Member values for enum-typed attributes, optionally carrying their own
/// display ordering. Legacy catalogs encoded this as a bare array of values;
/// that encoding is normalized into the structured form on read.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct AllowedValues {
    pub values: Vec<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i64>,
}

impl AllowedValues {
    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AllowedValuesRepr {
    Structured {
        values: Vec<Value>,
        #[serde(default)]
        order_index: Option<i64>,
    },
    Legacy(Vec<Value>),
}

impl<'de> Deserialize<'de> for AllowedValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = AllowedValuesRepr::deserialize(deserializer)?;
        Ok(match repr {
            AllowedValuesRepr::Structured {
                values,
                order_index,
            } => Self {
                values,
                order_index,
            },
            AllowedValuesRepr::Legacy(values) => Self {
                values,
                order_index: None,
            },
        })
    }
}

///
/// Condition
///
/// Dependency of one definition on another attribute's value: the field is
/// only visible when `key` holds `value` in the document under edit.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub key: String,
    pub value: Value,
}

///
/// FieldDefinition
///
/// One dynamic-attribute definition, scoped by
/// `(tenant, entity, column, key)`. The latest stored definition is
/// authoritative for validating new writes; stored values are never
/// retroactively validated.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub key: String,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<AllowedValues>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_on: Option<Condition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i64>,
}

impl FieldDefinition {
    /// Display-ordering resolution: the definition's own `order_index`
    /// wins; an ordering embedded in `allowed_values` is the fallback;
    /// anything else sorts with lowest priority.
    #[must_use]
    pub fn sort_index(&self) -> i64 {
        self.order_index
            .or_else(|| self.allowed_values.as_ref().and_then(|av| av.order_index))
            .unwrap_or(ORDER_SENTINEL)
    }
}

/// Sort definitions for display: resolved order index, stable by key.
pub fn sort_for_display(defs: &mut [FieldDefinition]) {
    defs.sort_by(|a, b| {
        a.sort_index()
            .cmp(&b.sort_index())
            .then_with(|| a.key.cmp(&b.key))
    });
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn def(key: &str, order_index: Option<i64>, embedded: Option<i64>) -> FieldDefinition {
        FieldDefinition {
            key: key.to_string(),
            field_type: FieldType::Text,
            required: false,
            allowed_values: embedded.map(|idx| AllowedValues {
                values: vec![],
                order_index: Some(idx),
            }),
            description: None,
            default_value: None,
            conditional_on: None,
            order_index,
        }
    }

    #[test]
    fn unknown_type_names_stay_opaque() {
        let ty: FieldType = serde_json::from_value(json!("geo_point")).unwrap();
        assert_eq!(ty, FieldType::Other("geo_point".to_string()));
        assert_eq!(serde_json::to_value(&ty).unwrap(), json!("geo_point"));
    }

    #[test]
    fn legacy_allowed_values_normalize_on_read() {
        let av: AllowedValues = serde_json::from_value(json!(["a", "b"])).unwrap();
        assert_eq!(av.values, vec![json!("a"), json!("b")]);
        assert_eq!(av.order_index, None);

        let av: AllowedValues =
            serde_json::from_value(json!({"values": ["a"], "order_index": 3})).unwrap();
        assert_eq!(av.order_index, Some(3));
    }

    #[test]
    fn sort_prefers_own_index_then_embedded_then_sentinel() {
        assert_eq!(def("k", Some(2), Some(9)).sort_index(), 2);
        assert_eq!(def("k", None, Some(9)).sort_index(), 9);
        assert_eq!(def("k", None, None).sort_index(), ORDER_SENTINEL);
    }

    #[test]
    fn display_sort_is_stable_by_key() {
        let mut defs = vec![
            def("zeta", None, None),
            def("alpha", None, None),
            def("mid", Some(1), None),
        ];
        sort_for_display(&mut defs);

        let keys: Vec<&str> = defs.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["mid", "alpha", "zeta"]);
    }
}
