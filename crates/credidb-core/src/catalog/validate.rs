use crate::{
    catalog::{Condition, FieldDefinition, FieldType},
    value::{JsonMap, kind},
};
use serde_json::Value;
use std::fmt;
use thiserror::Error as ThisError;

///
/// ValidationIssue
///
/// One conformance failure of a document against its catalog.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ValidationIssue {
    #[error("required attribute '{key}' is missing")]
    MissingRequired { key: String },

    #[error("attribute '{key}' expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: String,
        found: &'static str,
    },

    #[error("attribute '{key}' is not one of the allowed values")]
    NotAllowed { key: String },
}

///
/// DocumentViolations
///
/// Aggregated validation failures; callers get every issue in one pass
/// rather than fixing them one round-trip at a time.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DocumentViolations(pub Vec<ValidationIssue>);

impl fmt::Display for DocumentViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "document failed validation ({} issues)", self.0.len())?;
        for issue in &self.0 {
            write!(f, "; {issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for DocumentViolations {}

/// Full-document validation against the catalog: every `required` key must
/// be present, and every present cataloged key's value must conform to its
/// declared type. Keys with no definition are ignored here; unknown-key
/// rejection is the accessor's opt-in validation concern.
pub fn validate_document(
    defs: &[FieldDefinition],
    document: &JsonMap,
) -> Result<(), DocumentViolations> {
    let mut issues = Vec::new();

    for def in defs {
        match document.get(&def.key) {
            None => {
                if def.required {
                    issues.push(ValidationIssue::MissingRequired {
                        key: def.key.clone(),
                    });
                }
            }
            Some(value) => {
                if let Some(issue) = conformance_issue(def, value) {
                    issues.push(issue);
                }
            }
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(DocumentViolations(issues))
    }
}

/// Resolve `conditional_on` against a document: definitions whose condition
/// key does not currently hold the condition value are filtered from the
/// visible set. Unconditional definitions are always visible.
#[must_use]
pub fn visible_definitions<'a>(
    defs: &'a [FieldDefinition],
    document: &JsonMap,
) -> Vec<&'a FieldDefinition> {
    defs.iter()
        .filter(|def| match &def.conditional_on {
            None => true,
            Some(Condition { key, value }) => document.get(key) == Some(value),
        })
        .collect()
}

/// Fill catalog defaults into a document for keys that are absent.
/// Non-destructive: present keys keep their stored values.
#[must_use]
pub fn apply_defaults(defs: &[FieldDefinition], document: &JsonMap) -> JsonMap {
    let mut out = document.clone();
    for def in defs {
        if let Some(default) = &def.default_value {
            if !out.contains_key(&def.key) {
                out.insert(def.key.clone(), default.clone());
            }
        }
    }
    out
}

fn conformance_issue(def: &FieldDefinition, value: &Value) -> Option<ValidationIssue> {
    let mismatch = || ValidationIssue::TypeMismatch {
        key: def.key.clone(),
        expected: def.field_type.name().to_string(),
        found: kind(value),
    };

    match &def.field_type {
        FieldType::Text => (!value.is_string()).then(mismatch),
        FieldType::Number => (!value.is_number()).then(mismatch),
        FieldType::Boolean => (!value.is_boolean()).then(mismatch),
        FieldType::Enum => {
            if let Some(allowed) = &def.allowed_values {
                if !allowed.contains(value) {
                    return Some(ValidationIssue::NotAllowed {
                        key: def.key.clone(),
                    });
                }
            }
            None
        }
        FieldType::ObjectArray => match value {
            Value::Array(items) if items.iter().all(Value::is_object) => None,
            _ => Some(mismatch()),
        },
        // Unknown declared types are opaque; accept anything.
        FieldType::Other(_) => None,
    }
}

///
/// TESTS
///
