use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Structured runtime error with a stable internal classification.
/// Subsystem errors convert into this type at the engine boundary; the
/// transport layer maps `class` onto its own failure vocabulary.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{message}")]
pub struct Error {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Construct a not-found failure for the given origin.
    ///
    /// Callers must not be able to distinguish "absent" from "owned by a
    /// different tenant"; both arrive here with the same message shape.
    pub(crate) fn not_found(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::NotFound, origin, message)
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.class, ErrorClass::NotFound)
    }

    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self.class, ErrorClass::Unavailable)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///
/// - `Validation`: rejected before any store call; never retried.
/// - `NotFound`: absent row, or present under another tenant.
/// - `Unavailable`: the backing store is unreachable (transient infra).
/// - `Internal`: everything else; detail is logged, not echoed.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Validation,
    NotFound,
    Unavailable,
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Unavailable => "unavailable",
            Self::Internal => "internal",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Catalog,
    Document,
    Collection,
    Scope,
    Audit,
    Store,
    Interface,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Catalog => "catalog",
            Self::Document => "document",
            Self::Collection => "collection",
            Self::Scope => "scope",
            Self::Audit => "audit",
            Self::Store => "store",
            Self::Interface => "interface",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_class_is_origin_class_message() {
        let err = Error::new(ErrorClass::Validation, ErrorOrigin::Document, "bad path");
        assert_eq!(err.display_with_class(), "document:validation: bad path");
    }

    #[test]
    fn not_found_is_classified() {
        let err = Error::not_found(ErrorOrigin::Store, "record absent");
        assert!(err.is_not_found());
        assert!(!err.is_unavailable());
    }
}
