//! Single owner of the dynamic-attribute addressing rule: a path is absent
//! (the whole map) or exactly one top-level key. Read, merge, and delete all
//! parse through here, so the depth bound cannot drift between operations.

use crate::error::{Error, ErrorClass, ErrorOrigin};
use thiserror::Error as ThisError;

///
/// DocPathError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum DocPathError {
    #[error("path must not be empty")]
    Empty,

    #[error("invalid path '{path}': expected a single segment, found {segments}")]
    InvalidPath { path: String, segments: usize },
}

impl DocPathError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        ErrorClass::Validation
    }
}

impl From<DocPathError> for Error {
    fn from(err: DocPathError) -> Self {
        Self::new(err.class(), ErrorOrigin::Document, err.to_string())
    }
}

///
/// DocPath
///
/// Parsed dynamic-attribute address. The one-segment bound is the
/// documented contract, not an implementation shortcut; deeper addressing
/// is rejected rather than partially supported.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DocPath {
    /// The whole attribute map.
    Root,

    /// One top-level key.
    Key(String),
}

impl DocPath {
    /// Parse an optional dotted path. `None` addresses the whole map; a
    /// single segment addresses one key; anything deeper is invalid.
    pub fn parse(raw: Option<&str>) -> Result<Self, DocPathError> {
        let Some(raw) = raw else {
            return Ok(Self::Root);
        };

        if raw.is_empty() {
            return Err(DocPathError::Empty);
        }

        let segments = raw.split('.').count();
        if segments > 1 {
            return Err(DocPathError::InvalidPath {
                path: raw.to_string(),
                segments,
            });
        }

        Ok(Self::Key(raw.to_string()))
    }

    /// The addressed key, or `None` for the whole map.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Root => None,
            Self::Key(key) => Some(key),
        }
    }
}

///
/// TESTS
///
