use crate::error::{Error, ErrorClass};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

/// Message echoed for internal failures; the real detail is logged, never
/// sent to the caller.
const INTERNAL_MESSAGE: &str = "internal error";

///
/// Envelope
///
/// The response shape the transport layer serializes for every call:
/// `{ ok, data, error }`. Not-found outcomes are part of the `ok` surface
/// (absent data, no error), so callers cannot distinguish a missing row from
/// a foreign tenant's row here either.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub ok: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    /// A successful response carrying a payload.
    #[must_use]
    pub const fn ok(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// A successful response with nothing to return.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            ok: true,
            data: None,
            error: None,
        }
    }

    /// A rejected response carrying a caller-visible message.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Map an operation result onto the envelope.
    ///
    /// Class policy: `NotFound` is absent data, not a failure; `Validation`
    /// and `Unavailable` echo their message so callers can tell a rejected
    /// request from a transient outage; `Internal` logs the full detail and
    /// echoes a generic message.
    #[must_use]
    pub fn from_result(result: Result<Option<Value>, Error>) -> Self {
        match result {
            Ok(Some(data)) => Self::ok(data),
            Ok(None) => Self::empty(),
            Err(err) => Self::from_error(&err),
        }
    }

    #[must_use]
    pub fn from_error(err: &Error) -> Self {
        match err.class {
            ErrorClass::NotFound => Self::empty(),
            ErrorClass::Validation | ErrorClass::Unavailable => Self::rejected(err.to_string()),
            ErrorClass::Internal => {
                error!(detail = %err.display_with_class(), "internal failure");
                Self::rejected(INTERNAL_MESSAGE)
            }
        }
    }
}

///
/// TESTS
///
