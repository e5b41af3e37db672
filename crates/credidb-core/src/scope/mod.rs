mod enrich;
mod filter;
mod role;

pub use enrich::*;
pub use filter::*;
pub use role::*;

use crate::error::{Error, ErrorClass, ErrorOrigin};
use thiserror::Error as ThisError;

///
/// ScopeError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ScopeError {
    #[error("actor not found: {actor}")]
    ActorNotFound { actor: crate::types::ActorId },
}

impl ScopeError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::ActorNotFound { .. } => ErrorClass::NotFound,
        }
    }
}

impl From<ScopeError> for Error {
    fn from(err: ScopeError) -> Self {
        Self::new(err.class(), ErrorOrigin::Scope, err.to_string())
    }
}
