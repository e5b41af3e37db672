use crate::error::{Error, ErrorClass, ErrorOrigin};
use chrono::Utc;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use ulid::Ulid;

///
/// TenantId
///
/// Isolation boundary: every record, catalog scope, and actor belongs to
/// exactly one tenant.
///

#[derive(
    Clone, Copy, Debug, Display, Eq, From, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct TenantId(u64);

impl TenantId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Parse the tenant identifier carried by a request (header or query
    /// parameter). Absence or a non-integer value is a request-validation
    /// failure, never a server error.
    pub fn from_param(raw: Option<&str>) -> Result<Self, TenantParseError> {
        let raw = raw.ok_or(TenantParseError::Missing)?;
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(TenantParseError::Missing);
        }

        raw.parse::<u64>()
            .map(Self)
            .map_err(|_| TenantParseError::NotAnInteger {
                raw: raw.to_string(),
            })
    }
}

///
/// TenantParseError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum TenantParseError {
    #[error("tenant identifier is missing")]
    Missing,

    #[error("tenant identifier is not an integer: '{raw}'")]
    NotAnInteger { raw: String },
}

impl From<TenantParseError> for Error {
    fn from(err: TenantParseError) -> Self {
        Self::new(ErrorClass::Validation, ErrorOrigin::Interface, err.to_string())
    }
}

///
/// RecordId
///

#[derive(
    Clone, Copy, Debug, Display, Eq, From, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct RecordId(u64);

impl RecordId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

///
/// ActorId
///

#[derive(
    Clone, Copy, Debug, Display, Eq, From, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct ActorId(u64);

impl ActorId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

///
/// ItemId
///
/// Identity of one sub-document inside an array-valued attribute. Unique
/// within its parent array only; allocation is one plus the current maximum.
///

#[derive(
    Clone, Copy, Debug, Default, Display, Eq, From, Hash, Ord, PartialEq, PartialOrd, Serialize,
    Deserialize,
)]
#[repr(transparent)]
pub struct ItemId(u64);

impl ItemId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id an append after this one would receive.
    #[must_use]
    pub const fn successor(self) -> Self {
        Self(self.0 + 1)
    }
}

///
/// AuditId
///
/// Generated identity for one audit entry. ULIDs give lexicographic
/// insertion ordering without coordination.
///

#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct AuditId(Ulid);

impl AuditId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Ulid::new())
    }

    #[must_use]
    pub const fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }
}

///
/// Timestamp
/// (in seconds)
///

#[derive(
    Clone, Copy, Debug, Default, Display, Eq, From, Hash, Ord, PartialEq, PartialOrd, Serialize,
    Deserialize,
)]
#[repr(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const EPOCH: Self = Self(u64::MIN);

    /// Construct from seconds.
    #[must_use]
    pub const fn from_seconds(secs: u64) -> Self {
        Self(secs)
    }

    #[must_use]
    pub const fn as_seconds(self) -> u64 {
        self.0
    }

    /// Current wall-clock time, truncated to seconds.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn now() -> Self {
        let secs = Utc::now().timestamp();
        Self(if secs < 0 { 0 } else { secs as u64 })
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenant_param_parses_integers() {
        assert_eq!(TenantId::from_param(Some("7")), Ok(TenantId::new(7)));
        assert_eq!(TenantId::from_param(Some(" 12 ")), Ok(TenantId::new(12)));
    }

    #[test]
    fn tenant_param_rejects_missing() {
        assert_eq!(TenantId::from_param(None), Err(TenantParseError::Missing));
        assert_eq!(TenantId::from_param(Some("")), Err(TenantParseError::Missing));
        assert_eq!(
            TenantId::from_param(Some("   ")),
            Err(TenantParseError::Missing)
        );
    }

    #[test]
    fn tenant_param_rejects_non_integers() {
        let err = TenantId::from_param(Some("acme")).unwrap_err();
        assert!(matches!(err, TenantParseError::NotAnInteger { .. }));

        let err: Error = err.into();
        assert_eq!(err.class, ErrorClass::Validation);
    }

    #[test]
    fn item_id_successor_increments() {
        assert_eq!(ItemId::new(3).successor(), ItemId::new(4));
    }
}
