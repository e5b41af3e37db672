use crate::types::{ActorId, AuditId, Timestamp};
use serde::{Deserialize, Serialize};

///
/// AuditKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    Creation,
    StateChange,
    Comment,
}

///
/// AuditEntry
///
/// One immutable element of a record's `historial` list. Entries are only
/// ever appended; ordering is insertion order, and the ULID id preserves it
/// even when entries are read out of band.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: AuditId,
    pub timestamp: Timestamp,
    pub actor_id: ActorId,
    pub actor_role: String,
    pub kind: AuditKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl AuditEntry {
    /// Build a new entry stamped with a fresh id and the current time.
    #[must_use]
    pub fn now(
        actor_id: ActorId,
        actor_role: impl Into<String>,
        kind: AuditKind,
        previous_state: Option<String>,
        new_state: Option<String>,
        note: Option<String>,
    ) -> Self {
        Self {
            id: AuditId::generate(),
            timestamp: Timestamp::now(),
            actor_id,
            actor_role: actor_role.into(),
            kind,
            previous_state,
            new_state,
            note,
        }
    }
}
