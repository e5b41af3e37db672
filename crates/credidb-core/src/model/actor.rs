use crate::types::{ActorId, TenantId};
use serde::{Deserialize, Serialize};

///
/// ActorRecord
///
/// The stored shape of an authenticated actor, as the directory returns it.
/// Role scoping and display-name enrichment both read from this; the derived
/// per-request view lives in `scope::RoleContext` and is never persisted.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActorRecord {
    pub tenant: TenantId,
    pub id: ActorId,
    pub display_name: String,
    pub role: String,

    /// Institution this actor is assigned to, for institution-scoped roles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,

    /// City this actor is assigned to, for institution-scoped roles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// Supervisor relation; reports are resolved through the directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supervisor: Option<ActorId>,
}
