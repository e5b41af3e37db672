use crate::{
    model::ActorRecord,
    scope::ScopeError,
    store::ActorDirectory,
    types::{ActorId, TenantId},
};
use crate::error::Error;

///
/// Role
///
/// Closed set of visibility roles. Raw stored role names decode through
/// `from_name`; anything unknown lands in `Unrecognized`, which every
/// filter builder must handle explicitly (it scopes to nothing, never to
/// everything).
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Role {
    /// Platform administrator: full tenant visibility.
    Admin,

    /// Company-level operator: full tenant visibility.
    Company,

    /// Institution-scoped reviewer (e.g. a bank analyst).
    Institution,

    /// Team supervisor: own records plus direct reports'.
    Supervisor,

    /// Individual contributor: own records only.
    Agent,

    /// Unknown stored role name, preserved for diagnostics.
    Unrecognized(String),
}

impl Role {
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "admin" => Self::Admin,
            "company" => Self::Company,
            "bank" | "institution" => Self::Institution,
            "supervisor" => Self::Supervisor,
            "agent" => Self::Agent,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Stable name for storage and audit entries. Unrecognized roles keep
    /// the raw stored name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Company => "company",
            Self::Institution => "institution",
            Self::Supervisor => "supervisor",
            Self::Agent => "agent",
            Self::Unrecognized(name) => name,
        }
    }
}

///
/// RoleContext
///
/// Per-request view of the acting user: role plus the tenant-scoped
/// attributes the filter builders need. Recomputed from the actor record on
/// every request; never persisted.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleContext {
    pub actor: ActorId,
    pub role: Role,
    pub institution: Option<String>,
    pub city: Option<String>,
}

impl RoleContext {
    /// Derive the context from a stored actor record.
    #[must_use]
    pub fn from_record(actor: &ActorRecord) -> Self {
        Self {
            actor: actor.id,
            role: Role::from_name(&actor.role),
            institution: actor.institution.clone(),
            city: actor.city.clone(),
        }
    }

    /// Load the actor from the directory and derive the context.
    pub fn for_actor<D: ActorDirectory>(
        directory: &D,
        tenant: TenantId,
        actor: ActorId,
    ) -> Result<Self, Error> {
        let record = directory
            .actor(tenant, actor)?
            .ok_or(ScopeError::ActorNotFound { actor })?;
        Ok(Self::from_record(&record))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_role_names_decode() {
        assert_eq!(Role::from_name("admin"), Role::Admin);
        assert_eq!(Role::from_name("bank"), Role::Institution);
        assert_eq!(Role::from_name("institution"), Role::Institution);
        assert_eq!(Role::from_name("supervisor"), Role::Supervisor);
    }

    #[test]
    fn unknown_role_names_are_preserved() {
        assert_eq!(
            Role::from_name("auditor"),
            Role::Unrecognized("auditor".to_string())
        );
    }
}
