use crate::{
    error::Error,
    model::{ASSIGNED_TO_FIELD, CITY_FIELD, CREATED_BY_FIELD, INSTITUTION_FIELD},
    scope::{Role, RoleContext},
    store::ActorDirectory,
    types::{ActorId, TenantId},
    value::JsonMap,
};
use serde_json::Value;
use tracing::warn;

///
/// ScopeFilter
///
/// Predicate constraints a role context adds to an already tenant-scoped
/// query. Fail-safe principle: any missing piece of context needed to build
/// a constraint narrows the result set, never widens it — the degenerate
/// filter is `Empty`, not `All`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScopeFilter {
    /// No added constraint: full tenant visibility.
    All,

    /// Unsatisfiable: always an empty result.
    Empty,

    /// Every inner constraint must hold.
    And(Vec<ScopeFilter>),

    /// A fixed field must equal the given value.
    FieldEq { field: &'static str, value: Value },

    /// Creator or assignee must be one of the given actors.
    OwnedByAny { actors: Vec<ActorId> },
}

impl ScopeFilter {
    /// Evaluate this constraint against one record body.
    #[must_use]
    pub fn matches(&self, body: &JsonMap) -> bool {
        match self {
            Self::All => true,
            Self::Empty => false,
            Self::And(parts) => parts.iter().all(|part| part.matches(body)),
            Self::FieldEq { field, value } => body.get(*field) == Some(value),
            Self::OwnedByAny { actors } => {
                let owns = |field: &str| {
                    body.get(field)
                        .and_then(Value::as_u64)
                        .is_some_and(|id| actors.iter().any(|actor| actor.get() == id))
                };
                owns(CREATED_BY_FIELD) || owns(ASSIGNED_TO_FIELD)
            }
        }
    }
}

/// Build the added constraint for a role context. One builder per role
/// variant; an unrecognized role is handled exhaustively here, not by an
/// implicit else-branch.
pub fn build_filter<D: ActorDirectory>(
    directory: &D,
    tenant: TenantId,
    ctx: &RoleContext,
) -> Result<ScopeFilter, Error> {
    let filter = match &ctx.role {
        Role::Admin | Role::Company => company_visibility(),
        Role::Institution => institution_visibility(ctx),
        Role::Supervisor => supervisor_visibility(directory, tenant, ctx)?,
        Role::Agent => agent_visibility(ctx),
        Role::Unrecognized(name) => {
            warn!(role = %name, actor = %ctx.actor, "unrecognized role; scoping to nothing");
            ScopeFilter::Empty
        }
    };

    Ok(filter)
}

/// Admin and company operators see the whole tenant.
const fn company_visibility() -> ScopeFilter {
    ScopeFilter::All
}

/// Institution reviewers see their institution's records; an actor with no
/// assigned institution sees nothing. City, when assigned, narrows further.
fn institution_visibility(ctx: &RoleContext) -> ScopeFilter {
    let Some(institution) = &ctx.institution else {
        return ScopeFilter::Empty;
    };

    let mut parts = vec![ScopeFilter::FieldEq {
        field: INSTITUTION_FIELD,
        value: Value::String(institution.clone()),
    }];

    if let Some(city) = &ctx.city {
        parts.push(ScopeFilter::FieldEq {
            field: CITY_FIELD,
            value: Value::String(city.clone()),
        });
    }

    ScopeFilter::And(parts)
}

/// Supervisors see their own records plus their direct reports', resolved
/// by a single directory lookup.
fn supervisor_visibility<D: ActorDirectory>(
    directory: &D,
    tenant: TenantId,
    ctx: &RoleContext,
) -> Result<ScopeFilter, Error> {
    let mut actors = directory.direct_reports(tenant, ctx.actor)?;
    actors.push(ctx.actor);

    Ok(ScopeFilter::OwnedByAny { actors })
}

/// Individual contributors see records they created or are assigned to.
fn agent_visibility(ctx: &RoleContext) -> ScopeFilter {
    ScopeFilter::OwnedByAny {
        actors: vec![ctx.actor],
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx(role: Role) -> RoleContext {
        RoleContext {
            actor: ActorId::new(10),
            role,
            institution: None,
            city: None,
        }
    }

    fn body(value: Value) -> JsonMap {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn institution_without_assignment_scopes_to_nothing() {
        let filter = institution_visibility(&ctx(Role::Institution));
        assert_eq!(filter, ScopeFilter::Empty);
        assert!(!filter.matches(&body(json!({"institution": "any"}))));
    }

    #[test]
    fn institution_with_city_requires_both() {
        let mut context = ctx(Role::Institution);
        context.institution = Some("Banco Norte".to_string());
        context.city = Some("BOG".to_string());

        let filter = institution_visibility(&context);
        assert!(filter.matches(&body(json!({"institution": "Banco Norte", "city": "BOG"}))));
        assert!(!filter.matches(&body(json!({"institution": "Banco Norte", "city": "MED"}))));
        assert!(!filter.matches(&body(json!({"city": "BOG"}))));
    }

    #[test]
    fn owned_by_any_matches_creator_or_assignee() {
        let filter = ScopeFilter::OwnedByAny {
            actors: vec![ActorId::new(10), ActorId::new(11)],
        };

        assert!(filter.matches(&body(json!({"created_by": 10}))));
        assert!(filter.matches(&body(json!({"created_by": 1, "assigned_to": 11}))));
        assert!(!filter.matches(&body(json!({"created_by": 1, "assigned_to": 2}))));
        assert!(!filter.matches(&body(json!({}))));
    }
}
