use crate::{
    error::Error,
    model::{CREATED_BY_FIELD, EntityTag, Record},
    scope::{RoleContext, build_filter},
    store::{ActorDirectory, RecordStore},
    types::{ActorId, TenantId},
};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

///
/// ScopedRow
///
/// One visible record, enriched with the creator's display name and the
/// creator's supervisor's display name when those actors resolve.
/// Enrichment never filters: a row whose creator cannot be resolved is
/// still returned, just without names.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScopedRow {
    pub record: Record,
    pub creator_name: Option<String>,
    pub supervisor_name: Option<String>,
}

/// List one entity kind under a role context: apply the role's added
/// constraint to the tenant-scoped listing, then enrich the survivors.
pub fn scoped_list<S: RecordStore + ActorDirectory>(
    store: &S,
    tenant: TenantId,
    entity: EntityTag,
    ctx: &RoleContext,
) -> Result<Vec<ScopedRow>, Error> {
    let filter = build_filter(store, tenant, ctx)?;

    let rows: Vec<Record> = store
        .list(tenant, entity)?
        .into_iter()
        .filter(|record| filter.matches(&record.body))
        .collect();

    enrich(store, tenant, rows)
}

/// Attach creator and supervisor display names to rows.
///
/// Lookups stay batched over distinct ids: one directory call for the
/// creators, one for supervisors the first batch did not cover. Round-trips
/// are constant per request regardless of result-set size.
pub fn enrich<D: ActorDirectory>(
    directory: &D,
    tenant: TenantId,
    rows: Vec<Record>,
) -> Result<Vec<ScopedRow>, Error> {
    let creator_ids: Vec<ActorId> = rows
        .iter()
        .filter_map(creator_of)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut actors = BTreeMap::new();
    for actor in directory.actors_by_ids(tenant, &creator_ids)? {
        actors.insert(actor.id, actor);
    }

    let supervisor_ids: Vec<ActorId> = actors
        .values()
        .filter_map(|actor| actor.supervisor)
        .filter(|id| !actors.contains_key(id))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    for supervisor in directory.actors_by_ids(tenant, &supervisor_ids)? {
        actors.insert(supervisor.id, supervisor);
    }

    Ok(rows
        .into_iter()
        .map(|record| {
            let creator = creator_of(&record).and_then(|id| actors.get(&id));
            let supervisor = creator
                .and_then(|actor| actor.supervisor)
                .and_then(|id| actors.get(&id));

            ScopedRow {
                creator_name: creator.map(|actor| actor.display_name.clone()),
                supervisor_name: supervisor.map(|actor| actor.display_name.clone()),
                record,
            }
        })
        .collect())
}

fn creator_of(record: &Record) -> Option<ActorId> {
    record
        .body
        .get(CREATED_BY_FIELD)
        .and_then(Value::as_u64)
        .map(ActorId::new)
}
