use crate::{
    catalog::FieldDefinition,
    model::{ActorRecord, EntityTag, Record},
    store::{ActorDirectory, CatalogKey, DefinitionStore, RecordKey, RecordStore, StoreError},
    types::{ActorId, TenantId},
    value::JsonMap,
};
use std::{
    collections::BTreeMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

///
/// MemStore
///
/// In-process implementation of all three repository traits, backed by
/// ordered maps behind one lock. This is the portable baseline and the test
/// substitute for the real store; catalog delete-then-insert runs under a
/// single lock acquisition here, so in-process readers never observe the
/// missing-definition window.
///

#[derive(Debug, Default)]
pub struct MemStore {
    inner: RwLock<MemInner>,
}

#[derive(Debug, Default)]
struct MemInner {
    records: BTreeMap<RecordKey, JsonMap>,
    definitions: BTreeMap<(CatalogKey, String), FieldDefinition>,
    actors: BTreeMap<(TenantId, ActorId), ActorRecord>,
    unavailable: bool,
}

impl MemStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a store outage: every subsequent call fails `Unavailable`
    /// until cleared. Test hook only; the trait surface has no equivalent.
    pub fn set_unavailable(&self, unavailable: bool) {
        if let Ok(mut inner) = self.inner.write() {
            inner.unavailable = unavailable;
        }
    }

    /// Seed one actor row directly, bypassing the record surface.
    pub fn put_actor(&self, actor: ActorRecord) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        inner.actors.insert((actor.tenant, actor.id), actor);
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemInner>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::unavailable("store lock poisoned"))?;
        if inner.unavailable {
            return Err(StoreError::unavailable("memory store offline"));
        }
        Ok(inner)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemInner>, StoreError> {
        let inner = self
            .inner
            .write()
            .map_err(|_| StoreError::unavailable("store lock poisoned"))?;
        if inner.unavailable {
            return Err(StoreError::unavailable("memory store offline"));
        }
        Ok(inner)
    }
}

impl RecordStore for MemStore {
    fn fetch(&self, key: &RecordKey) -> Result<Option<Record>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .records
            .get(key)
            .map(|body| Record::new(key.tenant, key.entity, key.id, body.clone())))
    }

    fn insert(&self, record: Record) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let key = RecordKey::new(record.tenant, record.entity, record.id);
        inner.records.insert(key, record.body);
        Ok(())
    }

    fn update(&self, key: &RecordKey, body: JsonMap) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        match inner.records.get_mut(key) {
            Some(stored) => {
                *stored = body;
                Ok(())
            }
            None => Err(StoreError::not_found(key)),
        }
    }

    fn remove(&self, key: &RecordKey) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        match inner.records.remove(key) {
            Some(_) => Ok(()),
            None => Err(StoreError::not_found(key)),
        }
    }

    fn list(&self, tenant: TenantId, entity: EntityTag) -> Result<Vec<Record>, StoreError> {
        let inner = self.read()?;
        let lower = RecordKey::new(tenant, entity, u64::MIN.into());
        let upper = RecordKey::new(tenant, entity, u64::MAX.into());

        Ok(inner
            .records
            .range(lower..=upper)
            .map(|(key, body)| Record::new(key.tenant, key.entity, key.id, body.clone()))
            .collect())
    }
}

impl DefinitionStore for MemStore {
    fn definitions(&self, scope: &CatalogKey) -> Result<Vec<FieldDefinition>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .definitions
            .range((scope.clone(), String::new())..)
            .take_while(|((stored_scope, _), _)| stored_scope == scope)
            .map(|(_, definition)| definition.clone())
            .collect())
    }

    fn insert_definition(
        &self,
        scope: &CatalogKey,
        definition: FieldDefinition,
    ) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        inner
            .definitions
            .insert((scope.clone(), definition.key.clone()), definition);
        Ok(())
    }

    fn delete_definitions(
        &self,
        scope: &CatalogKey,
        key: Option<&str>,
    ) -> Result<usize, StoreError> {
        let mut inner = self.write()?;
        match key {
            Some(key) => {
                let removed = inner
                    .definitions
                    .remove(&(scope.clone(), key.to_string()));
                Ok(usize::from(removed.is_some()))
            }
            None => {
                let doomed: Vec<(CatalogKey, String)> = inner
                    .definitions
                    .range((scope.clone(), String::new())..)
                    .take_while(|((stored_scope, _), _)| stored_scope == scope)
                    .map(|(stored_key, _)| stored_key.clone())
                    .collect();
                for stored_key in &doomed {
                    inner.definitions.remove(stored_key);
                }
                Ok(doomed.len())
            }
        }
    }
}

impl ActorDirectory for MemStore {
    fn actor(&self, tenant: TenantId, id: ActorId) -> Result<Option<ActorRecord>, StoreError> {
        let inner = self.read()?;
        Ok(inner.actors.get(&(tenant, id)).cloned())
    }

    fn actors_by_ids(
        &self,
        tenant: TenantId,
        ids: &[ActorId],
    ) -> Result<Vec<ActorRecord>, StoreError> {
        let inner = self.read()?;
        Ok(ids
            .iter()
            .filter_map(|id| inner.actors.get(&(tenant, *id)).cloned())
            .collect())
    }

    fn direct_reports(
        &self,
        tenant: TenantId,
        supervisor: ActorId,
    ) -> Result<Vec<ActorId>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .actors
            .range((tenant, ActorId::new(u64::MIN))..=(tenant, ActorId::new(u64::MAX)))
            .filter(|(_, actor)| actor.supervisor == Some(supervisor))
            .map(|((_, id), _)| *id)
            .collect())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(tenant: u64, id: u64) -> Record {
        let body = match json!({"status": "new"}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        Record::new(
            TenantId::new(tenant),
            EntityTag::CreditRequest,
            id.into(),
            body,
        )
    }

    #[test]
    fn fetch_is_tenant_scoped() {
        let store = MemStore::new();
        store.insert(record(1, 42)).unwrap();

        let foreign = RecordKey::new(TenantId::new(2), EntityTag::CreditRequest, 42.into());
        assert_eq!(store.fetch(&foreign).unwrap(), None);

        let owned = RecordKey::new(TenantId::new(1), EntityTag::CreditRequest, 42.into());
        assert!(store.fetch(&owned).unwrap().is_some());
    }

    #[test]
    fn update_of_absent_row_is_not_found() {
        let store = MemStore::new();
        let key = RecordKey::new(TenantId::new(1), EntityTag::Applicant, 9.into());
        let err = store.update(&key, JsonMap::new()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn list_is_bounded_to_tenant_and_entity() {
        let store = MemStore::new();
        store.insert(record(1, 1)).unwrap();
        store.insert(record(1, 2)).unwrap();
        store.insert(record(2, 3)).unwrap();

        let rows = store
            .list(TenantId::new(1), EntityTag::CreditRequest)
            .unwrap();
        assert_eq!(rows.len(), 2);

        let rows = store.list(TenantId::new(1), EntityTag::Applicant).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn outage_toggle_fails_every_surface() {
        let store = MemStore::new();
        store.set_unavailable(true);

        let key = RecordKey::new(TenantId::new(1), EntityTag::Applicant, 1.into());
        assert!(matches!(
            store.fetch(&key).unwrap_err(),
            StoreError::Unavailable { .. }
        ));

        let scope = CatalogKey::new(TenantId::new(1), EntityTag::Applicant, "extra");
        assert!(matches!(
            store.definitions(&scope).unwrap_err(),
            StoreError::Unavailable { .. }
        ));

        store.set_unavailable(false);
        assert_eq!(store.fetch(&key).unwrap(), None);
    }
}
