use crate::{
    error::{Error, ErrorOrigin},
    model::{EntityTag, Record},
    store::{RecordKey, RecordStore},
    types::{ItemId, RecordId, TenantId},
    value::JsonMap,
};
use serde_json::Value;
use tracing::debug;

/// Key of the item array inside the container column.
pub const ITEMS_FIELD: &str = "items";

/// Identity field of one sub-document; allocated here, immutable afterward.
pub const ITEM_ID_FIELD: &str = "item_id";

///
/// SubDocuments
///
/// Manager for one attribute column holding `{ items: [...] }`, where each
/// item is an object carrying an integer `item_id` unique within the array.
/// The container is created lazily the first time any operation targets a
/// record that has none.
///
/// Ids are allocated as one plus the current maximum, so a removed id is
/// never reused. Like the document accessor, every mutation is
/// read-modify-write in two store calls with no optimistic lock.
///

pub struct SubDocuments<'a, S> {
    store: &'a S,
    tenant: TenantId,
    entity: EntityTag,
    column: String,
}

impl<'a, S> SubDocuments<'a, S> {
    #[must_use]
    pub fn new(
        store: &'a S,
        tenant: TenantId,
        entity: EntityTag,
        column: impl Into<String>,
    ) -> Self {
        Self {
            store,
            tenant,
            entity,
            column: column.into(),
        }
    }

    const fn record_key(&self, record: RecordId) -> RecordKey {
        RecordKey::new(self.tenant, self.entity, record)
    }
}

impl<S: RecordStore> SubDocuments<'_, S> {
    /// Append one item, allocating its `item_id`. Any caller-supplied
    /// `item_id` is stripped before storage.
    pub fn append(&self, record: RecordId, mut item_fields: JsonMap) -> Result<JsonMap, Error> {
        let stored = self.load(record)?;
        let (container, mut items) = split_container(&stored, &self.column);

        let next_id = items
            .iter()
            .filter_map(read_item_id)
            .max()
            .map_or(ItemId::new(1), ItemId::successor);

        item_fields.remove(ITEM_ID_FIELD);
        item_fields.insert(ITEM_ID_FIELD.to_string(), Value::from(next_id.get()));

        debug!(key = %self.record_key(record), item = %next_id, "sub-document append");
        items.push(Value::Object(item_fields.clone()));
        self.persist(stored, container, items)?;

        Ok(item_fields)
    }

    /// Shallow-overwrite the matched item's fields; siblings are untouched
    /// and `item_id` is immutable. `None` when no item carries the id.
    pub fn update_by_id(
        &self,
        record: RecordId,
        item_id: ItemId,
        mut field_updates: JsonMap,
    ) -> Result<Option<JsonMap>, Error> {
        let stored = self.load(record)?;
        let (container, mut items) = split_container(&stored, &self.column);

        field_updates.remove(ITEM_ID_FIELD);

        let Some(position) = items
            .iter()
            .position(|item| read_item_id(item) == Some(item_id))
        else {
            return Ok(None);
        };

        let updated = match &mut items[position] {
            Value::Object(fields) => {
                for (key, value) in field_updates {
                    fields.insert(key, value);
                }
                Some(fields.clone())
            }
            _ => None,
        };

        if updated.is_some() {
            self.persist(stored, container, items)?;
        }

        Ok(updated)
    }

    /// Remove the matched item and persist the remainder. `None` when no
    /// item carries the id.
    pub fn remove_by_id(
        &self,
        record: RecordId,
        item_id: ItemId,
    ) -> Result<Option<JsonMap>, Error> {
        let stored = self.load(record)?;
        let (container, mut items) = split_container(&stored, &self.column);

        let Some(position) = items
            .iter()
            .position(|item| read_item_id(item) == Some(item_id))
        else {
            return Ok(None);
        };

        let removed = match items.remove(position) {
            Value::Object(fields) => fields,
            _ => JsonMap::new(),
        };

        debug!(key = %self.record_key(record), item = %item_id, "sub-document remove");
        self.persist(stored, container, items)?;

        Ok(Some(removed))
    }

    /// Read-only lookup by id; does not mutate, and does not create the
    /// container.
    pub fn get_by_id(&self, record: RecordId, item_id: ItemId) -> Result<Option<JsonMap>, Error> {
        let stored = self.load(record)?;
        let (_, items) = split_container(&stored, &self.column);

        Ok(items.into_iter().find_map(|item| match item {
            Value::Object(fields)
                if fields.get(ITEM_ID_FIELD).and_then(Value::as_u64)
                    == Some(item_id.get()) =>
            {
                Some(fields)
            }
            _ => None,
        }))
    }

    fn load(&self, record: RecordId) -> Result<Record, Error> {
        let key = self.record_key(record);
        self.store.fetch(&key)?.ok_or_else(|| {
            Error::not_found(ErrorOrigin::Collection, format!("record not found: {key}"))
        })
    }

    fn persist(
        &self,
        mut record: Record,
        mut container: JsonMap,
        items: Vec<Value>,
    ) -> Result<(), Error> {
        container.insert(ITEMS_FIELD.to_string(), Value::Array(items));
        record
            .body
            .insert(self.column.clone(), Value::Object(container));

        self.store.update(&self.record_key(record.id), record.body)?;
        Ok(())
    }
}

/// The container column as (sibling fields, item array), lazily empty when
/// the record has neither.
fn split_container(record: &Record, column: &str) -> (JsonMap, Vec<Value>) {
    let mut container = record.column_object(column).cloned().unwrap_or_default();
    let items = match container.remove(ITEMS_FIELD) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };
    (container, items)
}

fn read_item_id(item: &Value) -> Option<ItemId> {
    item.get(ITEM_ID_FIELD)
        .and_then(Value::as_u64)
        .map(ItemId::new)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;
    use serde_json::json;

    const TENANT: TenantId = TenantId::new(7);

    fn seeded_store() -> MemStore {
        let store = MemStore::new();
        store
            .insert(Record::new(
                TENANT,
                EntityTag::Applicant,
                RecordId::new(9),
                JsonMap::new(),
            ))
            .unwrap();
        store
    }

    fn manager(store: &MemStore) -> SubDocuments<'_, MemStore> {
        SubDocuments::new(store, TENANT, EntityTag::Applicant, "references")
    }

    fn fields(value: serde_json::Value) -> JsonMap {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn ids_start_at_one_and_never_reuse() {
        let store = seeded_store();
        let refs = manager(&store);
        let id = RecordId::new(9);

        for expected in 1..=3u64 {
            let item = refs.append(id, fields(json!({"name": "r"}))).unwrap();
            assert_eq!(item.get(ITEM_ID_FIELD), Some(&json!(expected)));
        }

        refs.remove_by_id(id, ItemId::new(2)).unwrap().unwrap();
        let item = refs.append(id, fields(json!({"name": "r4"}))).unwrap();
        assert_eq!(item.get(ITEM_ID_FIELD), Some(&json!(4)));
    }

    #[test]
    fn append_strips_caller_supplied_ids() {
        let store = seeded_store();
        let refs = manager(&store);

        let item = refs
            .append(RecordId::new(9), fields(json!({"item_id": 99, "name": "A"})))
            .unwrap();
        assert_eq!(item.get(ITEM_ID_FIELD), Some(&json!(1)));
    }

    #[test]
    fn update_overwrites_fields_and_keeps_siblings() {
        let store = seeded_store();
        let refs = manager(&store);
        let id = RecordId::new(9);

        refs.append(id, fields(json!({"name": "A"}))).unwrap();
        refs.append(id, fields(json!({"name": "B"}))).unwrap();

        let updated = refs
            .update_by_id(id, ItemId::new(1), fields(json!({"name": "A2", "item_id": 7})))
            .unwrap()
            .unwrap();
        assert_eq!(Value::Object(updated), json!({"item_id": 1, "name": "A2"}));

        let sibling = refs.get_by_id(id, ItemId::new(2)).unwrap().unwrap();
        assert_eq!(sibling.get("name"), Some(&json!("B")));
    }

    #[test]
    fn update_and_remove_of_unknown_ids_are_not_found() {
        let store = seeded_store();
        let refs = manager(&store);
        let id = RecordId::new(9);

        assert!(refs.update_by_id(id, ItemId::new(5), JsonMap::new()).unwrap().is_none());
        assert!(refs.remove_by_id(id, ItemId::new(5)).unwrap().is_none());
        assert!(refs.get_by_id(id, ItemId::new(5)).unwrap().is_none());
    }

    #[test]
    fn container_is_created_lazily_and_siblings_survive() {
        let store = seeded_store();
        let id = RecordId::new(9);

        // Pre-existing sibling field inside the container column.
        let key = RecordKey::new(TENANT, EntityTag::Applicant, id);
        let mut body = JsonMap::new();
        body.insert("references".to_string(), json!({"note": "keep me"}));
        store.update(&key, body).unwrap();

        let refs = manager(&store);
        refs.append(id, fields(json!({"name": "A"}))).unwrap();

        let stored = store.fetch(&key).unwrap().unwrap();
        let container = stored.column_object("references").unwrap();
        assert_eq!(container.get("note"), Some(&json!("keep me")));
        assert_eq!(
            container.get(ITEMS_FIELD),
            Some(&json!([{"item_id": 1, "name": "A"}]))
        );
    }
}
