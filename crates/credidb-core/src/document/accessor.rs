use crate::{
    catalog::FieldCatalog,
    document::DocPath,
    error::{Error, ErrorClass, ErrorOrigin},
    model::{EntityTag, Record},
    patch::{MergeShapeError, merge_shallow, require_object},
    store::{CatalogKey, DefinitionStore, RecordKey, RecordStore},
    types::{RecordId, TenantId},
    value::JsonMap,
};
use serde_json::Value;
use thiserror::Error as ThisError;
use tracing::debug;

///
/// DocumentError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum DocumentError {
    #[error("unknown attribute key: '{key}'")]
    UnknownField { key: String },

    #[error("delete requires a path")]
    PathRequired,

    #[error(transparent)]
    Shape(#[from] MergeShapeError),
}

impl DocumentError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        ErrorClass::Validation
    }
}

impl From<DocumentError> for Error {
    fn from(err: DocumentError) -> Self {
        Self::new(err.class(), ErrorOrigin::Document, err.to_string())
    }
}

///
/// ValidationMode
///
/// Merges are unvalidated by default; callers opt in to catalog checking
/// per write.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ValidationMode {
    #[default]
    Unchecked,
    Catalog,
}

///
/// DocumentFields
///
/// Read/merge/delete over one dynamic-attribute column of one entity kind,
/// scoped to a tenant. Every write is read-modify-write in two store calls:
/// concurrent writers to the same column race, and the last merged value
/// wins. Treat merges as best-effort, not linearizable.
///

pub struct DocumentFields<'a, S> {
    store: &'a S,
    tenant: TenantId,
    entity: EntityTag,
    column: String,
}

impl<'a, S> DocumentFields<'a, S> {
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

    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    const fn record_key(&self, record: RecordId) -> RecordKey {
        RecordKey::new(self.tenant, self.entity, record)
    }

    fn catalog_key(&self) -> CatalogKey {
        CatalogKey::new(self.tenant, self.entity, self.column.clone())
    }
}

impl<S: RecordStore> DocumentFields<'_, S> {
    /// Read the whole attribute map, or one key's value.
    ///
    /// A record with no attribute column yet reads as an empty map; an
    /// absent key reads as `None`, which is not an error.
    pub fn read(&self, record: RecordId, path: &DocPath) -> Result<Option<Value>, Error> {
        let record = self.load(record)?;
        let map = column_map(&record, &self.column);

        Ok(match path {
            DocPath::Root => Some(Value::Object(map)),
            DocPath::Key(key) => map.get(key).cloned(),
        })
    }

    /// Merge a value into the attribute column.
    ///
    /// With no path, `value` must be an object and is merged shallowly at
    /// the top level: mentioned keys overwrite or add, unmentioned keys are
    /// preserved. With a path, the single key is set to `value` as-is.
    pub fn merge(
        &self,
        record: RecordId,
        path: &DocPath,
        value: Value,
        mode: ValidationMode,
    ) -> Result<(), Error>
    where
        S: DefinitionStore,
    {
        // Validate the payload shape and the catalog before any store write.
        let update = match path {
            DocPath::Root => require_object(value).map_err(DocumentError::from)?,
            DocPath::Key(key) => {
                let mut single = JsonMap::new();
                single.insert(key.clone(), value);
                single
            }
        };

        if mode == ValidationMode::Catalog {
            self.check_known_keys(&update)?;
        }

        let stored = self.load(record)?;
        let mut map = column_map(&stored, &self.column);
        merge_shallow(&mut map, update);

        self.persist(stored, map)
    }

    /// Remove one key from the attribute column. A path is required;
    /// removing an absent key persists the map unchanged and is not an
    /// error.
    pub fn delete(&self, record: RecordId, path: &DocPath) -> Result<(), Error> {
        let DocPath::Key(key) = path else {
            return Err(DocumentError::PathRequired.into());
        };

        let stored = self.load(record)?;
        let mut map = column_map(&stored, &self.column);
        map.remove(key);

        self.persist(stored, map)
    }

    fn load(&self, record: RecordId) -> Result<Record, Error> {
        let key = self.record_key(record);
        self.store
            .fetch(&key)?
            .ok_or_else(|| Error::not_found(ErrorOrigin::Document, format!("record not found: {key}")))
    }

    fn persist(&self, mut record: Record, map: JsonMap) -> Result<(), Error> {
        let key = self.record_key(record.id);
        debug!(key = %key, column = %self.column, "document column write");

        record.body.insert(self.column.clone(), Value::Object(map));
        self.store.update(&key, record.body)?;
        Ok(())
    }

    fn check_known_keys(&self, update: &JsonMap) -> Result<(), Error>
    where
        S: DefinitionStore,
    {
        let known = FieldCatalog::new(self.store).known_keys(&self.catalog_key())?;

        for key in update.keys() {
            if !known.contains(key) {
                return Err(DocumentError::UnknownField { key: key.clone() }.into());
            }
        }

        Ok(())
    }
}

fn column_map(record: &Record, column: &str) -> JsonMap {
    record.column_object(column).cloned().unwrap_or_default()
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::{FieldDefinition, FieldType},
        store::MemStore,
    };
    use serde_json::json;

    const TENANT: TenantId = TenantId::new(7);

    fn seeded_store() -> MemStore {
        let store = MemStore::new();
        store
            .insert(Record::new(
                TENANT,
                EntityTag::Applicant,
                RecordId::new(42),
                JsonMap::new(),
            ))
            .unwrap();
        store
    }

    fn accessor(store: &MemStore) -> DocumentFields<'_, MemStore> {
        DocumentFields::new(store, TENANT, EntityTag::Applicant, "extra")
    }

    fn text_def(key: &str) -> FieldDefinition {
        FieldDefinition {
            key: key.to_string(),
            field_type: FieldType::Text,
            required: false,
            allowed_values: None,
            description: None,
            default_value: None,
            conditional_on: None,
            order_index: None,
        }
    }

    #[test]
    fn whole_map_merge_preserves_unmentioned_keys() {
        let store = seeded_store();
        let docs = accessor(&store);
        let id = RecordId::new(42);

        docs.merge(
            id,
            &DocPath::Root,
            json!({"phone": "555", "city": "BOG"}),
            ValidationMode::Unchecked,
        )
        .unwrap();
        docs.merge(
            id,
            &DocPath::Key("city".to_string()),
            json!("MED"),
            ValidationMode::Unchecked,
        )
        .unwrap();

        let map = docs.read(id, &DocPath::Root).unwrap().unwrap();
        assert_eq!(map, json!({"phone": "555", "city": "MED"}));
    }

    #[test]
    fn read_of_absent_key_is_none_not_error() {
        let store = seeded_store();
        let docs = accessor(&store);

        assert_eq!(docs.read(RecordId::new(42), &DocPath::Key("nope".into())).unwrap(), None);
    }

    #[test]
    fn whole_map_merge_requires_an_object() {
        let store = seeded_store();
        let docs = accessor(&store);

        let err = docs
            .merge(
                RecordId::new(42),
                &DocPath::Root,
                json!("flat"),
                ValidationMode::Unchecked,
            )
            .unwrap_err();
        assert_eq!(err.class, ErrorClass::Validation);
    }

    #[test]
    fn catalog_mode_rejects_unknown_keys() {
        let store = seeded_store();
        store
            .insert_definition(
                &CatalogKey::new(TENANT, EntityTag::Applicant, "extra"),
                text_def("phone"),
            )
            .unwrap();
        let docs = accessor(&store);
        let id = RecordId::new(42);

        docs.merge(
            id,
            &DocPath::Root,
            json!({"phone": "555"}),
            ValidationMode::Catalog,
        )
        .unwrap();

        let err = docs
            .merge(
                id,
                &DocPath::Root,
                json!({"phone": "555", "fax": "000"}),
                ValidationMode::Catalog,
            )
            .unwrap_err();
        assert!(err.message.contains("unknown attribute key: 'fax'"));

        let err = docs
            .merge(
                id,
                &DocPath::Key("fax".to_string()),
                json!("000"),
                ValidationMode::Catalog,
            )
            .unwrap_err();
        assert_eq!(err.class, ErrorClass::Validation);
    }

    #[test]
    fn delete_requires_a_path_and_tolerates_absent_keys() {
        let store = seeded_store();
        let docs = accessor(&store);
        let id = RecordId::new(42);

        let err = docs.delete(id, &DocPath::Root).unwrap_err();
        assert_eq!(err.class, ErrorClass::Validation);

        docs.merge(
            id,
            &DocPath::Root,
            json!({"phone": "555"}),
            ValidationMode::Unchecked,
        )
        .unwrap();
        docs.delete(id, &DocPath::Key("phone".to_string())).unwrap();
        docs.delete(id, &DocPath::Key("phone".to_string())).unwrap();

        let map = docs.read(id, &DocPath::Root).unwrap().unwrap();
        assert_eq!(map, json!({}));
    }

    #[test]
    fn foreign_tenant_records_are_not_found() {
        let store = seeded_store();
        let foreign = DocumentFields::new(&store, TenantId::new(8), EntityTag::Applicant, "extra");

        let err = foreign.read(RecordId::new(42), &DocPath::Root).unwrap_err();
        assert!(err.is_not_found());
    }
}
