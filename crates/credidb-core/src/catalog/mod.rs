mod def;
mod validate;

pub use def::*;
pub use validate::*;

use crate::{
    error::{Error, ErrorClass, ErrorOrigin},
    store::{CatalogKey, DefinitionStore},
};
use std::collections::BTreeSet;
use thiserror::Error as ThisError;
use tracing::debug;

///
/// CatalogError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CatalogError {
    #[error("definition at index {index} is missing a key")]
    MissingKey { index: usize },
}

impl CatalogError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        ErrorClass::Validation
    }
}

impl From<CatalogError> for Error {
    fn from(err: CatalogError) -> Self {
        Self::new(err.class(), ErrorOrigin::Catalog, err.to_string())
    }
}

///
/// FieldCatalog
///
/// Per-tenant, per-entity, per-column registry of dynamic-attribute
/// definitions, built on an injected definition store.
///

pub struct FieldCatalog<'a, S> {
    store: &'a S,
}

impl<'a, S: DefinitionStore> FieldCatalog<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Replace every definition whose key appears in `items`.
    ///
    /// Upsert is delete-then-insert per key; there is no partial-field patch
    /// of a definition, so callers resend the full definition for any key
    /// they touch. The two steps are separate store calls: a concurrent
    /// reader may observe a momentarily missing definition unless the store
    /// provides an atomic upsert-by-unique-key primitive.
    pub fn upsert(&self, scope: &CatalogKey, items: Vec<FieldDefinition>) -> Result<(), Error> {
        for (index, item) in items.iter().enumerate() {
            if item.key.trim().is_empty() {
                return Err(CatalogError::MissingKey { index }.into());
            }
        }

        debug!(scope = %scope, count = items.len(), "catalog upsert");
        for item in items {
            self.store.delete_definitions(scope, Some(&item.key))?;
            self.store.insert_definition(scope, item)?;
        }

        Ok(())
    }

    /// Every definition in the scope, normalized and sorted for display.
    pub fn get(&self, scope: &CatalogKey) -> Result<Vec<FieldDefinition>, Error> {
        let mut defs = self.store.definitions(scope)?;
        sort_for_display(&mut defs);
        Ok(defs)
    }

    /// Delete one definition by key, or the whole scope when `key` is
    /// `None`. Returns how many definitions were removed; deleting an
    /// absent key removes zero and is not an error.
    pub fn delete(&self, scope: &CatalogKey, key: Option<&str>) -> Result<usize, Error> {
        let removed = self.store.delete_definitions(scope, key)?;
        debug!(scope = %scope, removed, "catalog delete");
        Ok(removed)
    }

    /// The set of keys the catalog currently defines for this scope.
    pub fn known_keys(&self, scope: &CatalogKey) -> Result<BTreeSet<String>, Error> {
        let defs = self.store.definitions(scope)?;
        Ok(defs.into_iter().map(|def| def.key).collect())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::EntityTag, store::MemStore, types::TenantId};

    fn scope() -> CatalogKey {
        CatalogKey::new(TenantId::new(7), EntityTag::Applicant, "extra")
    }

    fn text_def(key: &str, order_index: Option<i64>) -> FieldDefinition {
        FieldDefinition {
            key: key.to_string(),
            field_type: FieldType::Text,
            required: false,
            allowed_values: None,
            description: None,
            default_value: None,
            conditional_on: None,
            order_index,
        }
    }

    #[test]
    fn upsert_is_idempotent_per_key() {
        let store = MemStore::new();
        let catalog = FieldCatalog::new(&store);

        catalog.upsert(&scope(), vec![text_def("phone", None)]).unwrap();
        catalog.upsert(&scope(), vec![text_def("phone", Some(1))]).unwrap();

        let defs = catalog.get(&scope()).unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].order_index, Some(1));
    }

    #[test]
    fn upsert_rejects_empty_keys_before_touching_the_store() {
        let store = MemStore::new();
        let catalog = FieldCatalog::new(&store);

        let err = catalog
            .upsert(&scope(), vec![text_def("phone", None), text_def("  ", None)])
            .unwrap_err();
        assert_eq!(err.class, ErrorClass::Validation);

        // Nothing was written, including the valid leading item.
        assert!(catalog.get(&scope()).unwrap().is_empty());
    }

    #[test]
    fn get_returns_display_order() {
        let store = MemStore::new();
        let catalog = FieldCatalog::new(&store);

        catalog
            .upsert(
                &scope(),
                vec![
                    text_def("unordered", None),
                    text_def("second", Some(2)),
                    text_def("first", Some(1)),
                ],
            )
            .unwrap();

        let keys: Vec<String> = catalog
            .get(&scope())
            .unwrap()
            .into_iter()
            .map(|def| def.key)
            .collect();
        assert_eq!(keys, vec!["first", "second", "unordered"]);
    }

    #[test]
    fn delete_one_key_and_delete_all() {
        let store = MemStore::new();
        let catalog = FieldCatalog::new(&store);

        catalog
            .upsert(&scope(), vec![text_def("a", None), text_def("b", None)])
            .unwrap();

        assert_eq!(catalog.delete(&scope(), Some("a")).unwrap(), 1);
        assert_eq!(catalog.delete(&scope(), Some("missing")).unwrap(), 0);
        assert_eq!(catalog.delete(&scope(), None).unwrap(), 1);
        assert!(catalog.get(&scope()).unwrap().is_empty());
    }

    #[test]
    fn scopes_are_independent_per_column() {
        let store = MemStore::new();
        let catalog = FieldCatalog::new(&store);

        let other = CatalogKey::new(TenantId::new(7), EntityTag::Applicant, "address_detail");
        catalog.upsert(&scope(), vec![text_def("phone", None)]).unwrap();
        catalog.upsert(&other, vec![text_def("street", None)]).unwrap();

        assert_eq!(catalog.get(&scope()).unwrap().len(), 1);
        assert_eq!(catalog.get(&other).unwrap().len(), 1);
        assert_eq!(catalog.known_keys(&other).unwrap().len(), 1);
    }
}
