use crate::{
    model::EntityTag,
    types::{RecordId, TenantId},
};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

///
/// RecordKey
///
/// Addresses one row: tenant, entity kind, integer key. Every store access
/// carries the full key, so a foreign tenant's record is simply never found.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct RecordKey {
    pub tenant: TenantId,
    pub entity: EntityTag,
    pub id: RecordId,
}

impl RecordKey {
    #[must_use]
    pub const fn new(tenant: TenantId, entity: EntityTag, id: RecordId) -> Self {
        Self { tenant, entity, id }
    }
}

impl Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({}/{})", self.entity, self.tenant, self.id)
    }
}

///
/// CatalogKey
///
/// Addresses one field-definition catalog: tenant, entity kind, and the
/// dynamic-attribute column the definitions describe. Entities with more
/// than one dynamic column carry one independent catalog per column.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct CatalogKey {
    pub tenant: TenantId,
    pub entity: EntityTag,
    pub column: String,
}

impl CatalogKey {
    #[must_use]
    pub fn new(tenant: TenantId, entity: EntityTag, column: impl Into<String>) -> Self {
        Self {
            tenant,
            entity,
            column: column.into(),
        }
    }
}

impl Display for CatalogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{} ({})", self.entity, self.column, self.tenant)
    }
}
