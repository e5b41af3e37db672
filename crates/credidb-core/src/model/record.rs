use crate::{
    model::EntityTag,
    types::{RecordId, TenantId},
    value::{JsonMap, as_object},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fixed field carrying the record's workflow state.
pub const STATUS_FIELD: &str = "status";

/// Fixed field holding the creating actor's id.
pub const CREATED_BY_FIELD: &str = "created_by";

/// Fixed field holding the currently assigned actor's id.
pub const ASSIGNED_TO_FIELD: &str = "assigned_to";

/// Fixed field naming the institution a credit request was routed to.
pub const INSTITUTION_FIELD: &str = "institution";

/// Fixed field naming the city a credit request belongs to.
pub const CITY_FIELD: &str = "city";

/// Column holding the record's append-only audit history.
pub const HISTORIAL_FIELD: &str = "historial";

///
/// Record
///
/// One tenant-owned row: an integer key, an entity tag, and a JSON body
/// holding both fixed fields and named dynamic-attribute columns.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub tenant: TenantId,
    pub entity: EntityTag,
    pub id: RecordId,
    pub body: JsonMap,
}

impl Record {
    #[must_use]
    pub const fn new(tenant: TenantId, entity: EntityTag, id: RecordId, body: JsonMap) -> Self {
        Self {
            tenant,
            entity,
            id,
            body,
        }
    }

    /// Borrow one top-level column of the body.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Value> {
        self.body.get(name)
    }

    /// Borrow a top-level column as an object, when it is one.
    #[must_use]
    pub fn column_object(&self, name: &str) -> Option<&JsonMap> {
        self.body.get(name).and_then(as_object)
    }

    /// The record's workflow state, when the status field is a string.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.body.get(STATUS_FIELD).and_then(Value::as_str)
    }
}
