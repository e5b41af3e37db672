use crate::{
    catalog::FieldDefinition,
    error::{Error, ErrorClass, ErrorOrigin},
    model::{ActorRecord, EntityTag, Record},
    store::{CatalogKey, RecordKey},
    types::{ActorId, TenantId},
    value::JsonMap,
};
use thiserror::Error as ThisError;

///
/// StoreError
///
/// Failures surfaced by a backing store implementation. `Unavailable` is
/// kept distinct so callers can tell a transient outage from a logic error.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum StoreError {
    #[error("key not found: {key}")]
    NotFound { key: String },

    #[error("store unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    #[must_use]
    pub fn not_found(key: impl ToString) -> Self {
        Self::NotFound {
            key: key.to_string(),
        }
    }

    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::NotFound { .. } => ErrorClass::NotFound,
            Self::Unavailable { .. } => ErrorClass::Unavailable,
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Self::new(err.class(), ErrorOrigin::Store, err.to_string())
    }
}

///
/// RecordStore
///
/// Repository interface over tenant-owned rows. One call is one store
/// round-trip; the engine's read-modify-write flows are therefore two calls
/// with a documented lost-update window (last merged write wins). A store
/// with a native atomic document-merge primitive may implement the merge
/// flows directly and close that window.
///

pub trait RecordStore {
    /// Fetch one row by full key. Absent and foreign-tenant rows are both
    /// `None`.
    fn fetch(&self, key: &RecordKey) -> Result<Option<Record>, StoreError>;

    /// Insert a row under its own key, overwriting any previous row.
    fn insert(&self, record: Record) -> Result<(), StoreError>;

    /// Replace the body of an existing row. Absent rows are `NotFound`.
    fn update(&self, key: &RecordKey, body: JsonMap) -> Result<(), StoreError>;

    /// Delete a row by key. Absent rows are `NotFound`.
    fn remove(&self, key: &RecordKey) -> Result<(), StoreError>;

    /// Range query: every row of one entity kind owned by one tenant.
    fn list(&self, tenant: TenantId, entity: EntityTag) -> Result<Vec<Record>, StoreError>;
}

///
/// DefinitionStore
///
/// Repository interface over field-definition catalogs. The catalog service
/// implements upsert as delete-then-insert per key on top of these calls.
///

pub trait DefinitionStore {
    /// All definitions stored under one catalog scope, unordered.
    fn definitions(&self, scope: &CatalogKey) -> Result<Vec<FieldDefinition>, StoreError>;

    /// Insert one definition under its scope and key.
    fn insert_definition(
        &self,
        scope: &CatalogKey,
        definition: FieldDefinition,
    ) -> Result<(), StoreError>;

    /// Delete one definition by key, or every definition in the scope when
    /// `key` is `None`. Returns the number of definitions removed.
    fn delete_definitions(
        &self,
        scope: &CatalogKey,
        key: Option<&str>,
    ) -> Result<usize, StoreError>;
}

///
/// ActorDirectory
///
/// Repository interface over stored actors, used to derive role contexts,
/// resolve supervisor teams, and batch display-name lookups. List/get
/// enrichment must stay batched: round-trips are bounded per request, never
/// per row.
///

pub trait ActorDirectory {
    /// Fetch one actor by id within a tenant.
    fn actor(&self, tenant: TenantId, id: ActorId) -> Result<Option<ActorRecord>, StoreError>;

    /// Batched fetch of distinct actor ids within a tenant. Unknown ids are
    /// simply absent from the result.
    fn actors_by_ids(
        &self,
        tenant: TenantId,
        ids: &[ActorId],
    ) -> Result<Vec<ActorRecord>, StoreError>;

    /// Ids of the actors reporting directly to the given supervisor.
    fn direct_reports(
        &self,
        tenant: TenantId,
        supervisor: ActorId,
    ) -> Result<Vec<ActorId>, StoreError>;
}
