//! CrediDB — a multi-tenant dynamic-attribute record engine for
//! credit-application workflows.
//!
//! ## Crate layout
//! - `core`: the runtime — catalog, document accessor, sub-document
//!   collections, role scoping, audit engine, and repository traits.
//!
//! The `prelude` module mirrors the runtime surface a transport layer uses;
//! storage implementations live under `core::store`.

pub use credidb_core as core;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use core::{error::Error, response::Envelope};

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::core::{
        audit::{AuditEntry, AuditKind, AuditLog, DynamicMerge, RecordUpdate},
        catalog::{AllowedValues, Condition, FieldCatalog, FieldDefinition, FieldType},
        collection::SubDocuments,
        document::{DocPath, DocumentFields, ValidationMode},
        error::{Error, ErrorClass, ErrorOrigin},
        model::{ActorRecord, EntityTag, Record},
        response::Envelope,
        scope::{Role, RoleContext, ScopeFilter, ScopedRow, scoped_list},
        store::{ActorDirectory, CatalogKey, DefinitionStore, RecordKey, RecordStore},
        types::{ActorId, AuditId, ItemId, RecordId, TenantId, Timestamp},
    };
    pub use serde::{Deserialize, Serialize};
}
