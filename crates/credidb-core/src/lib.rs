//! Core runtime for CrediDB: the dynamic-attribute catalog, document-field
//! accessor, sub-document collections, role-scoped visibility, and the
//! append-only audit engine, all consuming storage through injected
//! repository traits.
//!
//! ## Crate layout
//! - `catalog`: per-tenant field-definition registry and document validation.
//! - `document`: read/merge/delete over one dynamic-attribute column.
//! - `collection`: array-valued attributes of identified sub-documents.
//! - `scope`: role contexts, visibility filters, and row enrichment.
//! - `audit`: history entries and the audited-update flow.
//! - `store`: repository traits plus the in-process baseline store.

// public exports are one module level down
pub mod audit;
pub mod catalog;
pub mod collection;
pub mod document;
pub mod error;
pub mod model;
pub mod patch;
pub mod response;
pub mod scope;
pub mod store;
pub mod types;
pub mod value;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No stores, envelopes, or internal helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        audit::{AuditEntry, AuditKind, AuditLog, DynamicMerge, RecordUpdate},
        catalog::{FieldCatalog, FieldDefinition, FieldType},
        collection::SubDocuments,
        document::{DocPath, DocumentFields, ValidationMode},
        error::{Error, ErrorClass},
        model::{ActorRecord, EntityTag, Record},
        scope::{Role, RoleContext, ScopeFilter, ScopedRow, scoped_list},
        types::{ActorId, ItemId, RecordId, TenantId},
    };
}
