use crate::{
    audit::{AuditEntry, AuditKind},
    error::{Error, ErrorClass, ErrorOrigin},
    model::{EntityTag, HISTORIAL_FIELD, Record},
    patch::merge_deep,
    scope::RoleContext,
    store::{RecordKey, RecordStore},
    types::{RecordId, TenantId},
    value::JsonMap,
};
use serde_json::Value;
use thiserror::Error as ThisError;
use tracing::debug;

///
/// AuditError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum AuditError {
    #[error("history entry failed to encode: {message}")]
    EncodeFailed { message: String },
}

impl AuditError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        ErrorClass::Internal
    }
}

impl From<AuditError> for Error {
    fn from(err: AuditError) -> Self {
        Self::new(err.class(), ErrorOrigin::Audit, err.to_string())
    }
}

///
/// DynamicMerge
///
/// Recursive merge payload for one dynamic-attribute column. Unlike the
/// accessor's shallow merge, this descends into nested maps so updating one
/// nested credit-subtype block never erases sibling blocks.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DynamicMerge {
    pub column: String,
    pub value: JsonMap,
}

///
/// RecordUpdate
///
/// One state-changing write: plain overwrites of fixed columns, an optional
/// recursive merge of a dynamic column, and an optional caller note.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RecordUpdate {
    pub base: JsonMap,
    pub dynamic: Option<DynamicMerge>,
    pub note: Option<String>,
}

///
/// AuditLog
///
/// Append-only history writer plus the audited-update flow for one entity
/// kind. History lives in the record's `historial` column; entries are
/// never edited or removed.
///
/// The update and its audit entry are separate store writes with no
/// rollback: after a successful state update the entry can still be
/// missing, and callers must treat the state update as authoritative.
///

pub struct AuditLog<'a, S> {
    store: &'a S,
    tenant: TenantId,
    entity: EntityTag,
}

impl<'a, S> AuditLog<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S, tenant: TenantId, entity: EntityTag) -> Self {
        Self {
            store,
            tenant,
            entity,
        }
    }

    const fn record_key(&self, record: RecordId) -> RecordKey {
        RecordKey::new(self.tenant, self.entity, record)
    }
}

impl<S: RecordStore> AuditLog<'_, S> {
    /// Append one immutable entry to the record's history, initializing the
    /// list if the record has none yet.
    pub fn append_entry(
        &self,
        record: RecordId,
        ctx: &RoleContext,
        kind: AuditKind,
        previous_state: Option<String>,
        new_state: Option<String>,
        note: Option<String>,
    ) -> Result<AuditEntry, Error> {
        let entry = AuditEntry::now(
            ctx.actor,
            ctx.role.name(),
            kind,
            previous_state,
            new_state,
            note,
        );

        let mut stored = self.load(record)?;
        let mut historial = match stored.body.remove(HISTORIAL_FIELD) {
            Some(Value::Array(entries)) => entries,
            _ => Vec::new(),
        };

        let encoded = serde_json::to_value(&entry).map_err(|err| AuditError::EncodeFailed {
            message: err.to_string(),
        })?;
        historial.push(encoded);

        debug!(key = %self.record_key(record), kind = ?kind, "audit append");
        stored
            .body
            .insert(HISTORIAL_FIELD.to_string(), Value::Array(historial));
        self.store.update(&self.record_key(record), stored.body)?;

        Ok(entry)
    }

    /// Append the creation-kind entry written when a record is first stored.
    pub fn record_creation(
        &self,
        record: RecordId,
        ctx: &RoleContext,
        note: Option<String>,
    ) -> Result<AuditEntry, Error> {
        let new_state = self.load(record)?.status().map(str::to_string);
        self.append_entry(record, ctx, AuditKind::Creation, None, new_state, note)
    }

    /// Apply one audited update: base fixed-column overwrites plus a
    /// recursive merge of the dynamic column. A status change appends a
    /// state-change entry automatically; a note with no status change
    /// appends a comment entry.
    pub fn update_with_audit(
        &self,
        record: RecordId,
        update: RecordUpdate,
        ctx: &RoleContext,
    ) -> Result<Record, Error> {
        let mut stored = self.load(record)?;
        let previous_state = stored.status().map(str::to_string);

        for (key, value) in update.base {
            stored.body.insert(key, value);
        }

        if let Some(DynamicMerge { column, value }) = update.dynamic {
            let mut map = stored.column_object(&column).cloned().unwrap_or_default();
            merge_deep(&mut map, value);
            stored.body.insert(column, Value::Object(map));
        }

        self.store
            .update(&self.record_key(record), stored.body.clone())?;

        let new_state = stored.status().map(str::to_string);
        if new_state != previous_state {
            let note = update.note.or_else(|| {
                Some(format!(
                    "state changed from {} to {}",
                    previous_state.as_deref().unwrap_or("none"),
                    new_state.as_deref().unwrap_or("none"),
                ))
            });
            self.append_entry(
                record,
                ctx,
                AuditKind::StateChange,
                previous_state,
                new_state,
                note,
            )?;
        } else if update.note.is_some() {
            self.append_entry(
                record,
                ctx,
                AuditKind::Comment,
                previous_state,
                new_state,
                update.note,
            )?;
        }

        // Reload so the caller sees the history written above.
        self.load(record)
    }

    fn load(&self, record: RecordId) -> Result<Record, Error> {
        let key = self.record_key(record);
        self.store
            .fetch(&key)?
            .ok_or_else(|| Error::not_found(ErrorOrigin::Audit, format!("record not found: {key}")))
    }
}
