//! Audit service
//!
//! Appends change records and reads them back. Lookups are filters over the
//! full record set; the journal keeps no index.

use tracing::debug;

use crate::audit::{AuditDetails, ChangeRecord};
use crate::error::{UserDirError, UserDirResult};
use crate::models::{ChangeRecordId, UserId};
use crate::storage::{EntityStore, Storage};

/// Service for the audit trail
#[derive(Clone, Copy)]
pub struct AuditService<'a> {
    store: &'a dyn EntityStore<ChangeRecord>,
}

impl<'a> AuditService<'a> {
    /// Create an audit service over the storage journal
    pub fn new(storage: &'a Storage) -> Self {
        Self::with_store(&storage.audit)
    }

    /// Create an audit service over any record store
    pub fn with_store(store: &'a dyn EntityStore<ChangeRecord>) -> Self {
        Self { store }
    }

    /// Every record, oldest first
    pub fn get_all(&self) -> UserDirResult<Vec<ChangeRecord>> {
        self.store.get_all()
    }

    /// Records whose own identity is `id` (zero or one)
    pub fn get_by_id(&self, id: ChangeRecordId) -> UserDirResult<Vec<ChangeRecord>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|record| record.id == id)
            .collect())
    }

    /// Records describing the user `id`, oldest first
    pub fn get_by_user_id(&self, id: UserId) -> UserDirResult<Vec<ChangeRecord>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|record| record.subject_id == id)
            .collect())
    }

    /// The last `count` records, oldest first
    pub fn get_recent(&self, count: usize) -> UserDirResult<Vec<ChangeRecord>> {
        let mut all = self.get_all()?;
        let start = all.len().saturating_sub(count);
        Ok(all.split_off(start))
    }

    /// One record prepared for display, if it exists
    pub fn details(&self, id: ChangeRecordId) -> UserDirResult<Option<AuditDetails>> {
        Ok(self
            .get_by_id(id)?
            .first()
            .map(ChangeRecord::details))
    }

    /// Append a record. Returns it with its assigned identity.
    ///
    /// The journal numbers records; a record that already carries an id is
    /// rejected.
    pub fn create(&self, record: ChangeRecord) -> UserDirResult<ChangeRecord> {
        if !record.id.is_unset() {
            return Err(UserDirError::InvalidArgument(format!(
                "Change record already has id {}",
                record.id
            )));
        }
        record.validate()?;

        let stored = self.store.create(record)?;
        debug!(
            record = %stored.id,
            subject = %stored.subject_id,
            kind = %stored.kind,
            "change recorded"
        );
        Ok(stored)
    }

    /// Number of records
    pub fn count(&self) -> UserDirResult<usize> {
        Ok(self.get_all()?.len())
    }
}
