//! Change record data structures
//!
//! A change record is written once per successful create or update of a
//! user and never touched again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{UserDirError, UserDirResult};
use crate::models::{ChangeRecordId, Entity, EntityKind, UserId};

use super::diff::{flatten_sections, DiffPayload};
use super::snapshot::Snapshot;

/// What happened to the subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    /// Subject was created
    Created,
    /// Subject was updated
    Updated,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Created => write!(f, "Created"),
            ChangeKind::Updated => write!(f, "Updated"),
        }
    }
}

/// A single audit entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Store-assigned identity of the record itself
    pub id: ChangeRecordId,

    /// Identity of the user that changed. A lookup key only.
    pub subject_id: UserId,

    /// The subject's full name as it was when the record was written
    pub subject_label: String,

    /// Type of change
    pub kind: ChangeKind,

    /// When the change was recorded (UTC)
    pub timestamp: DateTime<Utc>,

    /// Encoded [`DiffPayload`]
    pub changed_data: String,
}

impl ChangeRecord {
    /// Build an unsaved record for `payload`
    pub fn new(
        kind: ChangeKind,
        subject_id: UserId,
        subject_label: impl Into<String>,
        payload: &DiffPayload,
    ) -> UserDirResult<Self> {
        Ok(Self {
            id: ChangeRecordId::UNSET,
            subject_id,
            subject_label: subject_label.into(),
            kind,
            timestamp: Utc::now(),
            changed_data: payload.encode()?,
        })
    }

    /// Record for a newly created subject
    pub fn created(
        subject_id: UserId,
        subject_label: impl Into<String>,
        after: Snapshot,
    ) -> UserDirResult<Self> {
        Self::new(
            ChangeKind::Created,
            subject_id,
            subject_label,
            &DiffPayload::created(after),
        )
    }

    /// Record for an updated subject
    pub fn updated(
        subject_id: UserId,
        subject_label: impl Into<String>,
        before: Snapshot,
        after: Snapshot,
    ) -> UserDirResult<Self> {
        Self::new(
            ChangeKind::Updated,
            subject_id,
            subject_label,
            &DiffPayload::updated(before, after),
        )
    }

    /// Decode the stored payload
    pub fn payload(&self) -> UserDirResult<DiffPayload> {
        DiffPayload::decode(&self.changed_data)
    }

    /// Check that the record can be stored: it names a subject and carries a
    /// payload whose shape agrees with its kind
    pub fn validate(&self) -> UserDirResult<()> {
        if self.subject_id.is_unset() {
            return Err(UserDirError::InvalidArgument(
                "Change record has no subject".into(),
            ));
        }

        let payload = self.payload().map_err(|e| {
            UserDirError::InvalidArgument(format!("Change record payload is unusable: {}", e))
        })?;

        match (self.kind, payload.before.is_absent()) {
            (ChangeKind::Created, true) | (ChangeKind::Updated, false) => Ok(()),
            (ChangeKind::Created, false) => Err(UserDirError::InvalidArgument(
                "Created record must not carry prior details".into(),
            )),
            (ChangeKind::Updated, true) => Err(UserDirError::InvalidArgument(
                "Updated record must carry prior details".into(),
            )),
        }
    }

    /// Presentation form with both payload sections flattened
    pub fn details(&self) -> AuditDetails {
        let (old_details, new_details) = flatten_sections(&self.changed_data);
        AuditDetails {
            record: self.clone(),
            old_details,
            new_details,
        }
    }

    /// Format the record as a one-line header
    pub fn format_human_readable(&self, timestamp_format: &str) -> String {
        format!(
            "[{}] {} {} {} ({})",
            self.timestamp.format(timestamp_format),
            self.id,
            self.kind,
            self.subject_id,
            self.subject_label
        )
    }
}

impl Entity for ChangeRecord {
    const KIND: EntityKind = EntityKind::ChangeRecord;

    fn key(&self) -> u64 {
        self.id.value()
    }

    fn assign_key(&mut self, key: u64) {
        self.id = ChangeRecordId::new(key);
    }
}

/// A change record prepared for display
#[derive(Debug, Clone, PartialEq)]
pub struct AuditDetails {
    pub record: ChangeRecord,
    /// Flattened prior state; empty for creations or unreadable payloads
    pub old_details: String,
    /// Flattened new state; empty for unreadable payloads
    pub new_details: String,
}
