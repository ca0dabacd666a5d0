//! Audit trail for user mutations
//!
//! Every create and update of a user produces one [`ChangeRecord`] holding
//! the subject's state before and after the change.
//!
//! # Architecture
//!
//! - [`Snapshot`]: an owned, ordered copy of an entity's fields.
//! - [`DiffPayload`]: the before/after pair, encoded as
//!   `{"OldDetails": ..., "NewDetails": ...}` text inside the record, with
//!   [`flatten`] for display.
//! - [`ChangeRecord`]: the stored entry. Records live in an append-only
//!   journal (see `storage::Journal`) and are read back through
//!   `services::AuditService`.
//!
//! # Example
//!
//! ```rust,ignore
//! use userdir::audit::{ChangeRecord, Snapshot};
//!
//! let before = Snapshot::capture(&existing)?;
//! let after = Snapshot::capture(&updated)?;
//! let record = ChangeRecord::updated(updated.id, updated.full_name(), before, after)?;
//! audit_service.create(record)?;
//! ```

mod diff;
mod record;
mod snapshot;

pub use diff::{
    decode, encode, flatten, flatten_sections, Details, DiffPayload, ABSENT_MARKER, NEW_DETAILS,
    OLD_DETAILS,
};
pub use record::{AuditDetails, ChangeKind, ChangeRecord};
pub use snapshot::Snapshot;
