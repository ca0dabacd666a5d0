//! User service
//!
//! Orchestrates user mutations. Every successful create or update leaves
//! exactly one change record behind; deletes are not audited.
//!
//! The user write and the audit append go to different files, so they cannot
//! commit together. The user is written first. If the audit append then
//! fails, the user write is reverted and the audit error returned. A process
//! that dies between the two writes can still leave an unaudited change.

use tracing::{error, info, warn};

use crate::audit::{ChangeRecord, Snapshot};
use crate::error::{UserDirError, UserDirResult};
use crate::models::{User, UserId};
use crate::storage::{EntityStore, Storage};

use super::audit::AuditService;

/// Service for user management
pub struct UserService<'a> {
    users: &'a dyn EntityStore<User>,
    audit: AuditService<'a>,
}

impl<'a> UserService<'a> {
    /// Create a new user service
    pub fn new(storage: &'a Storage) -> Self {
        Self::with_stores(&storage.users, &storage.audit)
    }

    /// Create a user service over arbitrary stores
    pub fn with_stores(
        users: &'a dyn EntityStore<User>,
        audit: &'a dyn EntityStore<ChangeRecord>,
    ) -> Self {
        Self {
            users,
            audit: AuditService::with_store(audit),
        }
    }

    /// All users in store order
    pub fn get_all(&self) -> UserDirResult<Vec<User>> {
        self.users.get_all()
    }

    /// Users whose active flag equals `is_active`
    pub fn filter_by_active(&self, is_active: bool) -> UserDirResult<Vec<User>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|user| user.is_active == is_active)
            .collect())
    }

    /// Get a user by id
    pub fn get_by_id(&self, id: UserId) -> UserDirResult<Option<User>> {
        Ok(self.get_all()?.into_iter().find(|user| user.id == id))
    }

    /// Find a user by id (`3` or `usr-3`), email, or full name
    pub fn find(&self, identifier: &str) -> UserDirResult<Option<User>> {
        let identifier = identifier.trim();
        let users = self.get_all()?;

        if let Ok(id) = identifier.parse::<UserId>() {
            if let Some(user) = users.iter().find(|user| user.id == id) {
                return Ok(Some(user.clone()));
            }
        }

        if let Some(user) = users.iter().find(|user| user.matches_email(identifier)) {
            return Ok(Some(user.clone()));
        }

        Ok(users.into_iter().find(|user| user.matches_name(identifier)))
    }

    /// Change records describing `id`, oldest first
    pub fn history(&self, id: UserId) -> UserDirResult<Vec<ChangeRecord>> {
        self.audit.get_by_user_id(id)
    }

    /// Number of users
    pub fn count(&self) -> UserDirResult<usize> {
        Ok(self.get_all()?.len())
    }

    /// Create a user and record its creation. The store assigns the id.
    pub fn create(&self, user: User) -> UserDirResult<User> {
        if !user.id.is_unset() {
            return Err(UserDirError::InvalidArgument(format!(
                "New user already has id {}",
                user.id
            )));
        }
        user.validate()
            .map_err(|e| UserDirError::InvalidArgument(e.to_string()))?;

        let created = self.users.create(user)?;

        let recorded = Snapshot::capture(&created).and_then(|after| {
            let record = ChangeRecord::created(created.id, created.full_name(), after)?;
            self.audit.create(record)
        });

        if let Err(audit_error) = recorded {
            error!(user = %created.id, error = %audit_error, "audit append failed after create");
            if let Err(revert_error) = self.users.delete(&created) {
                error!(user = %created.id, error = %revert_error, "could not revert create");
            } else {
                warn!(user = %created.id, "create reverted");
            }
            return Err(audit_error);
        }

        info!(user = %created.id, name = %created.full_name(), "user created");
        Ok(created)
    }

    /// Replace a stored user and record the before/after states.
    ///
    /// A record is written even when nothing changed.
    pub fn update(&self, user: User) -> UserDirResult<User> {
        if user.id.is_unset() {
            return Err(UserDirError::InvalidArgument(
                "Cannot update User without an id".into(),
            ));
        }

        let existing = self
            .get_by_id(user.id)?
            .ok_or_else(|| UserDirError::user_not_found(user.id.to_string()))?;
        let before = Snapshot::capture(&existing)?;

        user.validate()
            .map_err(|e| UserDirError::InvalidArgument(e.to_string()))?;

        let updated = self.users.update(user)?;

        let recorded = Snapshot::capture(&updated).and_then(|after| {
            let record = ChangeRecord::updated(updated.id, updated.full_name(), before, after)?;
            self.audit.create(record)
        });

        if let Err(audit_error) = recorded {
            error!(user = %updated.id, error = %audit_error, "audit append failed after update");
            if let Err(revert_error) = self.users.update(existing) {
                error!(user = %updated.id, error = %revert_error, "could not revert update");
            } else {
                warn!(user = %updated.id, "update reverted");
            }
            return Err(audit_error);
        }

        info!(user = %updated.id, "user updated");
        Ok(updated)
    }

    /// Remove a user. Deletes are not audited.
    pub fn delete(&self, user: &User) -> UserDirResult<()> {
        if user.id.is_unset() {
            return Err(UserDirError::InvalidArgument(
                "Cannot delete User without an id".into(),
            ));
        }

        self.users.delete(user)?;
        info!(user = %user.id, "user deleted");
        Ok(())
    }
}
