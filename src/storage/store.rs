//! The entity store contract
//!
//! Every backend exposes the same four operations per entity kind. Each call
//! is independently durable; no transaction spans two calls or two stores.

use crate::error::{UserDirError, UserDirResult};
use crate::models::Entity;

/// CRUD surface over one stored collection
pub trait EntityStore<T: Entity>: Send + Sync {
    /// Every stored entity, in storage order
    fn get_all(&self) -> UserDirResult<Vec<T>>;

    /// Persist a new entity, assigning its identity if unset.
    /// Returns the entity as stored.
    fn create(&self, entity: T) -> UserDirResult<T>;

    /// Replace the stored entity with the same identity
    fn update(&self, entity: T) -> UserDirResult<T>;

    /// Remove the stored entity with the same identity
    fn delete(&self, entity: &T) -> UserDirResult<()>;
}

/// Reject entities that carry no identity where one is required
pub(crate) fn require_key<T: Entity>(entity: &T, operation: &str) -> UserDirResult<u64> {
    match entity.key() {
        0 => Err(UserDirError::InvalidArgument(format!(
            "Cannot {} {} without an id",
            operation,
            T::KIND
        ))),
        key => Ok(key),
    }
}
