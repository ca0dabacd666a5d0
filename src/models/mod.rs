//! Core data models for userdir
//!
//! The user directory's records and the entity abstraction the stores are
//! written against.

pub mod entity;
pub mod ids;
pub mod user;

pub use entity::{Entity, EntityKind};
pub use ids::{ChangeRecordId, UserId};
pub use user::{User, UserPatch, UserValidationError};
